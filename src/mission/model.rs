#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Subtask {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MissionTask {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
}

impl MissionTask {
    /// A task with subtasks is complete exactly when all of them are.
    pub fn sync_completion(&mut self) {
        if !self.subtasks.is_empty() {
            self.completed = self.subtasks.iter().all(|s| s.completed);
        }
    }
}

/// Progress summary across tasks and subtasks.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionProgress {
    pub tasks_done: usize,
    pub tasks_total: usize,
    pub subtasks_done: usize,
    pub subtasks_total: usize,
}

impl MissionProgress {
    pub fn of(tasks: &[MissionTask]) -> Self {
        let subtasks = tasks.iter().flat_map(|t| t.subtasks.iter());
        Self {
            tasks_done: tasks.iter().filter(|t| t.completed).count(),
            tasks_total: tasks.len(),
            subtasks_done: subtasks.clone().filter(|s| s.completed).count(),
            subtasks_total: subtasks.count(),
        }
    }

    /// Completed tasks over all tasks; zero for an empty list.
    pub fn ratio(&self) -> f64 {
        if self.tasks_total == 0 {
            0.0
        } else {
            self.tasks_done as f64 / self.tasks_total as f64
        }
    }
}

fn sub(id: &str, title: &str, description: &str) -> Subtask {
    Subtask {
        id: id.to_owned(),
        title: title.to_owned(),
        completed: false,
        description: description.to_owned(),
    }
}

fn task(id: &str, title: &str, description: &str, subtasks: Vec<Subtask>) -> MissionTask {
    MissionTask {
        id: id.to_owned(),
        title: title.to_owned(),
        completed: false,
        description: description.to_owned(),
        subtasks,
    }
}

/// Built-in task list used when nothing usable is persisted.
pub fn default_tasks() -> Vec<MissionTask> {
    vec![
        task(
            "scene-foundation",
            "Scene foundation",
            "Phase sequencing and capability probing wired into the provider",
            vec![
                sub("phase-controller", "Phase controller", "Scroll-driven phase sequence"),
                sub("capability-probe", "Capability probe", "Tier benchmark and feature checks"),
            ],
        ),
        task(
            "canvas-layers",
            "Canvas layers",
            "Starfield, grid, particle trails and comets",
            vec![
                sub("starfield", "Starfield", "Density-scaled twinkling stars"),
                sub("grid", "Grid overlay", "Perspective grid with a flat fallback"),
                sub("trails", "Thought trails", "Hover-linked particle trails"),
                sub("comets", "Comets", "Occasional streaks across the sky"),
            ],
        ),
        task(
            "stellar-message",
            "Stellar message",
            "Typewriter reveal, hold and fade",
            Vec::new(),
        ),
        task(
            "accessibility",
            "Accessibility pass",
            "Reduced motion and low-tier fallbacks verified",
            Vec::new(),
        ),
    ]
}
