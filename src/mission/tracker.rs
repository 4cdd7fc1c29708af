use crate::{
    foundation::error::{SceneError, SceneResult},
    mission::{
        model::{MissionProgress, MissionTask, default_tasks},
        store::KeyValueStore,
    },
};

/// Fixed storage key of the persisted task list.
pub const STORAGE_KEY: &str = "curiouslabs.mission-tracker";

/// Where the in-memory task list came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadSource {
    Stored,
    /// Nothing was stored.
    Defaults,
    /// The stored entry was unreadable or corrupt; defaults were used.
    Recovered,
}

/// Dev-mode progress tracker persisted as JSON under [`STORAGE_KEY`].
///
/// The in-memory list is authoritative: a failed write is logged and reported, but the
/// mutation stands.
pub struct MissionTracker<S: KeyValueStore> {
    store: S,
    tasks: Vec<MissionTask>,
    source: LoadSource,
}

impl<S: KeyValueStore> MissionTracker<S> {
    /// Read the persisted list; absent, unreadable or corrupt entries yield the defaults.
    pub fn load(store: S) -> Self {
        let (tasks, source) = match store.get(STORAGE_KEY) {
            Ok(None) => (default_tasks(), LoadSource::Defaults),
            Ok(Some(raw)) => match serde_json::from_str::<Vec<MissionTask>>(&raw) {
                Ok(mut tasks) => {
                    tasks.iter_mut().for_each(MissionTask::sync_completion);
                    (tasks, LoadSource::Stored)
                }
                Err(err) => {
                    tracing::warn!(%err, key = STORAGE_KEY, "corrupt mission state; using defaults");
                    (default_tasks(), LoadSource::Recovered)
                }
            },
            Err(err) => {
                tracing::warn!(%err, key = STORAGE_KEY, "mission state unreadable; using defaults");
                (default_tasks(), LoadSource::Recovered)
            }
        };
        tracing::debug!(tasks = tasks.len(), ?source, "mission tracker loaded");
        Self {
            store,
            tasks,
            source,
        }
    }

    pub fn tasks(&self) -> &[MissionTask] {
        &self.tasks
    }

    pub fn task(&self, id: &str) -> Option<&MissionTask> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn source(&self) -> LoadSource {
        self.source
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn progress(&self) -> MissionProgress {
        MissionProgress::of(&self.tasks)
    }

    /// Flip a task. A task with subtasks carries them along. `Ok(false)` for unknown ids.
    pub fn toggle_task(&mut self, id: &str) -> SceneResult<bool> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        task.completed = !task.completed;
        let done = task.completed;
        for sub in &mut task.subtasks {
            sub.completed = done;
        }
        self.persist()?;
        Ok(true)
    }

    /// Flip one subtask; the parent's completion follows its subtasks.
    pub fn toggle_subtask(&mut self, task_id: &str, subtask_id: &str) -> SceneResult<bool> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == task_id) else {
            return Ok(false);
        };
        let Some(sub) = task.subtasks.iter_mut().find(|s| s.id == subtask_id) else {
            return Ok(false);
        };
        sub.completed = !sub.completed;
        task.sync_completion();
        self.persist()?;
        Ok(true)
    }

    /// Back to the built-in list, persisted.
    pub fn reset(&mut self) -> SceneResult<()> {
        self.tasks = default_tasks();
        self.persist()
    }

    fn persist(&self) -> SceneResult<()> {
        let write = serde_json::to_string(&self.tasks)
            .map_err(SceneError::from)
            .and_then(|json| self.store.set(STORAGE_KEY, &json));
        if let Err(err) = &write {
            tracing::warn!(%err, key = STORAGE_KEY, "failed to persist mission state");
        }
        write
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mission/tracker.rs"]
mod tests;
