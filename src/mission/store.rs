use std::{
    cell::RefCell,
    collections::HashMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::foundation::error::{SceneError, SceneResult};

/// String key-value storage, shaped like a browser session store.
pub trait KeyValueStore {
    /// `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> SceneResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> SceneResult<()>;

    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> SceneResult<()>;
}

/// In-process store; the default for tests and headless runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> SceneResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> SceneResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> SceneResult<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// One file per key under a root directory.
#[derive(Clone, Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Keys are restricted to a conservative file-name alphabet.
    pub fn path_for(&self, key: &str) -> SceneResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(SceneError::storage(format!("invalid store key '{key}'")));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> SceneResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SceneError::storage(format!(
                "read '{}': {e}",
                path.display()
            ))),
        }
    }

    fn set(&self, key: &str, value: &str) -> SceneResult<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root).map_err(|e| {
            SceneError::storage(format!("create '{}': {e}", self.root.display()))
        })?;
        // Write-then-rename so a crash never leaves a half-written entry.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)
            .map_err(|e| SceneError::storage(format!("write '{}': {e}", tmp.display())))?;
        fs::rename(&tmp, &path)
            .map_err(|e| SceneError::storage(format!("rename '{}': {e}", path.display())))
    }

    fn remove(&self, key: &str) -> SceneResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SceneError::storage(format!(
                "remove '{}': {e}",
                path.display()
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mission/store.rs"]
mod tests;
