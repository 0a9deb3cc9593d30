use super::store::SessionStore;
use anyhow::{Context, Result};
use std::{
    collections::BTreeMap,
    fs::File,
    io::{Read, Write},
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard, PoisonError},
};
use tracing::warn;

type Dump = BTreeMap<String, String>;

/// Session store backed by a pretty-printed JSON object on disk.
///
/// The whole file is rewritten on every change.
pub struct FileSessionStore {
    file_path: PathBuf,
    dump: Mutex<Dump>,
}

impl FileSessionStore {
    fn load_dump_from_file(file_path: &Path) -> Result<Dump> {
        let mut file = File::open(file_path)?;

        let mut content = String::new();
        file.read_to_string(&mut content)?;

        Ok(serde_json::from_str(&content)?)
    }

    /// Opens the store at `file_path`. A missing file is an empty store; an
    /// unreadable one is logged and treated as empty.
    pub fn initialize(file_path: PathBuf) -> FileSessionStore {
        let dump = if file_path.exists() {
            Self::load_dump_from_file(&file_path).unwrap_or_else(|err| {
                warn!(
                    "Ignoring unreadable session file {}: {}",
                    file_path.display(),
                    err
                );
                Dump::default()
            })
        } else {
            Dump::default()
        };
        FileSessionStore {
            file_path,
            dump: Mutex::new(dump),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn lock(&self) -> MutexGuard<'_, Dump> {
        self.dump.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn save_dump(&self, dump: &Dump) -> Result<()> {
        let json_string = serde_json::to_string_pretty(dump)?;
        let mut file = File::create(&self.file_path)
            .with_context(|| format!("Failed to create {}", self.file_path.display()))?;
        file.write_all(json_string.as_bytes())?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut dump = self.lock();
        dump.insert(key.to_string(), value.to_string());
        self.save_dump(&dump)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut dump = self.lock();
        if dump.remove(key).is_some() {
            self.save_dump(&dump)?;
        }
        Ok(())
    }
}
