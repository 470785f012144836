use std::{
    cell::{Cell, RefCell},
    fs,
    path::{Path, PathBuf},
    rc::Rc,
    time::{Duration, Instant},
};

use anyhow::{bail, Context, Result};
use hashbrown::HashMap;
use json_pretty_compact::PrettyCompactFormatter;
use log::{debug, info, warn};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Serializer;

use crate::state::GlobalConfig;

pub fn to_json_bytes<T: Serialize>(data: &T) -> Result<Vec<u8>> {
    let formatter = PrettyCompactFormatter::new();
    let mut data_bytes = vec![];
    let mut ser = Serializer::with_formatter(&mut data_bytes, formatter);
    data.serialize(&mut ser)?;
    Ok(data_bytes)
}

fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    info!("Saving {}", path.display());
    let data_bytes = to_json_bytes(data)?;
    fs::create_dir_all(path.parent().context("invalid parent directory")?)?;
    fs::write(path, &data_bytes)?;
    Ok(())
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    info!("Loading {}", path.display());
    let data_bytes = std::fs::read(path)?;
    let data: T = serde_json::from_slice(&data_bytes)?;
    Ok(data)
}

pub fn load_global_config(path: &Path) -> Result<GlobalConfig> {
    if !path.exists() {
        info!("No config at {}, using defaults", path.display());
        return Ok(GlobalConfig::default());
    }
    load_json(path).with_context(|| format!("invalid config file {}", path.display()))
}

pub fn save_global_config(path: &Path, config: &mut GlobalConfig) -> Result<()> {
    if config.modified {
        save_json(path, config)?;
        config.modified = false;
    }
    Ok(())
}

/// Durable key-value slots holding serialized documents.
pub trait Store {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>>;
    fn write(&mut self, key: &str, data: &[u8]) -> Result<()>;
    fn keys(&self) -> Result<Vec<String>>;
}

/// One `<key>.json` file per slot inside a directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Self {
        FileStore { dir }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Store for FileStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        if !path.exists() {
            return Ok(None);
        }
        info!("Loading {}", path.display());
        let data = fs::read(&path).with_context(|| format!("unable to read {}", path.display()))?;
        Ok(Some(data))
    }

    fn write(&mut self, key: &str, data: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path(key);
        debug!("Writing {}", path.display());
        fs::write(&path, data).with_context(|| format!("unable to write {}", path.display()))?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let pattern = format!("{}/*.json", self.dir.display());
        let mut keys = vec![];
        for entry in glob::glob(&pattern)? {
            let path = entry?;
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// In-process store. Clones share the same slots, so a caller can keep a
/// handle to inspect what an engine wrote.
#[derive(Clone, Default)]
pub struct MemoryStore {
    slots: Rc<RefCell<HashMap<String, Vec<u8>>>>,
    fail_writes: Rc<Cell<bool>>,
    writes: Rc<Cell<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.slots.borrow().get(key).cloned()
    }
}

impl Store for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.get(key))
    }

    fn write(&mut self, key: &str, data: &[u8]) -> Result<()> {
        if self.fail_writes.get() {
            bail!("write to {} refused", key);
        }
        self.slots.borrow_mut().insert(key.to_string(), data.to_vec());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.slots.borrow().keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

/// Values that can be written to and restored from a `Store`.
pub trait Persist: Serialize + DeserializeOwned {
    fn to_bytes(&self) -> Result<Vec<u8>> {
        to_json_bytes(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Debounced writer for one store slot. Each `schedule` pushes the deadline
/// out again, so only the last change in a burst is written.
pub struct Persister {
    store: Box<dyn Store>,
    key: String,
    delay: Duration,
    deadline: Option<Instant>,
}

impl Persister {
    pub fn new(store: Box<dyn Store>, key: impl Into<String>, delay: Duration) -> Self {
        Persister {
            store,
            key: key.into(),
            delay,
            deadline: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn is_due(&self, now: Instant) -> bool {
        matches!(self.deadline, Some(d) if d <= now)
    }

    /// Writes `doc` and clears any pending deadline. Failures are logged and
    /// dropped; the in-memory value stays authoritative.
    pub fn write<D: Persist>(&mut self, doc: &D) {
        self.deadline = None;
        let result = doc
            .to_bytes()
            .and_then(|bytes| self.store.write(&self.key, &bytes));
        match result {
            Ok(()) => debug!("Persisted {}", self.key),
            Err(e) => warn!("Failed to persist {}: {:#}", self.key, e),
        }
    }

    /// Reads the slot; unreadable or undecodable data counts as absent.
    pub fn load<D: Persist>(&self) -> Option<D> {
        let bytes = match self.store.read(&self.key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read {}: {:#}", self.key, e);
                return None;
            }
        };
        match D::from_bytes(&bytes) {
            Ok(doc) => Some(doc),
            Err(e) => {
                warn!("Ignoring persisted {}: {:#}", self.key, e);
                None
            }
        }
    }
}
