use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::PathBuf;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Serializer, Value};

use crate::models::{Buckets, SettingsFile, Task};

const DATA_FILE: &str = "tasks.json";
const SETTINGS_FILE: &str = "settings.json";
const LEGACY_COPY_FILE: &str = "tasks.legacy.json";

#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// The task file parsed, but its root is neither the bucket mapping nor
    /// the legacy array. The payload names the JSON type found.
    UnexpectedRoot(&'static str),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(err) => write!(f, "io error: {err}"),
            StorageError::Json(err) => write!(f, "json error: {err}"),
            StorageError::UnexpectedRoot(kind) => {
                write!(f, "unexpected root: wanted an object or array, found {kind}")
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(value: std::io::Error) -> Self {
        StorageError::Io(value)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(value: serde_json::Error) -> Self {
        StorageError::Json(value)
    }
}

/// Shapes the task file takes on disk. The bare array predates the bucket
/// mapping; the store upgrades it on first load.
#[derive(Debug)]
pub enum LoadedTasks {
    Buckets(Buckets),
    Legacy(Vec<Task>),
}

#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn data_path(&self) -> PathBuf {
        self.root.join(DATA_FILE)
    }

    /// Reads the task file. A missing file is not an error: the store simply
    /// starts empty. Anything else unreadable is fatal to the caller.
    pub fn load_tasks(&self) -> Result<Option<LoadedTasks>, StorageError> {
        let buf = match self.read_file(self.data_path()) {
            Ok(buf) => buf,
            Err(StorageError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(None)
            }
            Err(err) => return Err(err),
        };
        let value: Value = serde_json::from_str(&buf)?;
        match value {
            Value::Object(_) => Ok(Some(LoadedTasks::Buckets(serde_json::from_value(value)?))),
            Value::Array(_) => Ok(Some(LoadedTasks::Legacy(serde_json::from_value(value)?))),
            other => Err(StorageError::UnexpectedRoot(json_kind(&other))),
        }
    }

    pub fn load_settings(&self) -> Result<Option<SettingsFile>, StorageError> {
        let buf = match self.read_file(self.root.join(SETTINGS_FILE)) {
            Ok(buf) => buf,
            Err(StorageError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(None)
            }
            Err(err) => return Err(err),
        };
        Ok(Some(serde_json::from_str(&buf)?))
    }

    pub fn save_tasks(&self, buckets: &Buckets) -> Result<(), StorageError> {
        self.write_atomic(self.data_path(), buckets)
    }

    pub fn save_settings(&self, data: &SettingsFile) -> Result<(), StorageError> {
        self.write_atomic(self.root.join(SETTINGS_FILE), data)
    }

    /// Copies the pre-upgrade flat file aside before the store rewrites it in
    /// mapping form. Runs once; the copy is never read back by this crate.
    pub fn preserve_legacy_copy(&self) -> Result<(), StorageError> {
        fs::copy(self.data_path(), self.root.join(LEGACY_COPY_FILE))?;
        Ok(())
    }

    fn read_file(&self, path: PathBuf) -> Result<String, StorageError> {
        let mut file = File::open(path)?;
        let mut buf = String::new();
        file.read_to_string(&mut buf)?;
        Ok(buf)
    }

    fn write_atomic<T: Serialize>(&self, path: PathBuf, data: &T) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let temp_path = path.with_extension("tmp");
        let json = to_pretty_vec(data)?;
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&json)?;
            file.sync_all()?;
        }
        fs::rename(temp_path, path)?;
        Ok(())
    }
}

/// Four-space indentation, the layout the task file has always used.
fn to_pretty_vec<T: Serialize>(data: &T) -> Result<Vec<u8>, StorageError> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    data.serialize(&mut ser)?;
    Ok(buf)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
