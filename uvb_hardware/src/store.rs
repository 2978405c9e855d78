//! TOML-file-backed key/value store standing in for the device's non-volatile preferences.
//!
//! Layout: one table per namespace, one float per key.
//!
//! ```toml
//! [calibration]
//! offset = 0.012
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;
use uvb_traits::{HwResult, Store};

use crate::error::{HwError, Result};

type Tables = BTreeMap<String, BTreeMap<String, f32>>;

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    namespace: String,
    tables: Tables,
}

impl FileStore {
    /// Open `path` scoped to `namespace`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>, namespace: &str) -> Result<Self> {
        let path = path.into();
        let tables = match std::fs::read_to_string(&path) {
            Ok(text) => toml::from_str::<Tables>(&text)
                .map_err(|e| HwError::Store(format!("parse {}: {e}", path.display())))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Tables::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            namespace: namespace.to_string(),
            tables,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the file with `tables`: write `<path>.new`, fsync, rename over `path`.
    fn persist(&self, tables: &Tables) -> Result<()> {
        let text =
            toml::to_string(tables).map_err(|e| HwError::Store(format!("serialize: {e}")))?;
        let tmp = self.path.with_extension("new");
        {
            let mut f = fs::File::create(&tmp)?;
            f.write_all(text.as_bytes())?;
            f.sync_all()?;
        }
        fs::rename(tmp, &self.path)?;
        Ok(())
    }
}

impl Store for FileStore {
    fn get_f32(&self, key: &str, default: f32) -> f32 {
        self.tables
            .get(&self.namespace)
            .and_then(|t| t.get(key))
            .copied()
            .unwrap_or(default)
    }

    fn put_f32(&mut self, key: &str, value: f32) -> HwResult<()> {
        if !value.is_finite() {
            return Err(Box::new(HwError::Store(format!(
                "refusing to persist non-finite {key}={value}"
            ))));
        }
        // Memory only changes once the file does.
        let mut next = self.tables.clone();
        next.entry(self.namespace.clone())
            .or_default()
            .insert(key.to_string(), value);
        self.persist(&next)?;
        self.tables = next;
        debug!(namespace = %self.namespace, key, value, path = %self.path.display(), "store write");
        Ok(())
    }
}
