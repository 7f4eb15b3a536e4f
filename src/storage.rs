// Manages local file storage for the run-down.
//
// ⚠️ VERSION BUMP REQUIRED:
// Changes to the ScheduleItem serialization format require incrementing
// LOCAL_STORAGE_VERSION below.
use crate::context::AppContext;
use crate::model::ScheduleItem;
use anyhow::{Context, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// Version history:
// - v1: flat item list with ISO-8601 start/end
const LOCAL_STORAGE_VERSION: u32 = 1;

/// Wrapper struct for versioned local storage
#[derive(Serialize, Deserialize)]
struct LocalStorageData {
    #[serde(default)]
    version: u32,
    items: Vec<ScheduleItem>,
}

pub struct LocalStorage;

impl LocalStorage {
    fn get_lock_path(file_path: &Path) -> PathBuf {
        let mut name = file_path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    /// Runs `f` while holding an exclusive advisory lock next to `file_path`.
    pub fn with_lock<F, T>(file_path: &Path, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let lock_path = Self::get_lock_path(file_path);
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file {:?}", lock_path))?;

        file.lock_exclusive()?;
        let result = f();
        FileExt::unlock(&file)?;
        result
    }

    /// Atomic write: Write to .tmp file then rename
    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
        let path = path.as_ref();
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(tmp_path, path)?;
        Ok(())
    }

    /// Serializes items in the storage format (also used by `rundown export`).
    pub fn to_json_string(items: &[ScheduleItem]) -> Result<String> {
        let data = LocalStorageData {
            version: LOCAL_STORAGE_VERSION,
            items: items.to_vec(),
        };
        Ok(serde_json::to_string_pretty(&data)?)
    }

    /// Parses the storage format. A bare item array is accepted as well.
    pub fn from_json_str(json: &str) -> Result<Vec<ScheduleItem>> {
        if json.trim_start().starts_with('[') {
            let items: Vec<ScheduleItem> =
                serde_json::from_str(json).context("stored run-down is not valid JSON")?;
            return Ok(items);
        }
        let data: LocalStorageData =
            serde_json::from_str(json).context("stored run-down is malformed")?;
        if data.version > LOCAL_STORAGE_VERSION {
            anyhow::bail!(
                "stored run-down has version {}, this build understands up to {}",
                data.version,
                LOCAL_STORAGE_VERSION
            );
        }
        Ok(data.items)
    }

    pub fn save(ctx: &dyn AppContext, items: &[ScheduleItem]) -> Result<()> {
        let path = ctx.get_rundown_path()?;
        Self::with_lock(&path, || {
            let json = Self::to_json_string(items)?;
            Self::atomic_write(&path, json)?;
            Ok(())
        })?;
        log::debug!("Saved {} item(s) to {}", items.len(), path.display());
        Ok(())
    }

    /// Loads the stored run-down. A missing file is an empty run-down.
    pub fn load(ctx: &dyn AppContext) -> Result<Vec<ScheduleItem>> {
        let path = ctx.get_rundown_path()?;
        if !path.exists() {
            return Ok(vec![]);
        }
        Self::with_lock(&path, || {
            let json = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Self::from_json_str(&json).with_context(|| format!("Corrupt run-down file {}", path.display()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TestContext;

    #[test]
    fn test_load_missing_file_is_empty() {
        let ctx = TestContext::new();
        assert!(LocalStorage::load(&ctx).unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let ctx = TestContext::new();
        let path = ctx.get_rundown_path().unwrap();
        fs::write(&path, "{ not json").unwrap();
        assert!(LocalStorage::load(&ctx).is_err());
    }

    #[test]
    fn test_bad_item_field_reports_the_field() {
        let json = r#"{"version": 1, "items": [{"title": "x", "location": "A", "description": "B"}]}"#;
        let err = LocalStorage::from_json_str(json).unwrap_err();
        let chain = format!("{:#}", err);
        assert!(chain.contains("missing field `start`"), "{}", chain);
        assert!(!chain.contains("not valid JSON"), "{}", chain);
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let json = r#"{"version": 99, "items": []}"#;
        assert!(LocalStorage::from_json_str(json).is_err());
    }
}
