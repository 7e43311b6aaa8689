use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rustc_hash::FxHashMap;

use super::ServiceError;
use crate::model::ReactionDesc;

/// Store of validated reaction records keyed by reaction id.
pub trait ReactionCache {
    /// Record stored under `id`, if any.
    fn get(&self, id: &str) -> Result<Option<ReactionDesc>, ServiceError>;
    /// Store `record` under `id`, replacing any previous entry.
    fn put(&self, id: &str, record: &ReactionDesc) -> Result<(), ServiceError>;
}

/// Directory of pretty-printed JSON files, one `<id>.json` per record.
#[derive(Debug, Clone)]
pub struct FileReactionCache {
    root: PathBuf,
}

impl FileReactionCache {
    /// Cache rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Cache directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `id`.
    #[must_use]
    pub fn path_for(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }
}

fn valid_id(id: &str) -> Result<(), ServiceError> {
    if !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(ServiceError::Cache(format!("invalid reaction id {id:?}")))
    }
}

impl ReactionCache for FileReactionCache {
    fn get(&self, id: &str) -> Result<Option<ReactionDesc>, ServiceError> {
        valid_id(id)?;
        let path = self.path_for(id);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ServiceError::Cache(format!(
                    "{}: {e}",
                    path.display()
                )))
            }
        };
        serde_json::from_str(&text).map(Some).map_err(|e| {
            ServiceError::Cache(format!("{}: {e}", path.display()))
        })
    }

    fn put(&self, id: &str, record: &ReactionDesc) -> Result<(), ServiceError> {
        valid_id(id)?;
        let io_err = |p: &Path, e: std::io::Error| {
            ServiceError::Cache(format!("{}: {e}", p.display()))
        };

        fs::create_dir_all(&self.root).map_err(|e| io_err(&self.root, e))?;
        let json = serde_json::to_string_pretty(record)
            .map_err(|e| ServiceError::Cache(e.to_string()))?;

        // Write beside the target and rename so readers never see a
        // partial file.
        let path = self.path_for(id);
        let tmp = self.root.join(format!("{id}.json.tmp"));
        fs::write(&tmp, json).map_err(|e| io_err(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| io_err(&path, e))?;
        log::debug!("cached reaction {id} at {}", path.display());
        Ok(())
    }
}

/// In-process cache, mostly for tests and one-shot runs.
#[derive(Debug, Default)]
pub struct MemoryReactionCache {
    entries: Mutex<FxHashMap<String, ReactionDesc>>,
}

impl MemoryReactionCache {
    /// Empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().map_or(0, |m| m.len())
    }

    /// Whether the cache holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> ServiceError {
    ServiceError::Cache("memory cache lock poisoned".to_owned())
}

impl ReactionCache for MemoryReactionCache {
    fn get(&self, id: &str) -> Result<Option<ReactionDesc>, ServiceError> {
        Ok(self.entries.lock().map_err(poisoned)?.get(id).cloned())
    }

    fn put(&self, id: &str, record: &ReactionDesc) -> Result<(), ServiceError> {
        let _ = self
            .entries
            .lock()
            .map_err(poisoned)?
            .insert(id.to_owned(), record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc(equation: &str) -> ReactionDesc {
        ReactionDesc {
            reaction_id: Some("0123456789abcdef".into()),
            prompt: Some("test".into()),
            reactants: Vec::new(),
            products: Vec::new(),
            reaction: equation.into(),
            reaction_description: String::new(),
        }
    }

    #[test]
    fn file_cache_miss_then_hit() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileReactionCache::new(dir.path().join("cache"));
        assert!(cache.get("0123456789abcdef").unwrap().is_none());

        cache.put("0123456789abcdef", &desc("A -> B")).unwrap();
        assert!(cache.path_for("0123456789abcdef").is_file());
        let back = cache.get("0123456789abcdef").unwrap().unwrap();
        assert_eq!(back, desc("A -> B"));
    }

    #[test]
    fn file_cache_overwrites_and_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileReactionCache::new(dir.path());
        cache.put("abc", &desc("A -> B")).unwrap();
        cache.put("abc", &desc("C -> D")).unwrap();
        assert_eq!(cache.get("abc").unwrap().unwrap().reaction, "C -> D");
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("abc.json")]);
    }

    #[test]
    fn file_cache_rejects_path_like_ids() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileReactionCache::new(dir.path());
        assert!(matches!(
            cache.get("../etc"),
            Err(ServiceError::Cache(_))
        ));
        assert!(cache.put("", &desc("x")).is_err());
    }

    #[test]
    fn file_cache_reports_corrupt_entries() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileReactionCache::new(dir.path());
        fs::write(cache.path_for("bad"), "{ not json").unwrap();
        assert!(matches!(cache.get("bad"), Err(ServiceError::Cache(_))));
    }

    #[test]
    fn memory_cache_round_trip() {
        let cache = MemoryReactionCache::new();
        assert!(cache.is_empty());
        cache.put("k", &desc("A -> B")).unwrap();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("k").unwrap().unwrap().reaction, "A -> B");
        assert!(cache.get("other").unwrap().is_none());
    }
}
