use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::Mutex,
};

const TMP_SUFFIX: &str = "tmp";

/// Checklist scope: one checked set per (week, category).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CheckedScope {
    pub week: i64,
    pub category: String,
}

impl CheckedScope {
    pub fn new(week: i64, category: impl Into<String>) -> Self {
        Self {
            week,
            category: category.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Category,
    MealSlot,
    CachedDataset,
    CachedCalendar,
    Checked(CheckedScope),
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageKey::Category => f.write_str("kd_cuisine"),
            StorageKey::MealSlot => f.write_str("kd_meal"),
            StorageKey::CachedDataset => f.write_str("kd_data_cache"),
            StorageKey::CachedCalendar => f.write_str("kd_calendar_cache"),
            StorageKey::Checked(scope) => {
                write!(f, "kd_checked_{}_{}", scope.week, scope.category)
            }
        }
    }
}

/// String key-value store the dashboard persists its settings and caches in.
pub trait Storage: Send + Sync {
    fn get(&self, key: &StorageKey) -> crate::Result<Option<String>>;
    fn set(&self, key: &StorageKey, value: &str) -> crate::Result<()>;
    fn remove(&self, key: &StorageKey) -> crate::Result<()>;
}

#[derive(Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.lock().map(|v| v.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &StorageKey) -> crate::Result<Option<String>> {
        Ok(self.values.lock()?.get(&key.to_string()).cloned())
    }

    fn set(&self, key: &StorageKey, value: &str) -> crate::Result<()> {
        self.values
            .lock()?
            .insert(key.to_string(), value.to_owned());

        Ok(())
    }

    fn remove(&self, key: &StorageKey) -> crate::Result<()> {
        self.values.lock()?.remove(&key.to_string());

        Ok(())
    }
}

/// Single JSON object on disk, rewritten atomically on every change.
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> crate::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> crate::Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let data = fs::read_to_string(&self.path)?;
        if data.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        Ok(serde_json::from_str(&data)?)
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> crate::Result<()> {
        let data = serde_json::to_string_pretty(values)?;
        write_atomic(&self.path, &data)
    }

    fn update(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> crate::Result<()> {
        let _guard = self.lock.lock()?;
        let mut values = self.read_all()?;
        f(&mut values);
        self.write_all(&values)
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &StorageKey) -> crate::Result<Option<String>> {
        let _guard = self.lock.lock()?;
        Ok(self.read_all()?.remove(&key.to_string()))
    }

    fn set(&self, key: &StorageKey, value: &str) -> crate::Result<()> {
        self.update(|values| {
            values.insert(key.to_string(), value.to_owned());
        })
    }

    fn remove(&self, key: &StorageKey) -> crate::Result<()> {
        self.update(|values| {
            values.remove(&key.to_string());
        })
    }
}

fn write_atomic(path: &Path, data: &str) -> crate::Result<()> {
    let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
        crate::bail!("invalid storage path {}", path.display());
    };

    let tmp = path.with_file_name(format!("{file_name}.{TMP_SUFFIX}"));
    {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(data.as_bytes())?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use temp_dir::TempDir;

    #[test]
    fn test_storage_key_strings() {
        assert_eq!(StorageKey::Category.to_string(), "kd_cuisine");
        assert_eq!(StorageKey::MealSlot.to_string(), "kd_meal");
        assert_eq!(
            StorageKey::Checked(CheckedScope::new(2890, "italian")).to_string(),
            "kd_checked_2890_italian"
        );
    }

    #[test]
    fn test_memory_storage_get_set_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get(&StorageKey::Category).unwrap(), None);

        storage.set(&StorageKey::Category, "thai").unwrap();
        assert_eq!(
            storage.get(&StorageKey::Category).unwrap().as_deref(),
            Some("thai")
        );

        storage.remove(&StorageKey::Category).unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_file_storage_persists_between_instances() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.child("state").join("state.json");

        let storage = FileStorage::new(&path)?;
        storage.set(&StorageKey::MealSlot, "Dinner")?;
        storage.set(&StorageKey::Category, "mexican")?;
        storage.remove(&StorageKey::Category)?;

        let reopened = FileStorage::new(&path)?;
        assert_eq!(reopened.get(&StorageKey::MealSlot)?.as_deref(), Some("Dinner"));
        assert_eq!(reopened.get(&StorageKey::Category)?, None);
        assert!(!path.with_file_name("state.json.tmp").exists());

        Ok(())
    }
}
