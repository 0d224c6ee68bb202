//! User-submitted corrections and custom sectors
//!
//! Corrections map a normalized company name to a sector chosen by the user;
//! they outrank every automatic stage of the cascade. Both stores persist to
//! JSON files and are re-read before each classification so corrections made
//! by a concurrent worker process become visible without locking
//! (last-write-wins, eventual consistency).

use crate::overrides::normalize_key;
use crate::taxonomy;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, info};

/// A single user correction with provenance metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CorrectionEntry {
    /// Sector chosen by the user
    pub sector: String,
    /// When the correction was submitted
    pub added: String,
    #[serde(default = "default_source")]
    pub source: String,
}

fn default_source() -> String {
    "user_confirmed".to_string()
}

/// On-disk corrections file structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CorrectionsFile {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub updated: String,
    /// Map of normalized name -> correction
    #[serde(default)]
    pub corrections: HashMap<String, CorrectionEntry>,
}

/// Process-wide correction store backed by a JSON file
pub struct CorrectionStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, CorrectionEntry>>,
}

impl CorrectionStore {
    /// Load corrections from a JSON file; a missing file yields an empty store
    pub fn load(path: &Path) -> Result<Self> {
        let entries = Self::read_file(path)?;
        if !entries.is_empty() {
            info!("Loaded {} user corrections from {:?}", entries.len(), path);
        }
        Ok(Self {
            path: path.to_path_buf(),
            entries: RwLock::new(entries),
        })
    }

    fn read_file(path: &Path) -> Result<HashMap<String, CorrectionEntry>> {
        if !path.exists() {
            debug!("No corrections file at {:?}, starting empty", path);
            return Ok(HashMap::new());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read corrections from {:?}", path))?;
        let file: CorrectionsFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse corrections from {:?}", path))?;
        Ok(file.corrections)
    }

    /// Re-read the backing file, replacing the in-memory map wholesale.
    /// Called before each classification so corrections written by other
    /// processes become visible. A vanished or corrupt file is ignored and
    /// the current map kept.
    pub fn reload(&self) {
        match Self::read_file(&self.path) {
            Ok(fresh) => {
                if let Ok(mut entries) = self.entries.write() {
                    *entries = fresh;
                }
            }
            Err(e) => debug!("Correction reload skipped: {}", e),
        }
    }

    /// Look up the forced sector for a raw company name
    pub fn get(&self, name: &str) -> Option<String> {
        let key = normalize_key(name);
        let entries = self.entries.read().ok()?;
        entries.get(&key).map(|e| e.sector.clone())
    }

    /// Upsert a correction by normalized key and persist the whole map.
    /// Last write wins on identical keys.
    pub fn save(&self, name: &str, sector: &str) -> Result<()> {
        let key = normalize_key(name);
        if key.is_empty() {
            return Err(anyhow!("Cannot save a correction for an empty name"));
        }

        let entry = CorrectionEntry {
            sector: sector.to_string(),
            added: chrono::Utc::now().format("%Y-%m-%d").to_string(),
            source: default_source(),
        };

        {
            let mut entries = self
                .entries
                .write()
                .map_err(|_| anyhow!("Failed to acquire write lock on corrections"))?;
            entries.insert(key.clone(), entry);
        }

        self.persist()?;
        info!("Saved correction: {} -> {}", key, sector);
        Ok(())
    }

    fn persist(&self) -> Result<()> {
        let entries = self
            .entries
            .read()
            .map_err(|_| anyhow!("Failed to acquire read lock on corrections"))?;

        let file = CorrectionsFile {
            version: "1.0.0".to_string(),
            updated: chrono::Utc::now().format("%Y-%m-%d").to_string(),
            corrections: entries.clone(),
        };

        write_json_atomic(&self.path, &serde_json::to_string_pretty(&file)?)
    }

    /// All distinct sector names referenced by corrections
    pub fn sectors(&self) -> Vec<String> {
        let mut sectors: Vec<String> = self
            .entries
            .read()
            .map(|e| e.values().map(|c| c.sector.clone()).collect::<Vec<_>>())
            .unwrap_or_default();
        sectors.sort();
        sectors.dedup();
        sectors
    }

    /// Snapshot of all corrections (normalized key -> sector)
    pub fn all(&self) -> HashMap<String, String> {
        self.entries
            .read()
            .map(|e| {
                e.iter()
                    .map(|(k, v)| (k.clone(), v.sector.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// On-disk custom sector list
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct CustomSectorsFile {
    #[serde(default)]
    version: String,
    #[serde(default)]
    updated: String,
    #[serde(default)]
    sectors: Vec<String>,
}

/// User-defined sectors added at runtime. They carry no NAF prefixes and no
/// keywords; inputs only reach them through explicit corrections, but they
/// extend the vocabulary offered to the AI classifier.
pub struct CustomSectorStore {
    path: PathBuf,
    sectors: RwLock<Vec<String>>,
}

impl CustomSectorStore {
    /// Load custom sectors from a JSON file; a missing file yields an empty list
    pub fn load(path: &Path) -> Result<Self> {
        let sectors = Self::read_file(path)?;
        if !sectors.is_empty() {
            info!("Loaded {} custom sectors from {:?}", sectors.len(), path);
        }
        Ok(Self {
            path: path.to_path_buf(),
            sectors: RwLock::new(sectors),
        })
    }

    fn read_file(path: &Path) -> Result<Vec<String>> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read custom sectors from {:?}", path))?;
        let file: CustomSectorsFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse custom sectors from {:?}", path))?;
        Ok(file.sectors)
    }

    /// Re-read the backing file, replacing the in-memory list
    pub fn reload(&self) {
        if let Ok(fresh) = Self::read_file(&self.path) {
            if let Ok(mut sectors) = self.sectors.write() {
                *sectors = fresh;
            }
        }
    }

    /// Register a sector name if it is neither built-in nor already present,
    /// and persist the list. Returns true when a new sector was added.
    pub fn register(&self, name: &str) -> Result<bool> {
        let name = name.trim();
        if name.is_empty() || taxonomy::is_builtin_sector(name) {
            return Ok(false);
        }

        {
            let mut sectors = self
                .sectors
                .write()
                .map_err(|_| anyhow!("Failed to acquire write lock on custom sectors"))?;
            if sectors.iter().any(|s| s == name) {
                return Ok(false);
            }
            sectors.push(name.to_string());
        }

        self.persist()?;
        info!("Registered custom sector: {}", name);
        Ok(true)
    }

    fn persist(&self) -> Result<()> {
        let sectors = self
            .sectors
            .read()
            .map_err(|_| anyhow!("Failed to acquire read lock on custom sectors"))?;

        let file = CustomSectorsFile {
            version: "1.0.0".to_string(),
            updated: chrono::Utc::now().format("%Y-%m-%d").to_string(),
            sectors: sectors.clone(),
        };

        write_json_atomic(&self.path, &serde_json::to_string_pretty(&file)?)
    }

    /// Current custom sector names
    pub fn list(&self) -> Vec<String> {
        self.sectors.read().map(|s| s.clone()).unwrap_or_default()
    }

    /// Whether a sector name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.sectors
            .read()
            .map(|s| s.iter().any(|x| x == name))
            .unwrap_or(false)
    }
}

/// Write a JSON payload via temp file + rename so concurrent readers never
/// observe a half-written map.
fn write_json_atomic(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create data directory {:?}", parent))?;
    }

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, content).with_context(|| format!("Failed to write {:?}", tmp))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("Failed to move {:?} into place", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty_store() {
        let tmp = TempDir::new().unwrap();
        let store = CorrectionStore::load(&tmp.path().join("corrections.json")).unwrap();
        assert!(store.is_empty());
        assert!(store.get("anything").is_none());
    }

    #[test]
    fn test_save_and_get_normalizes_keys() {
        let tmp = TempDir::new().unwrap();
        let store = CorrectionStore::load(&tmp.path().join("corrections.json")).unwrap();

        store.save("Foo", "Custom Widgets").unwrap();
        assert_eq!(store.get("FOO").as_deref(), Some("Custom Widgets"));
        assert_eq!(store.get("foo").as_deref(), Some("Custom Widgets"));
        assert_eq!(store.get("F.O.O.").as_deref(), Some("Custom Widgets"));
        assert_eq!(store.get("f-o-o").as_deref(), Some("Custom Widgets"));
        assert_eq!(store.get("F O O").as_deref(), Some("Custom Widgets"));
        assert!(store.get("FOOD").is_none());
    }

    #[test]
    fn test_last_write_wins() {
        let tmp = TempDir::new().unwrap();
        let store = CorrectionStore::load(&tmp.path().join("corrections.json")).unwrap();

        store.save("ACME", "Retail").unwrap();
        store.save("acme", "Tech / Software").unwrap();
        assert_eq!(store.get("ACME").as_deref(), Some("Tech / Software"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_persists_across_instances() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("corrections.json");

        {
            let store = CorrectionStore::load(&path).unwrap();
            store.save("ACME", "Retail").unwrap();
        }

        let reopened = CorrectionStore::load(&path).unwrap();
        assert_eq!(reopened.get("ACME").as_deref(), Some("Retail"));
    }

    #[test]
    fn test_reload_picks_up_external_writes() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("corrections.json");

        let reader = CorrectionStore::load(&path).unwrap();
        assert!(reader.get("ACME").is_none());

        // A second process writes a correction
        let writer = CorrectionStore::load(&path).unwrap();
        writer.save("ACME", "Retail").unwrap();

        assert!(reader.get("ACME").is_none());
        reader.reload();
        assert_eq!(reader.get("ACME").as_deref(), Some("Retail"));
    }

    #[test]
    fn test_sectors_deduplicated() {
        let tmp = TempDir::new().unwrap();
        let store = CorrectionStore::load(&tmp.path().join("corrections.json")).unwrap();

        store.save("A", "Custom Widgets").unwrap();
        store.save("B", "Custom Widgets").unwrap();
        store.save("C", "Retail").unwrap();

        assert_eq!(
            store.sectors(),
            vec!["Custom Widgets".to_string(), "Retail".to_string()]
        );
    }

    #[test]
    fn test_empty_name_rejected() {
        let tmp = TempDir::new().unwrap();
        let store = CorrectionStore::load(&tmp.path().join("corrections.json")).unwrap();
        assert!(store.save("  ", "Retail").is_err());
    }

    #[test]
    fn test_custom_sector_register() {
        let tmp = TempDir::new().unwrap();
        let store = CustomSectorStore::load(&tmp.path().join("custom_sectors.json")).unwrap();

        assert!(store.register("Custom Widgets").unwrap());
        assert!(store.contains("Custom Widgets"));
        // Re-registering is a no-op
        assert!(!store.register("Custom Widgets").unwrap());
        // Built-in sectors never become custom
        assert!(!store.register("Retail").unwrap());
        assert_eq!(store.list(), vec!["Custom Widgets".to_string()]);
    }

    #[test]
    fn test_custom_sector_persists() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("custom_sectors.json");

        {
            let store = CustomSectorStore::load(&path).unwrap();
            store.register("Custom Widgets").unwrap();
        }

        let reopened = CustomSectorStore::load(&path).unwrap();
        assert!(reopened.contains("Custom Widgets"));
    }
}
