//! API key ring for the generative-AI collaborator
//!
//! Keys, the selected index and the auto-switch flag live in an explicit
//! `KeyRing` backed by two injected stores: a persistent primary and a
//! backup used to recover keys when the primary has lost them.

mod backup;
mod rotation;
mod store;

use std::fmt::Display;

use tracing::{info, warn};

pub use backup::{BackupError, KeyBackup, BACKUP_VERSION};
pub use rotation::{with_key_rotation, Rotated, RotationError};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};

const KEYS_ENTRY: &str = "apiKeys";
const INDEX_ENTRY: &str = "currentApiKeyIndex";
const AUTO_SWITCH_ENTRY: &str = "autoSwitchKey";
const BACKUP_KEYS_ENTRY: &str = "apiKeys_backup";

/// Show only the first and last four characters of a key
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

#[derive(Debug)]
pub struct KeyRing<P, B> {
    primary: P,
    backup: B,
    keys: Vec<String>,
    selected: usize,
    auto_switch: bool,
}

impl<P: KeyValueStore, B: KeyValueStore> KeyRing<P, B> {
    /// Load state from `primary`, restoring keys from `backup` if the primary has none
    pub fn load(primary: P, backup: B) -> Result<Self, StoreError> {
        let mut ring = Self {
            primary,
            backup,
            keys: Vec::new(),
            selected: 0,
            auto_switch: true,
        };

        ring.keys = parse_keys(ring.primary.get(KEYS_ENTRY)?.as_deref());
        if ring.keys.is_empty() {
            let restored = parse_keys(ring.backup.get(BACKUP_KEYS_ENTRY)?.as_deref());
            if !restored.is_empty() {
                info!(count = restored.len(), "restored API keys from backup store");
                ring.keys = restored;
                ring.save_keys_to_primary()?;
            }
        }

        if let Some(raw) = ring.primary.get(INDEX_ENTRY)? {
            match raw.trim().parse::<usize>() {
                Ok(index) if index < ring.keys.len() => ring.selected = index,
                Ok(index) => warn!(index, "stored key index out of range; using 0"),
                Err(err) => warn!(%err, "ignoring unreadable key index"),
            }
        }
        if let Some(raw) = ring.primary.get(AUTO_SWITCH_ENTRY)? {
            match serde_json::from_str::<bool>(&raw) {
                Ok(flag) => ring.auto_switch = flag,
                Err(err) => warn!(%err, "ignoring unreadable auto-switch flag"),
            }
        }

        Ok(ring)
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn auto_switch(&self) -> bool {
        self.auto_switch
    }

    /// Add a key; returns `false` for blank or duplicate input
    pub fn add(&mut self, key: &str) -> Result<bool, StoreError> {
        let key = key.trim();
        if key.is_empty() {
            warn!("refusing blank API key");
            return Ok(false);
        }
        if self.keys.iter().any(|existing| existing == key) {
            warn!("API key already present");
            return Ok(false);
        }
        self.keys.push(key.to_string());
        if self.keys.len() == 1 {
            self.set_selected(0)?;
        }
        self.save_keys_to_primary()?;
        self.save_keys_to_backup()?;
        info!(count = self.keys.len(), "added API key");
        Ok(true)
    }

    /// Remove the key at `index`, shifting the selection down when it sat at or after it
    pub fn remove(&mut self, index: usize) -> Result<Option<String>, StoreError> {
        if index >= self.keys.len() {
            return Ok(None);
        }
        let removed = self.keys.remove(index);
        if self.keys.is_empty() {
            self.clear()?;
        } else {
            if self.selected >= index {
                self.set_selected(self.selected.saturating_sub(1))?;
            }
            self.save_keys_to_primary()?;
            self.save_keys_to_backup()?;
        }
        Ok(Some(removed))
    }

    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.keys.clear();
        self.selected = 0;
        self.primary.remove(KEYS_ENTRY)?;
        self.primary.remove(INDEX_ENTRY)?;
        self.backup.remove(BACKUP_KEYS_ENTRY)?;
        Ok(())
    }

    /// Select the key used first by the next call; returns `false` when out of range
    pub fn select(&mut self, index: usize) -> Result<bool, StoreError> {
        if index >= self.keys.len() {
            return Ok(false);
        }
        self.set_selected(index)?;
        Ok(true)
    }

    pub fn set_auto_switch(&mut self, enabled: bool) -> Result<(), StoreError> {
        self.auto_switch = enabled;
        self.primary
            .set(AUTO_SWITCH_ENTRY, if enabled { "true" } else { "false" })
    }

    /// Snapshot of the ring for `import_backup`; refuses an empty ring
    pub fn export_backup(&self) -> Result<KeyBackup, BackupError> {
        if self.keys.is_empty() {
            return Err(BackupError::Empty);
        }
        Ok(KeyBackup::new(&self.keys, self.selected, self.auto_switch))
    }

    /// Replace the ring with the keys of `backup`; returns the number of keys kept.
    /// Index and auto-switch flag are taken over only when the document carries them.
    pub fn import_backup(&mut self, backup: KeyBackup) -> Result<usize, BackupError> {
        let mut keys: Vec<String> = Vec::with_capacity(backup.api_keys.len());
        for key in backup.api_keys {
            let key = key.trim();
            if !key.is_empty() && !keys.iter().any(|existing| existing == key) {
                keys.push(key.to_string());
            }
        }
        if keys.is_empty() {
            self.clear()?;
            return Ok(0);
        }

        self.keys = keys;
        self.save_keys_to_primary()?;
        self.save_keys_to_backup()?;

        let selected = match backup.current_api_key_index {
            Some(index) if index < self.keys.len() => index,
            Some(index) => {
                warn!(index, "imported key index out of range; using 0");
                0
            }
            None if self.selected < self.keys.len() => self.selected,
            None => 0,
        };
        self.set_selected(selected)?;
        if let Some(enabled) = backup.auto_switch_key {
            self.set_auto_switch(enabled)?;
        }

        info!(count = self.keys.len(), "imported API keys");
        Ok(self.keys.len())
    }

    /// Run `call` against the selected key, rotating through the ring on failure
    /// when auto-switch is on. The key that succeeded becomes the selection.
    pub fn call<T, E, F>(&mut self, call: F) -> Result<T, RotationError<E>>
    where
        E: Display,
        F: FnMut(&str) -> Result<T, E>,
    {
        let max_attempts = if self.auto_switch { self.keys.len() } else { 1 };
        let rotated = rotation::rotate(&self.keys, self.selected, max_attempts, call)?;
        if rotated.key_index != self.selected {
            info!(from = self.selected, to = rotated.key_index, "switched API key");
            if let Err(err) = self.set_selected(rotated.key_index) {
                warn!(%err, "failed to persist switched key index");
            }
        }
        Ok(rotated.value)
    }

    fn set_selected(&mut self, index: usize) -> Result<(), StoreError> {
        self.selected = index;
        self.primary.set(INDEX_ENTRY, &index.to_string())
    }

    fn save_keys_to_primary(&mut self) -> Result<(), StoreError> {
        let raw = encode_keys(&self.keys);
        self.primary.set(KEYS_ENTRY, &raw)
    }

    fn save_keys_to_backup(&mut self) -> Result<(), StoreError> {
        let raw = encode_keys(&self.keys);
        self.backup.set(BACKUP_KEYS_ENTRY, &raw)
    }
}

fn encode_keys(keys: &[String]) -> String {
    serde_json::Value::from(keys.to_vec()).to_string()
}

fn parse_keys(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(keys) => keys,
        Err(err) => {
            warn!(%err, "ignoring unreadable stored API keys");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring() -> KeyRing<MemoryStore, MemoryStore> {
        KeyRing::load(MemoryStore::new(), MemoryStore::new()).unwrap()
    }

    #[test]
    fn masks_keys() {
        assert_eq!(mask_key("short"), "****");
        assert_eq!(mask_key("AIzaSyABCDEFGH1234"), "AIza...1234");
    }

    #[test]
    fn add_trims_and_rejects_duplicates() {
        let mut ring = ring();
        assert!(ring.add("  key-one  ").unwrap());
        assert!(!ring.add("key-one").unwrap());
        assert!(!ring.add("   ").unwrap());
        assert_eq!(ring.keys(), ["key-one".to_string()]);
        assert_eq!(ring.selected(), 0);
    }

    #[test]
    fn restores_from_backup_when_primary_is_empty() {
        let mut backup = MemoryStore::new();
        backup.set(BACKUP_KEYS_ENTRY, r#"["k1","k2"]"#).unwrap();

        let ring = KeyRing::load(MemoryStore::new(), backup).unwrap();
        assert_eq!(ring.keys(), ["k1".to_string(), "k2".to_string()]);
        assert_eq!(
            ring.primary.get(KEYS_ENTRY).unwrap().as_deref(),
            Some(r#"["k1","k2"]"#)
        );
    }

    #[test]
    fn loads_index_and_flag() {
        let mut primary = MemoryStore::new();
        primary.set(KEYS_ENTRY, r#"["a","b","c"]"#).unwrap();
        primary.set(INDEX_ENTRY, "2").unwrap();
        primary.set(AUTO_SWITCH_ENTRY, "false").unwrap();

        let ring = KeyRing::load(primary, MemoryStore::new()).unwrap();
        assert_eq!(ring.selected(), 2);
        assert!(!ring.auto_switch());
    }

    #[test]
    fn remove_shifts_selection_and_clears_when_empty() {
        let mut ring = ring();
        for key in ["a", "b", "c"] {
            ring.add(key).unwrap();
        }
        ring.select(2).unwrap();

        assert_eq!(ring.remove(1).unwrap().as_deref(), Some("b"));
        assert_eq!(ring.selected(), 1);
        assert_eq!(ring.remove(9).unwrap(), None);

        ring.remove(0).unwrap();
        ring.remove(0).unwrap();
        assert!(ring.keys().is_empty());
        assert!(ring.primary.get(KEYS_ENTRY).unwrap().is_none());
        assert!(ring.backup.get(BACKUP_KEYS_ENTRY).unwrap().is_none());
    }

    #[test]
    fn export_refuses_empty_ring() {
        assert!(matches!(ring().export_backup(), Err(BackupError::Empty)));
    }

    #[test]
    fn backup_round_trips_into_fresh_ring() {
        let mut source = ring();
        for key in ["a-key", "b-key", "c-key"] {
            source.add(key).unwrap();
        }
        source.select(2).unwrap();
        source.set_auto_switch(false).unwrap();
        let raw = source.export_backup().unwrap().to_json().unwrap();

        let mut target = ring();
        let imported = target.import_backup(KeyBackup::from_json(&raw).unwrap()).unwrap();
        assert_eq!(imported, 3);
        assert_eq!(target.keys(), source.keys());
        assert_eq!(target.selected(), 2);
        assert!(!target.auto_switch());
        assert_eq!(
            target.backup.get(BACKUP_KEYS_ENTRY).unwrap().as_deref(),
            Some(r#"["a-key","b-key","c-key"]"#)
        );
    }

    #[test]
    fn import_without_index_or_flag_keeps_settings() {
        let mut ring = ring();
        let backup = KeyBackup::from_json(r#"{"apiKeys": [" x-key ", "x-key", "", "y-key"]}"#).unwrap();
        assert_eq!(ring.import_backup(backup).unwrap(), 2);
        assert_eq!(ring.keys(), ["x-key".to_string(), "y-key".to_string()]);
        assert_eq!(ring.selected(), 0);
        assert!(ring.auto_switch());
    }

    #[test]
    fn import_clamps_out_of_range_index() {
        let mut ring = ring();
        let backup =
            KeyBackup::from_json(r#"{"apiKeys": ["only"], "currentApiKeyIndex": 4}"#).unwrap();
        ring.import_backup(backup).unwrap();
        assert_eq!(ring.selected(), 0);
    }

    #[test]
    fn call_switches_to_working_key() {
        let mut ring = ring();
        for key in ["bad", "good"] {
            ring.add(key).unwrap();
        }
        let value = ring
            .call(|key| if key == "good" { Ok(key.len()) } else { Err("401") })
            .unwrap();
        assert_eq!(value, 4);
        assert_eq!(ring.selected(), 1);
        assert_eq!(ring.primary.get(INDEX_ENTRY).unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn call_without_auto_switch_tries_once() {
        let mut ring = ring();
        for key in ["bad", "good"] {
            ring.add(key).unwrap();
        }
        ring.set_auto_switch(false).unwrap();
        let mut attempts = 0;
        let result: Result<(), _> = ring.call(|_| {
            attempts += 1;
            Err("401")
        });
        assert_eq!(
            result,
            Err(RotationError::Exhausted {
                attempts: 1,
                last: "401"
            })
        );
        assert_eq!(attempts, 1);
    }
}
