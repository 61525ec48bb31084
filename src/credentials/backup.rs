use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::StoreError;

pub const BACKUP_VERSION: &str = "1.0";

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("no API keys to export")]
    Empty,
    #[error("invalid key backup document: {0}")]
    Invalid(#[from] serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Portable snapshot of the key ring, written as pretty JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyBackup {
    /// Required on import; a document without it is rejected
    pub api_keys: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_api_key_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_switch_key: Option<bool>,
    #[serde(default)]
    pub export_date: String,
    #[serde(default)]
    pub version: String,
}

impl KeyBackup {
    pub(super) fn new(keys: &[String], selected: usize, auto_switch: bool) -> Self {
        Self {
            api_keys: keys.to_vec(),
            current_api_key_index: Some(selected),
            auto_switch_key: Some(auto_switch),
            export_date: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            version: BACKUP_VERSION.to_string(),
        }
    }

    pub fn to_json(&self) -> Result<String, BackupError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self, BackupError> {
        Ok(serde_json::from_str(raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_camel_case_fields() {
        let backup = KeyBackup::new(&["k1".to_string()], 0, true);
        let value: serde_json::Value = serde_json::from_str(&backup.to_json().unwrap()).unwrap();
        assert_eq!(value["apiKeys"][0], "k1");
        assert_eq!(value["currentApiKeyIndex"], 0);
        assert_eq!(value["autoSwitchKey"], true);
        assert_eq!(value["version"], "1.0");
        assert!(value["exportDate"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let backup = KeyBackup::from_json(r#"{"apiKeys": ["a", "b"]}"#).unwrap();
        assert_eq!(backup.api_keys, ["a".to_string(), "b".to_string()]);
        assert_eq!(backup.current_api_key_index, None);
        assert_eq!(backup.auto_switch_key, None);
    }

    #[test]
    fn rejects_documents_without_key_array() {
        assert!(matches!(
            KeyBackup::from_json(r#"{"currentApiKeyIndex": 0}"#),
            Err(BackupError::Invalid(_))
        ));
        assert!(matches!(
            KeyBackup::from_json(r#"{"apiKeys": "AIzaNotAList"}"#),
            Err(BackupError::Invalid(_))
        ));
    }
}
