use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};

use crate::credentials::FileStore;
use crate::types::ScriptMeta;

/// Environment variable naming the directory that holds the key stores
pub const HOME_ENV: &str = "CHAPTERCAST_HOME";

const DEFAULT_STORE_DIR: &str = ".chaptercast";
const PRIMARY_STORE_FILE: &str = "keys.json";
const BACKUP_STORE_FILE: &str = "keys.backup.json";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store_dir: PathBuf,
}

impl AppConfig {
    /// Resolve the store directory: explicit override, then `$CHAPTERCAST_HOME`,
    /// then `./.chaptercast`
    pub fn from_override(path: Option<PathBuf>) -> Result<Self> {
        let env_dir = std::env::var_os(HOME_ENV).map(PathBuf::from);
        Self::resolve(path, env_dir)
    }

    fn resolve(path: Option<PathBuf>, env_dir: Option<PathBuf>) -> Result<Self> {
        let store_dir = match path.or(env_dir) {
            Some(custom) => ensure_dir(&custom)?,
            None => std::env::current_dir()
                .context("unable to resolve current directory")?
                .join(DEFAULT_STORE_DIR),
        };
        Ok(Self { store_dir })
    }

    pub fn primary_store(&self) -> FileStore {
        FileStore::new(self.store_dir.join(PRIMARY_STORE_FILE))
    }

    pub fn backup_store(&self) -> FileStore {
        FileStore::new(self.store_dir.join(BACKUP_STORE_FILE))
    }
}

fn ensure_dir(path: &Path) -> Result<PathBuf> {
    if path.exists() && !path.is_dir() {
        return Err(anyhow!("store path {:?} is not a directory", path));
    }
    Ok(path.to_path_buf())
}

/// Load script metadata from a file or inline JSON; defaults when neither is given
pub fn load_meta_from_sources(path: Option<&Path>, json: Option<&str>) -> Result<ScriptMeta> {
    if path.is_some() && json.is_some() {
        bail!("Provide script metadata via --meta-json or --meta-file, not both");
    }
    if let Some(p) = path {
        let data = std::fs::read_to_string(p)
            .with_context(|| format!("Failed to read metadata file {:?}", p))?;
        return parse_meta(&data);
    }
    if let Some(raw) = json {
        return parse_meta(raw);
    }
    Ok(ScriptMeta::default())
}

fn parse_meta(raw: &str) -> Result<ScriptMeta> {
    serde_json::from_str(raw).context("Failed to parse script metadata JSON")
}
