use anyhow::{anyhow, Result};
use std::path::PathBuf;

use crate::db::Database;
use crate::models::Settings;

pub const DATABASE_FILE: &str = "finboard.sqlite";
const UPLOAD_DELAY_KEY: &str = "upload_delay_ms";

pub fn database_path(data_dir: &str) -> Result<PathBuf> {
    let dir = PathBuf::from(data_dir);
    std::fs::create_dir_all(&dir).map_err(|e| anyhow!("Data dir {}: {}", dir.display(), e))?;
    Ok(dir.join(DATABASE_FILE))
}

/// Reads settings from the database, falling back to defaults for anything
/// missing or unreadable.
pub fn load_settings(db: &Database) -> Settings {
    let defaults = Settings::default();
    let upload_delay_ms = db
        .get_setting(UPLOAD_DELAY_KEY)
        .ok()
        .flatten()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(defaults.upload_delay_ms);
    Settings { upload_delay_ms }
}

pub fn save_settings(db: &Database, settings: &Settings) -> Result<()> {
    db.set_setting(UPLOAD_DELAY_KEY, &settings.upload_delay_ms.to_string())?;
    Ok(())
}
