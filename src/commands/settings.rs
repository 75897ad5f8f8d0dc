use serde::Deserialize;

use crate::config;
use crate::models::Settings;
use crate::services::state::AppState;

use super::lock_store;

#[derive(Debug, Default, Deserialize)]
pub struct SettingsPayload {
    pub upload_delay_ms: Option<u64>,
}

pub fn get_settings(state: &AppState) -> Result<Settings, String> {
    let store = lock_store(state)?;
    Ok(config::load_settings(store.database()))
}

pub fn save_settings(payload: SettingsPayload, state: &AppState) -> Result<Settings, String> {
    let mut settings = get_settings(state)?;
    if let Some(delay) = payload.upload_delay_ms {
        settings.upload_delay_ms = delay;
    }

    {
        let store = lock_store(state)?;
        config::save_settings(store.database(), &settings).map_err(|e| e.to_string())?;
    }
    state
        .update_settings(settings.clone())
        .map_err(|e| e.to_string())?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support;

    #[test]
    fn saved_delay_is_persisted_and_applied() {
        let state = test_support::state();
        assert_eq!(get_settings(&state).unwrap().upload_delay_ms, 1500);

        let saved = save_settings(
            SettingsPayload {
                upload_delay_ms: Some(250),
            },
            &state,
        )
        .unwrap();

        assert_eq!(saved.upload_delay_ms, 250);
        assert_eq!(get_settings(&state).unwrap().upload_delay_ms, 250);
        assert_eq!(state.settings.lock().unwrap().upload_delay_ms, 250);
    }
}
