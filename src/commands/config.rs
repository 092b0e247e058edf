use std::path::Path;

use crate::config::{get_config_from_file, AppConfig};
use crate::error::AppError;
use crate::state::{AppState, StateAccess};

pub fn get_config(state: &AppState) -> Result<AppConfig, AppError> {
    state.config()
}

pub fn update_config(state: &AppState, config: AppConfig) -> Result<(), AppError> {
    config.validate()?;
    log::info!("Configuration updated: {:?}", config);
    state.set_config(config)
}

/// Replaces the active configuration with the overrides found in `path`.
pub fn load_config_file(state: &AppState, path: impl AsRef<Path>) -> Result<AppConfig, AppError> {
    let config = get_config_from_file(path)?;
    update_config(state, config.clone())?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_update_config_validates() {
        let state = AppState::default();
        let bad = AppConfig {
            page_window: 6,
            ..AppConfig::default()
        };
        assert!(matches!(update_config(&state, bad), Err(AppError::InvalidConfig(_))));
        assert_eq!(get_config(&state).unwrap(), AppConfig::default());

        let good = AppConfig {
            page_size: 20,
            ..AppConfig::default()
        };
        update_config(&state, good.clone()).unwrap();
        assert_eq!(get_config(&state).unwrap(), good);
    }

    #[test]
    fn test_load_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"page_size": 5, "page_window": "3"}}"#).unwrap();
        let state = AppState::default();
        let config = load_config_file(&state, file.path()).unwrap();
        assert_eq!(config.page_size, 5);
        assert_eq!(get_config(&state).unwrap().page_window, 3);
    }
}
