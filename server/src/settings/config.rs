use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use crate::settings::config_model::SettingsConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to deserialize config.")]
    Serde(#[from] serde_yaml::Error),
    #[error("Failed to open config file")]
    Io(#[from] std::io::Error),
}

pub fn get_run_mode() -> String {
    dotenv::var("RUN_MODE").unwrap_or("production".to_string())
}

pub fn load_settings(path: impl AsRef<Path>) -> Result<SettingsConfig, ConfigError> {
    info!("Loading {}", path.as_ref().to_string_lossy());
    let mut file = File::open(path)?;
    let mut s = String::new();
    file.read_to_string(&mut s)?;
    let t: SettingsConfig = serde_yaml::from_str(&s)?;

    Ok(t)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_load_settings() {
        let settings = load_settings(format!("configs/{}.yaml", "test"))
            .expect("Failed to load settings file.");

        if let Err(err) = settings.validate() {
            panic!("Validation error: {}", err);
        }

        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 3003);
        assert_eq!(settings.database.pool_size, 4);
        assert_eq!(settings.upload.load_file(), PathBuf::from("target/load/test.csv"));
        assert_eq!(settings.training.year_init, 2017);
    }

    #[test]
    fn test_load_production_settings() {
        let settings = load_settings(format!("configs/{}.yaml", "production"))
            .expect("Failed to load settings file.");

        assert!(settings.validate().is_ok());
        assert_eq!(settings.upload.table_name, "t_test");
    }

    #[test]
    fn test_missing_settings_file() {
        let result = load_settings("configs/missing.yaml");

        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
