use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Built dashboard bundle, served for every non-API path.
    #[serde(default = "default_static_root")]
    pub static_root: PathBuf,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: default_host(),
            port: default_port(),
            static_root: default_static_root(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3003
}

fn default_static_root() -> PathBuf {
    PathBuf::from("build")
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub connection_string: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
}

impl DatabaseConfig {
    /// `DATABASE_CONNECTION_STRING` wins over the file.
    pub fn get_connection_string(&self) -> String {
        dotenv::var("DATABASE_CONNECTION_STRING").unwrap_or(self.connection_string.clone())
    }
}

fn default_pool_size() -> usize {
    16
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UploadConfig {
    /// Directory shared with the database server, where uploads are written.
    pub load_dir: PathBuf,
    #[serde(default = "default_file_name")]
    pub file_name: String,
    #[serde(default = "default_table_name")]
    pub table_name: String,
    #[serde(default = "default_foreign_server")]
    pub foreign_server: String,
}

impl UploadConfig {
    pub fn load_file(&self) -> PathBuf {
        self.load_dir.join(&self.file_name)
    }
}

fn default_file_name() -> String {
    "test.csv".to_string()
}

fn default_table_name() -> String {
    "t_test".to_string()
}

fn default_foreign_server() -> String {
    "load_dir".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TrainingConfig {
    /// First year of the history the parameter search fits on.
    #[serde(default = "default_year_init")]
    pub year_init: i32,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            year_init: default_year_init(),
        }
    }
}

fn default_year_init() -> i32 {
    2017
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SettingsConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub upload: UploadConfig,
    #[serde(default)]
    pub training: TrainingConfig,
}

impl SettingsConfig {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.server.port == 0 {
            return Err("server.port must not be 0");
        }

        if self.database.get_connection_string().trim().is_empty() {
            return Err("database.connection_string is required");
        }

        if self.database.pool_size == 0 {
            return Err("database.pool_size must be at least 1");
        }

        // Both names are spliced into DDL, parameters are not allowed there.
        if !is_identifier(&self.upload.table_name) {
            return Err("upload.table_name must be a plain SQL identifier");
        }

        if !is_identifier(&self.upload.foreign_server) {
            return Err("upload.foreign_server must be a plain SQL identifier");
        }

        if self.upload.file_name.is_empty() || self.upload.file_name.contains(&['/', '\\'][..]) {
            return Err("upload.file_name must be a bare file name");
        }

        Ok(())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
