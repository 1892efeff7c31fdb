use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upscaler: UpscalerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub logs: LogsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpscalerConfig {
    #[serde(default = "default_executable")]
    pub executable: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_tile_size")]
    pub tile_size: u32,
    #[serde(default = "default_jobs")]
    pub jobs: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_base_dir")]
    pub base_dir: String,
    #[serde(default = "default_temp_dir")]
    pub temp_dir: String,
    #[serde(default = "default_results_dir")]
    pub results_dir: String,
    #[serde(default = "default_index_page")]
    pub index_page: String,
}

impl UpscalerConfig {
    pub fn executable_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.executable)
    }
}

impl StorageConfig {
    pub fn base_path(&self) -> PathBuf {
        PathBuf::from(&self.base_dir)
    }

    pub fn temp_path(&self) -> PathBuf {
        self.base_path().join(&self.temp_dir)
    }

    pub fn results_path(&self) -> PathBuf {
        self.base_path().join(&self.results_dir)
    }

    pub fn index_path(&self) -> PathBuf {
        self.base_path().join(&self.index_page)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            logs: LogsConfig::default(),
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for UpscalerConfig {
    fn default() -> Self {
        Self {
            executable: default_executable(),
            model: default_model(),
            tile_size: default_tile_size(),
            jobs: default_jobs(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            temp_dir: default_temp_dir(),
            results_dir: default_results_dir(),
            index_page: default_index_page(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_executable() -> String {
    "realesrgan-ncnn-vulkan".to_string()
}

fn default_model() -> String {
    "realesrgan-x4plus".to_string()
}

fn default_tile_size() -> u32 {
    256
}

fn default_jobs() -> String {
    "1:1:1".to_string()
}

fn default_base_dir() -> String {
    ".".to_string()
}

fn default_temp_dir() -> String {
    "temp".to_string()
}

fn default_results_dir() -> String {
    "results".to_string()
}

fn default_index_page() -> String {
    "web_interface.html".to_string()
}
