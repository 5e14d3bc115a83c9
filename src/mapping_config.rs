use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingConfig {
    pub maps_dir: PathBuf,
    pub registry_path: PathBuf,
    pub log_dir: PathBuf,
    pub max_log_builds: usize,
}

impl Default for MappingConfig {
    fn default() -> Self {
        MappingConfig {
            maps_dir: PathBuf::from("versificationmaps"),
            registry_path: PathBuf::from("versifications"),
            log_dir: PathBuf::from("logs"),
            max_log_builds: 10,
        }
    }
}

impl MappingConfig {
    pub fn new(
        maps_dir: Option<PathBuf>,
        registry_path: Option<PathBuf>,
        log_dir: Option<PathBuf>,
        max_log_builds: usize,
    ) -> Self {
        let defaults = MappingConfig::default();
        MappingConfig {
            maps_dir: maps_dir.unwrap_or(defaults.maps_dir),
            registry_path: registry_path.unwrap_or(defaults.registry_path),
            log_dir: log_dir.unwrap_or(defaults.log_dir),
            max_log_builds,
        }
    }
}
