use directories::ProjectDirs;
use std::{
    env,
    path::PathBuf,
};

pub(crate) const ENV_PREFIX: &str = "CLC";

lazy_static::lazy_static! {
    static ref CONFIG_FOLDER: Option<PathBuf> = env::var(format!("{ENV_PREFIX}_INVENTORY_CONFIG"))
        .ok()
        .map(PathBuf::from);
}

/// Directory holding the optional `config.yaml`.
///
/// `CLC_INVENTORY_CONFIG` wins over the platform config directory.
pub fn get_config_dir() -> PathBuf {
    if let Some(s) = CONFIG_FOLDER.clone() {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.config_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".config")
    }
}

fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "clc", "clc-inventory")
}
