use std::{env, path::PathBuf};

const CONFIG_FILE: &str = ".calling-composite.toml";

/// Load config file content
///
/// Searches in:
/// 1. Current working directory (`.calling-composite.toml`)
/// 2. Home directory (`~/.calling-composite.toml`)
/// 3. The platform config directory (`config.toml`)
///
/// Returns the file content if found, None otherwise.
pub fn load_config_file() -> Option<String> {
    candidates()
        .into_iter()
        .find_map(|path| match std::fs::read_to_string(&path) {
            Ok(content) => {
                log::debug!("Loaded config from {}", path.display());
                Some(content)
            }
            Err(_) => None,
        })
}

fn candidates() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE)];
    if let Some(home) = env::var_os("HOME") {
        paths.push(PathBuf::from(home).join(CONFIG_FILE));
    }
    if let Some(base) = dirs::config_dir() {
        paths.push(base.join(crate::paths::APP_NAME).join("config.toml"));
    }
    paths
}
