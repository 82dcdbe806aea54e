use anyhow::{Context, Result};
use platte_game::JourneyCfg;
use std::{fs, path::Path};

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Load tuning from an optional JSON overlay. Fields the file omits keep
/// their defaults.
pub fn load_config(path: Option<&Path>) -> Result<JourneyCfg> {
    let cfg = match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str::<JourneyCfg>(&raw)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => JourneyCfg::default(),
    };
    cfg.validate().context("invalid journey configuration")?;
    Ok(cfg)
}
