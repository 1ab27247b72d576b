//! CLI configuration loading.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use filter_gen::GeneratorConfig;
use serde::Deserialize;

/// Layout of a `--config` file.
///
/// ```toml
/// [odds]
/// corrupt_opcode = 10
/// zero_operand = 2
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub odds: GeneratorConfig,
}

/// Load generator odds from a TOML file. Missing keys keep their defaults.
pub fn load(path: &Path) -> Result<GeneratorConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let file: FileConfig = toml::from_str(&text)
        .with_context(|| format!("Failed to parse config: {}", path.display()))?;
    Ok(file.odds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let file: FileConfig = toml::from_str("[odds]\njt_noise = 0\n").unwrap();
        assert_eq!(
            file.odds,
            GeneratorConfig {
                jt_noise: 0,
                ..GeneratorConfig::default()
            }
        );
    }

    #[test]
    fn empty_file_is_default() {
        let file: FileConfig = toml::from_str("").unwrap();
        assert_eq!(file.odds, GeneratorConfig::default());
    }
}
