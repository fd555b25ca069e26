// src/config.rs

use std::{collections::HashSet, path::PathBuf};

pub const INPUT_FILE: &str = "cleaned_data.csv";
pub const OUTPUT_FILE: &str = "data/aba-data.js";
pub const EXCLUDED_REGIONS: &[&str] = &["WV", "DC"];

/// Where to read from, where to write to, and which regions to drop.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub excluded_regions: HashSet<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(INPUT_FILE),
            output_path: PathBuf::from(OUTPUT_FILE),
            excluded_regions: EXCLUDED_REGIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Config {
    /// File name of the input, as shown in the generated header.
    pub fn source_name(&self) -> String {
        self.input_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.input_path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_constants() {
        let cfg = Config::default();
        assert_eq!(cfg.input_path, PathBuf::from("cleaned_data.csv"));
        assert_eq!(cfg.output_path, PathBuf::from("data/aba-data.js"));
        assert!(cfg.excluded_regions.contains("WV"));
        assert!(cfg.excluded_regions.contains("DC"));
        assert_eq!(cfg.excluded_regions.len(), 2);
        assert_eq!(cfg.source_name(), "cleaned_data.csv");
    }

    #[test]
    fn source_name_is_the_file_name() {
        let cfg = Config {
            input_path: PathBuf::from("in/rates.csv"),
            ..Config::default()
        };
        assert_eq!(cfg.source_name(), "rates.csv");
        assert_eq!(cfg.output_path, PathBuf::from(OUTPUT_FILE));
    }
}
