pub mod catalog;
pub mod config;
pub mod process;
pub mod render;
pub mod types;

use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

pub use config::Config;
pub use process::{load_and_transform, load_with_stats, LoadStats};
pub use render::{parse_rendered, render, write_output};
pub use types::{BenchmarkRow, BenchmarkTable, CodeEntry, PercentileRecord};

/// Load, render and write. Nothing is written unless load and render succeed.
pub fn run(cfg: &Config) -> Result<PathBuf> {
    let (table, stats) = load_with_stats(&cfg.input_path, &cfg.excluded_regions)?;
    let text = render(&table, &cfg.source_name())?;
    write_output(&cfg.output_path, &text)?;
    info!(
        path = %cfg.output_path.display(),
        regions = stats.accepted - stats.replaced,
        "wrote benchmark script"
    );
    Ok(cfg.output_path.clone())
}
