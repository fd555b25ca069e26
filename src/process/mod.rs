// src/process/mod.rs
pub mod utils;

use anyhow::{anyhow, Context, Result};
use csv::{ReaderBuilder, StringRecord};
use std::{collections::HashSet, fs::File, io::Read, path::Path};
use tracing::{debug, info, warn};

use crate::catalog::describe;
use crate::types::{BenchmarkRow, BenchmarkTable, Fold, PercentileRecord};
use utils::parse_currency;

pub const CODE_COLUMN: &str = "CPT Code";
pub const REGION_COLUMN: &str = "State";
/// Percentile columns in `p5, p10, p25, p50, p75, p90, p95` order.
pub const PERCENTILE_COLUMNS: [&str; 7] = [
    "5th %ile",
    "10th %ile",
    "25th %ile",
    "50th %ile",
    "75th %ile",
    "90th %ile",
    "95th %ile",
];

/// Counters gathered while folding rows into the table.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    pub rows_read: usize,
    pub accepted: usize,
    pub excluded_region: usize,
    pub unknown_code: usize,
    /// Accepted rows that overwrote an earlier row for the same (code, region).
    pub replaced: usize,
}

/// Header positions of every column the loader reads.
struct Columns {
    code: usize,
    region: usize,
    percentiles: [usize; 7],
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| anyhow!("missing column {:?} in header", name))
        };
        let mut percentiles = [0usize; 7];
        for (slot, name) in percentiles.iter_mut().zip(PERCENTILE_COLUMNS) {
            *slot = find(name)?;
        }
        Ok(Self {
            code: find(CODE_COLUMN)?,
            region: find(REGION_COLUMN)?,
            percentiles,
        })
    }

    /// Trimmed (code, region); both must be present in the record.
    fn key(&self, record: &StringRecord) -> Result<(String, String)> {
        let get = |idx: usize, name: &str| {
            record
                .get(idx)
                .map(|s| s.trim().to_string())
                .ok_or_else(|| anyhow!("row has no value for column {:?}", name))
        };
        Ok((get(self.code, CODE_COLUMN)?, get(self.region, REGION_COLUMN)?))
    }

    /// Short rows yield `0.0` for the missing percentile cells.
    fn percentiles(&self, record: &StringRecord) -> Result<PercentileRecord> {
        let mut values = [0f64; 7];
        for ((value, idx), name) in values
            .iter_mut()
            .zip(self.percentiles)
            .zip(PERCENTILE_COLUMNS)
        {
            *value = parse_currency(record.get(idx))
                .with_context(|| format!("column {:?}", name))?;
        }
        let [p5, p10, p25, p50, p75, p90, p95] = values;
        Ok(PercentileRecord {
            p5,
            p10,
            p25,
            p50,
            p75,
            p90,
            p95,
        })
    }
}

/// Read the benchmark CSV at `input_path` into a [`BenchmarkTable`].
pub fn load_and_transform<P: AsRef<Path>>(
    input_path: P,
    excluded_regions: &HashSet<String>,
) -> Result<BenchmarkTable> {
    load_with_stats(input_path, excluded_regions).map(|(table, _)| table)
}

/// Like [`load_and_transform`], also returning row counters.
#[tracing::instrument(level = "info", skip(input_path, excluded_regions), fields(path = %input_path.as_ref().display()))]
pub fn load_with_stats<P: AsRef<Path>>(
    input_path: P,
    excluded_regions: &HashSet<String>,
) -> Result<(BenchmarkTable, LoadStats)> {
    let file = File::open(&input_path)
        .with_context(|| format!("Failed to open input CSV: {:?}", input_path.as_ref()))?;
    let (table, stats) = load_from_reader(file, excluded_regions)
        .with_context(|| format!("Failed to load {:?}", input_path.as_ref()))?;
    info!(
        rows = stats.rows_read,
        accepted = stats.accepted,
        excluded = stats.excluded_region,
        unknown = stats.unknown_code,
        "loaded benchmark rows"
    );
    Ok((table, stats))
}

/// Fold every record from `reader` into a fresh table.
///
/// - rows in an excluded region are skipped before anything else is looked at
/// - rows whose code is not in the catalog are skipped
/// - a later row for the same (code, region) replaces the earlier one
///
/// Any CSV, missing-column or currency error aborts the whole load.
pub fn load_from_reader<R: Read>(
    reader: R,
    excluded_regions: &HashSet<String>,
) -> Result<(BenchmarkTable, LoadStats)> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // short rows are allowed; missing cells handled per column
        .from_reader(reader);

    let headers = rdr.headers().context("reading CSV header")?.clone();
    let cols = Columns::resolve(&headers)?;

    let mut table = BenchmarkTable::from_catalog();
    let mut stats = LoadStats::default();

    for (idx, result) in rdr.records().enumerate() {
        let row_no = idx + 1;
        let record = result.with_context(|| format!("CSV parse error at row {}", row_no))?;
        stats.rows_read += 1;

        let (code, region) = cols.key(&record).with_context(|| format!("row {}", row_no))?;

        if excluded_regions.contains(&region) {
            stats.excluded_region += 1;
            continue;
        }
        if describe(&code).is_none() {
            debug!(row = row_no, code = %code, "skipping unknown code");
            stats.unknown_code += 1;
            continue;
        }

        let percentiles = cols
            .percentiles(&record)
            .with_context(|| format!("row {} ({} / {})", row_no, code, region))?;

        let row = BenchmarkRow {
            code,
            region,
            percentiles,
        };
        match table.fold(row) {
            Fold::Inserted => stats.accepted += 1,
            Fold::Replaced => {
                warn!(row = row_no, "duplicate (code, region); later row wins");
                stats.accepted += 1;
                stats.replaced += 1;
            }
            // catalog membership was checked above
            Fold::UnknownCode => stats.unknown_code += 1,
        }
    }

    Ok((table, stats))
}
