pub mod write;

pub use write::write_output;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::types::BenchmarkTable;

/// Name of the constant holding the table in the generated script.
pub const CONST_NAME: &str = "ABA_BENCHMARKS";
/// Global the consuming page reads (`window.ABA_DATA`).
pub const GLOBAL_NAME: &str = "ABA_DATA";

/// Serialize with 4-space indentation, keys in table order.
fn to_json(table: &BenchmarkTable) -> Result<String> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    table
        .serialize(&mut ser)
        .context("serializing benchmark table")?;
    String::from_utf8(buf).context("serialized table is not UTF-8")
}

/// Render the generated script: header comment, the constant, and the
/// statement publishing it on `window`.
pub fn render(table: &BenchmarkTable, source_name: &str) -> Result<String> {
    let json = to_json(table)?;
    let mut out = String::with_capacity(json.len() + 256);
    out.push_str("/**\n");
    out.push_str(" * ABA Industry Benchmark Data (Generated)\n");
    out.push_str(&format!(" * Source: {}\n", source_name));
    out.push_str(" */\n");
    out.push_str(&format!("const {} = {};\n\n", CONST_NAME, json));
    out.push_str("// Export it globally\n");
    out.push_str(&format!("window.{} = {};\n", GLOBAL_NAME, CONST_NAME));
    Ok(out)
}

/// Pull the table back out of a rendered script.
pub fn parse_rendered(text: &str) -> Result<BenchmarkTable> {
    let marker = format!("const {} = ", CONST_NAME);
    let start = text
        .find(&marker)
        .map(|i| i + marker.len())
        .ok_or_else(|| anyhow!("no `{}` declaration found", CONST_NAME))?;
    // JSON strings escape newlines, so the first `;\n` ends the literal
    let len = text[start..]
        .find(";\n")
        .ok_or_else(|| anyhow!("unterminated `{}` declaration", CONST_NAME))?;
    serde_json::from_str(&text[start..start + len]).context("parsing embedded benchmark JSON")
}
