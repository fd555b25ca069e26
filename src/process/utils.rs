use anyhow::{bail, Context, Result};

/// `"$12,345.67"` → `12345.67`.
///
/// Empty or absent values come back as `0.0`, so a real zero and a missing
/// price look the same to the caller.
pub fn parse_currency(raw: Option<&str>) -> Result<f64> {
    let raw = match raw {
        Some(r) => r,
        None => return Ok(0.0),
    };
    let cleaned: String = raw.chars().filter(|c| *c != '$' && *c != ',').collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Ok(0.0);
    }
    let value = cleaned
        .parse::<f64>()
        .with_context(|| format!("could not convert string to float: {:?}", raw))?;
    if !value.is_finite() {
        bail!("non-finite currency value: {:?}", raw);
    }
    Ok(value)
}
