//! Custom assertions over the CLI's JSON output.
//!
//! `search --format json` prints `{"total": n, "found": [{"index": i, "entry": {...}}]}`.

use anyhow::{Context, Result};
use serde_json::Value;

fn found(json: &Value) -> Result<&Vec<Value>> {
    json["found"]
        .as_array()
        .context("Expected 'found' array in JSON")
}

/// Assert the number of found entries.
pub fn assert_found_count(json: &Value, expected: usize) -> Result<()> {
    let found = found(json)?;
    if found.len() != expected {
        anyhow::bail!("Expected {} found entries, got {}", expected, found.len());
    }
    Ok(())
}

/// Indices of the found entries, in output order.
pub fn found_indices(json: &Value) -> Result<Vec<u64>> {
    found(json)?
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item["index"]
                .as_u64()
                .with_context(|| format!("Found item {} missing index", i))
        })
        .collect()
}

/// Assert every found entry has `field` equal to `expected`.
pub fn assert_all_fields(json: &Value, field: &str, expected: &Value) -> Result<()> {
    for (i, item) in found(json)?.iter().enumerate() {
        let value = &item["entry"][field];
        if value != expected {
            anyhow::bail!(
                "Found item {} has {} = {} but expected {}",
                i,
                field,
                value,
                expected
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_found_helpers() {
        let output = json!({
            "total": 3,
            "found": [
                {"index": 0, "entry": {"operation": "Test"}},
                {"index": 2, "entry": {"operation": "Test"}}
            ]
        });

        assert_found_count(&output, 2).unwrap();
        assert_eq!(found_indices(&output).unwrap(), vec![0, 2]);
        assert_all_fields(&output, "operation", &json!("Test")).unwrap();
        assert!(assert_found_count(&output, 1).is_err());
    }
}
