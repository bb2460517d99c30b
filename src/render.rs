use anyhow::{Context, Result};
use serde::Serialize;

/// Write a report as pretty JSON to stdout (`-`) or a file path.
pub fn write_json<T: Serialize>(report: &T, out: &str) -> Result<()> {
  let text = serde_json::to_string_pretty(report).context("serializing report")?;

  if out == "-" {
    println!("{}", text);
  } else {
    std::fs::write(out, format!("{}\n", text)).with_context(|| format!("writing report to {out}"))?;
  }

  Ok(())
}
