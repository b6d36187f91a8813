//! Reading JSON payloads from files or stdin.

use std::io::{self, Read};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Read and parse JSON from a file path, or from stdin when the path is `-`.
pub fn read_json<T: DeserializeOwned>(source: &str) -> Result<T> {
    let content = if source == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        buf
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("Failed to read JSON file '{}'", source))?
    };

    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in '{}'", source))
}
