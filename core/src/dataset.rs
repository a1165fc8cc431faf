//! Record import: reads exported records from `.json` / `.jsonl` files.

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Load a `.json` file (array of records or a single object) or a `.jsonl` file
/// (one record per line, blank lines skipped).
pub fn load_records<R: DeserializeOwned>(path: &Path) -> Result<Vec<R>> {
    let f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(f);
    let records = if is_jsonl(path) {
        let mut out = Vec::new();
        for (n, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(&line)
                .with_context(|| format!("{}:{}: invalid record", path.display(), n + 1))?;
            out.push(record);
        }
        out
    } else {
        let json: serde_json::Value = serde_json::from_reader(reader)
            .with_context(|| format!("{}: invalid JSON", path.display()))?;
        match json {
            serde_json::Value::Array(arr) => arr
                .into_iter()
                .enumerate()
                .map(|(i, v)| {
                    serde_json::from_value(v)
                        .with_context(|| format!("{}: invalid record at index {i}", path.display()))
                })
                .collect::<Result<Vec<R>>>()?,
            obj @ serde_json::Value::Object(_) => vec![serde_json::from_value(obj)
                .with_context(|| format!("{}: invalid record", path.display()))?],
            _ => bail!("{}: expected a record or an array of records", path.display()),
        }
    };
    tracing::debug!(path = %path.display(), records = records.len(), "loaded records");
    Ok(records)
}

/// Load every `.json` / `.jsonl` file under `dir`, in path order.
pub fn load_dir<R: DeserializeOwned>(dir: &Path) -> Result<Vec<R>> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && (is_jsonl(p) || has_ext(p, "json")))
        .collect();
    files.sort();
    let mut records = Vec::new();
    for file in &files {
        records.extend(load_records(file)?);
    }
    tracing::info!(dir = %dir.display(), files = files.len(), records = records.len(), "loaded dataset");
    Ok(records)
}

/// File or directory.
pub fn load_path<R: DeserializeOwned>(path: &Path) -> Result<Vec<R>> {
    if path.is_dir() {
        load_dir(path)
    } else if path.is_file() {
        load_records(path)
    } else {
        bail!("{}: no such file or directory", path.display())
    }
}

fn is_jsonl(p: &Path) -> bool {
    has_ext(p, "jsonl")
}

fn has_ext(p: &Path, ext: &str) -> bool {
    p.extension().and_then(|s| s.to_str()) == Some(ext)
}
