//! Input enumeration and label inference.
//!
//! Files are taken as given; directories are scanned for `.json` files,
//! where the `test-<number>.json` naming convention doubles as a sending
//! speed label.

use std::path::{Path, PathBuf};

use anyhow::Context;
use regex::Regex;

/// One resolved input and its inferred sending speed, when the file name
/// follows the `test-<number>.json` convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub path: PathBuf,
    pub speed: Option<u64>,
}

/// Expand files and directories into a flat input list.
///
/// Directory entries are visited in name order so runs are reproducible.
/// When every enumerated input carries an inferred speed the whole list is
/// sorted by speed, so chart legends read in benchmark order; otherwise
/// input order is preserved.
pub fn enumerate_inputs(inputs: &[PathBuf]) -> anyhow::Result<Vec<InputFile>> {
    let name_pattern = Regex::new(r"(?i)^test-(\d+)\.json$").unwrap();

    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            scan_directory(input, &name_pattern, &mut files)?;
        } else {
            files.push(InputFile {
                path: input.clone(),
                speed: None,
            });
        }
    }

    if !files.is_empty() && files.iter().all(|file| file.speed.is_some()) {
        files.sort_by_key(|file| file.speed);
    }
    Ok(files)
}

fn scan_directory(
    dir: &Path,
    name_pattern: &Regex,
    files: &mut Vec<InputFile>,
) -> anyhow::Result<()> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("cannot scan directory {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<_, _>>()
        .with_context(|| format!("cannot scan directory {}", dir.display()))?;
    entries.sort();

    for path in entries {
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if !is_json {
            continue;
        }

        let speed = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name_pattern.captures(name))
            .and_then(|captures| captures[1].parse::<u64>().ok());
        files.push(InputFile { path, speed });
    }
    Ok(())
}

/// Human label for an inferred sending speed, in thousands of messages per
/// second: `12000` becomes `12k`, `12300` becomes `12.3k`, and so on down
/// to three decimals.
pub fn speed_label(speed: u64) -> String {
    if speed % 1000 == 0 {
        format!("{}k", speed / 1000)
    } else if speed % 100 == 0 {
        format!("{:.1}k", speed as f64 / 1000.0)
    } else if speed % 10 == 0 {
        format!("{:.2}k", speed as f64 / 1000.0)
    } else {
        format!("{:.3}k", speed as f64 / 1000.0)
    }
}
