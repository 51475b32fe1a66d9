use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AuditError, Result};

/// One corpus row: a code snippet and the language it is written in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusSample {
    pub index: u64,
    pub code: String,
    pub language: String,
}

impl CorpusSample {
    pub fn sample_id(&self) -> String {
        self.index.to_string()
    }
}

/// Load a corpus from a JSON Lines file, one sample per line.
///
/// Blank lines are skipped. A missing file or a malformed line is fatal to
/// the run; the error names the offending line.
pub fn load_corpus(path: &Path) -> Result<Vec<CorpusSample>> {
    let content = fs::read_to_string(path)
        .map_err(|e| AuditError::Corpus(format!("cannot read {}: {}", path.display(), e)))?;

    let mut samples = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let sample: CorpusSample = serde_json::from_str(line).map_err(|e| {
            AuditError::Corpus(format!(
                "{} line {}: {}",
                path.display(),
                line_no + 1,
                e
            ))
        })?;
        samples.push(sample);
    }

    println!("Loaded {} samples from {}", samples.len(), path.display());
    Ok(samples)
}
