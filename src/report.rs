use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Append-only result log: one headerless CSV row per verified sample,
/// `sample_id,score,reason`. The file is never truncated, so results
/// accumulate across runs. A single writer owns the handle.
pub struct ResultLog {
    file: File,
}

impl ResultLog {
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(ResultLog { file })
    }

    pub fn append(&mut self, sample_id: &str, verified: bool, reason: &str) -> Result<()> {
        let score = if verified { 1.0 } else { 0.0 };
        writeln!(
            self.file,
            "{},{:.1},{}",
            csv_field(sample_id),
            score,
            csv_field(reason)
        )?;
        Ok(())
    }
}

/// Quote a CSV field when it contains a comma, quote, or newline.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Verification failures for a single sample, kept in walk order.
#[derive(Debug, Serialize, Deserialize)]
pub struct SampleFailure {
    pub sample_id: String,
    pub errors: Vec<String>,
}

/// Aggregated outcome of one pipeline run.
#[derive(Debug, Serialize, Deserialize)]
pub struct RunReport {
    pub corpus: String,
    pub rules: Vec<String>,
    pub date: String,
    pub total_samples: usize,
    pub verified: usize,
    pub failed: usize,
    pub discarded: HashMap<String, usize>,
    pub failures: Vec<SampleFailure>,
}

impl RunReport {
    pub fn new(corpus: String, rules: Vec<String>, total_samples: usize) -> Self {
        let now: DateTime<Local> = Local::now();
        RunReport {
            corpus,
            rules,
            date: now.format("%d/%m/%Y %H:%M:%S").to_string(),
            total_samples,
            verified: 0,
            failed: 0,
            discarded: HashMap::new(),
            failures: Vec::new(),
        }
    }

    pub fn record_discard(&mut self, reason: &str) {
        *self.discarded.entry(reason.to_string()).or_insert(0) += 1;
    }

    pub fn record_verified(&mut self) {
        self.verified += 1;
    }

    pub fn record_failure(&mut self, sample_id: String, errors: Vec<String>) {
        self.failed += 1;
        self.failures.push(SampleFailure { sample_id, errors });
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        println!("Report saved to {}", path.display());
        Ok(())
    }

    pub fn print_summary(&self) {
        let discarded_total: usize = self.discarded.values().sum();
        println!("\n=== Audit Summary ===");
        println!("Corpus: {}", self.corpus);
        println!("Rules: {}", self.rules.join(", "));
        println!("Total samples: {}", self.total_samples);
        println!("Verified: {}", self.verified);
        println!("Failed: {}", self.failed);
        println!("Discarded: {}", discarded_total);
        for (reason, count) in &self.discarded {
            println!("  {}: {}", reason, count);
        }
        for failure in &self.failures {
            let headline = failure.errors.first().map(String::as_str).unwrap_or("?");
            println!("Sample {}: {}", failure.sample_id, headline);
        }
    }
}
