use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::corpus::{load_corpus, CorpusSample};
use crate::error::Result;
use crate::filter::DiscardReason;
use crate::manifest::ManifestSet;
use crate::mutation::MutationEngine;
use crate::parser::{ParseOutcome, SnippetParser};
use crate::report::{ResultLog, RunReport};
use crate::verify::verify;

/// What happened to one sample as it moved through the pipeline.
#[derive(Debug)]
pub enum SampleOutcome {
    Discarded(DiscardReason),
    Verified,
    Failed(Vec<String>),
}

#[derive(Debug)]
pub struct SampleRecord {
    pub sample_id: String,
    pub outcome: SampleOutcome,
}

/// Run the full audit: parse, filter, mutate a clone, verify, log.
///
/// Rule names are validated before any sample is processed. Samples are
/// independent, so they run on a rayon pool (`jobs` threads, 0 = default)
/// with one parser per worker; the result log is written afterwards by a
/// single writer, in corpus order.
pub fn run_audit(
    corpus_path: &Path,
    rule_names: &[String],
    manifests: &ManifestSet,
    log_path: &Path,
    report_path: Option<&PathBuf>,
    jobs: usize,
) -> Result<RunReport> {
    let engine = MutationEngine::from_names(rule_names)?;
    let samples = load_corpus(corpus_path)?;

    let records = if jobs > 0 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build worker pool: {}", e))?;
        pool.install(|| process_samples(&samples, &engine, manifests))?
    } else {
        process_samples(&samples, &engine, manifests)?
    };

    let mut report = RunReport::new(
        corpus_path.display().to_string(),
        engine.rule_names().iter().map(|s| s.to_string()).collect(),
        samples.len(),
    );

    let mut log = ResultLog::open(log_path)?;
    for record in &records {
        match &record.outcome {
            SampleOutcome::Discarded(reason) => report.record_discard(reason.as_str()),
            SampleOutcome::Verified => {
                log.append(&record.sample_id, true, "N/A")?;
                report.record_verified();
            }
            SampleOutcome::Failed(errors) => {
                let headline = errors.first().map(String::as_str).unwrap_or("Mismatch");
                log.append(&record.sample_id, false, headline)?;
                report.record_failure(record.sample_id.clone(), errors.clone());
            }
        }
    }

    report.print_summary();
    if let Some(path) = report_path {
        report.save(path)?;
    }

    Ok(report)
}

fn process_samples(
    samples: &[CorpusSample],
    engine: &MutationEngine,
    manifests: &ManifestSet,
) -> Result<Vec<SampleRecord>> {
    samples
        .par_iter()
        .map_init(SnippetParser::new, |parser, sample| {
            process_sample(parser, sample, engine, manifests)
        })
        .collect()
}

fn process_sample(
    parser: &mut SnippetParser,
    sample: &CorpusSample,
    engine: &MutationEngine,
    manifests: &ManifestSet,
) -> Result<SampleRecord> {
    let sample_id = sample.sample_id();

    let original = match parser.parse(sample.code.as_bytes(), &sample.language)? {
        ParseOutcome::Discarded(reason) => {
            return Ok(SampleRecord {
                sample_id,
                outcome: SampleOutcome::Discarded(reason),
            })
        }
        ParseOutcome::Tree(tree) => tree,
    };

    // The original stays untouched as the verification baseline; rules get
    // a clone and may edit it in place.
    let mutated = engine.apply_mutations(original.clone());

    let manifest = manifests.for_sample(&sample_id);
    let result = verify(&original, &mutated, &manifest);

    let outcome = if result.verified() {
        SampleOutcome::Verified
    } else {
        SampleOutcome::Failed(result.errors.iter().map(|e| e.to_string()).collect())
    };

    Ok(SampleRecord { sample_id, outcome })
}
