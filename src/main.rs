use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

mod adapter;
mod corpus;
mod error;
mod filter;
mod manifest;
mod mutation;
mod node;
mod parser;
mod pipeline;
mod report;
mod rules;
mod verify;

use error::Result;
use parser::{ParseOutcome, SnippetParser};

#[derive(Parser)]
#[command(name = "mutation-audit")]
#[command(about = "Structural isomorphism auditor for code mutation corpora")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit a corpus: parse, filter, mutate, and verify every sample
    Run {
        /// Path to the corpus file (JSON Lines with index, code, language)
        corpus: PathBuf,

        /// Mutation rules to apply, in order
        #[arg(default_values_t = vec!["rename-identifier".to_string()])]
        rules: Vec<String>,

        /// Path to the per-sample manifest file (JSON)
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Path to the append-only result log
        #[arg(short, long, default_value = "summary_log.csv")]
        log: PathBuf,

        /// Write a JSON run report to this path
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Number of worker threads (0 = one per core)
        #[arg(short, long, default_value = "0")]
        jobs: usize,
    },
    /// Parse a single snippet and print its tree or discard reason
    Parse {
        /// Path to the source file
        file: PathBuf,

        /// Language of the snippet (python, cpp, java, javascript, rust)
        #[arg(short = 'L', long)]
        language: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            corpus,
            rules,
            manifest,
            log,
            report,
            jobs,
        } => {
            let manifests = match manifest {
                Some(path) => manifest::load_manifests(&path)?,
                None => manifest::ManifestSet::default(),
            };

            pipeline::run_audit(&corpus, &rules, &manifests, &log, report.as_ref(), jobs)?;
        }
        Commands::Parse { file, language } => {
            let code = fs::read(&file)?;
            let mut parser = SnippetParser::new();

            match parser.parse(&code, &language)? {
                ParseOutcome::Tree(tree) => {
                    println!("Parsed tree:");
                    print!("{}", tree.pretty());
                }
                ParseOutcome::Discarded(reason) => {
                    println!("Invalid snippet, reason to discard: {}", reason);
                }
            }
        }
    }

    Ok(())
}
