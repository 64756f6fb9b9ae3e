//! # Review Subcommand
//!
//! Reviews `.docx` files from disk and writes `adgm_analysis_report.json`
//! plus one `reviewed_{name}` copy per successfully analysed document into
//! the output directory.

use std::path::{Path, PathBuf};

use adgm_agent::{pipeline_from_config, AgentConfig, CompletedReview, ReviewOutcome, UploadedDocument};
use adgm_core::REPORT_FILE_NAME;
use anyhow::{Context, Result};
use clap::Args;

use crate::checklist::checklist_message;
use crate::{file_name_of, EXIT_INCOMPLETE, EXIT_OK};

#[derive(Args, Debug)]
pub struct ReviewArgs {
    /// `.docx` files to review.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Review even when required documents are missing.
    #[arg(long)]
    pub proceed: bool,

    /// Directory for the report and annotated copies.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
}

pub async fn run_review(args: &ReviewArgs, config: &AgentConfig) -> Result<u8> {
    let documents = read_documents(&args.files)?;
    let pipeline = pipeline_from_config(config).context("starting review pipeline")?;
    if !pipeline.analyzer().has_index() {
        eprintln!("warning: no knowledge-base index loaded; run `adgm index build` first for grounded reviews");
    }

    match pipeline.run(&documents, args.proceed).await? {
        ReviewOutcome::Halted(status) => {
            eprintln!("{}", checklist_message(&status));
            eprintln!("Re-run with --proceed to review anyway.");
            Ok(EXIT_INCOMPLETE)
        }
        ReviewOutcome::Completed(review) => {
            let written = write_outputs(&review, &args.out_dir)?;
            print_summary(&review, &written);
            Ok(EXIT_OK)
        }
    }
}

fn read_documents(files: &[PathBuf]) -> Result<Vec<UploadedDocument>> {
    files
        .iter()
        .map(|path| {
            let bytes =
                std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
            Ok(UploadedDocument::new(file_name_of(path)?, bytes))
        })
        .collect()
}

/// Write the report and annotated copies; returns the paths written.
pub fn write_outputs(review: &CompletedReview, out_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    let mut written = Vec::with_capacity(review.reviewed_documents.len() + 1);
    let report_path = out_dir.join(REPORT_FILE_NAME);
    std::fs::write(&report_path, review.report.to_pretty_json()?)
        .with_context(|| format!("writing {}", report_path.display()))?;
    written.push(report_path);

    for document in &review.reviewed_documents {
        let path = out_dir.join(&document.file_name);
        std::fs::write(&path, &document.bytes)
            .with_context(|| format!("writing {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}

fn print_summary(review: &CompletedReview, written: &[PathBuf]) {
    let report = &review.report;
    println!(
        "Reviewed {} document(s); {} issue(s) found. Missing documents: {}",
        report.issues_found.len(),
        report.total_issues(),
        report.missing_document
    );
    for document in &report.issues_found {
        match &document.error {
            Some(error) => println!("  {}: failed ({error})", document.document),
            None => println!("  {}: {} issue(s)", document.document, document.issues.len()),
        }
    }
    for path in written {
        println!("wrote {}", path.display());
    }
}
