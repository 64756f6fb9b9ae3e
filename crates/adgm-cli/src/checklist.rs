//! # Checklist Subcommand
//!
//! Only file names are inspected; the files need not exist.

use std::path::PathBuf;

use adgm_agent::ChecklistStatus;
use anyhow::Result;
use clap::Args;

use crate::{file_name_of, EXIT_INCOMPLETE, EXIT_OK};

#[derive(Args, Debug)]
pub struct ChecklistArgs {
    /// Document files (or bare file names) making up the submission.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn run_checklist(args: &ChecklistArgs) -> Result<u8> {
    let names = args
        .files
        .iter()
        .map(|p| file_name_of(p))
        .collect::<Result<Vec<_>>>()?;
    let status = ChecklistStatus::evaluate(&names);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("{}", checklist_message(&status));
    }
    Ok(if status.complete {
        EXIT_OK
    } else {
        EXIT_INCOMPLETE
    })
}

/// The user-facing summary of a checklist evaluation.
pub fn checklist_message(status: &ChecklistStatus) -> String {
    if status.complete {
        return "Checklist complete: all mandatory documents appear to be uploaded.".to_string();
    }
    format!(
        "Incomplete submission.\n\
         It appears you have uploaded {} out of {} required documents for company incorporation.\n\
         Missing Documents: {}",
        status.documents_uploaded,
        status.required_documents,
        status.missing_documents.join(", ")
    )
}
