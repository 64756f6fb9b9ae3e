//! # adgm CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use adgm_cli::checklist::{run_checklist, ChecklistArgs};
use adgm_cli::index::{run_index, IndexArgs};
use adgm_cli::load_config;
use adgm_cli::review::{run_review, ReviewArgs};

/// ADGM Corporate Agent: checklist and red-flag review of ADGM corporate
/// documents, grounded in a knowledge base of ADGM regulations.
#[derive(Parser, Debug)]
#[command(name = "adgm", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build or query the knowledge-base index.
    Index(IndexArgs),

    /// Check file names against the Company Incorporation checklist.
    Checklist(ChecklistArgs),

    /// Review .docx files and write the report and annotated copies.
    Review(ReviewArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = run(cli).await;

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<u8> {
    match cli.command {
        Commands::Checklist(args) => run_checklist(&args),
        Commands::Index(args) => {
            let config = load_config(cli.config.as_deref())?;
            run_index(&args, &config).await
        }
        Commands::Review(args) => {
            let config = load_config(cli.config.as_deref())?;
            run_review(&args, &config).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adgm_cli::index::IndexCommand;

    #[test]
    fn cli_parse_index_build() {
        let cli = Cli::try_parse_from([
            "adgm", "index", "build", "--data-dir", "docs", "--out", "idx", "--no-web",
        ])
        .unwrap();
        let Commands::Index(args) = cli.command else {
            panic!("expected index command");
        };
        match args.command {
            IndexCommand::Build {
                data_dir,
                out,
                no_web,
            } => {
                assert_eq!(data_dir, Some(PathBuf::from("docs")));
                assert_eq!(out, Some(PathBuf::from("idx")));
                assert!(no_web);
            }
            other => panic!("expected build, got {other:?}"),
        }
    }

    #[test]
    fn cli_parse_index_query() {
        let cli =
            Cli::try_parse_from(["adgm", "index", "query", "ADGM courts", "-k", "2"]).unwrap();
        let Commands::Index(args) = cli.command else {
            panic!("expected index command");
        };
        match args.command {
            IndexCommand::Query { text, k } => {
                assert_eq!(text, "ADGM courts");
                assert_eq!(k, Some(2));
            }
            other => panic!("expected query, got {other:?}"),
        }
    }

    #[test]
    fn cli_parse_checklist_requires_files() {
        assert!(Cli::try_parse_from(["adgm", "checklist"]).is_err());
        let cli = Cli::try_parse_from(["adgm", "checklist", "a.docx", "b.docx", "--json"]).unwrap();
        let Commands::Checklist(args) = cli.command else {
            panic!("expected checklist command");
        };
        assert_eq!(args.files.len(), 2);
        assert!(args.json);
    }

    #[test]
    fn cli_parse_review_defaults() {
        let cli = Cli::try_parse_from(["adgm", "review", "AoA.docx"]).unwrap();
        let Commands::Review(args) = cli.command else {
            panic!("expected review command");
        };
        assert!(!args.proceed);
        assert_eq!(args.out_dir, PathBuf::from("."));
    }

    #[test]
    fn cli_parse_review_with_options() {
        let cli = Cli::try_parse_from([
            "adgm", "review", "AoA.docx", "MoA.docx", "--proceed", "--out-dir", "out",
        ])
        .unwrap();
        let Commands::Review(args) = cli.command else {
            panic!("expected review command");
        };
        assert!(args.proceed);
        assert_eq!(args.out_dir, PathBuf::from("out"));
        assert_eq!(args.files.len(), 2);
    }

    #[test]
    fn cli_parse_verbose_levels() {
        let cli0 = Cli::try_parse_from(["adgm", "checklist", "a.docx"]).unwrap();
        assert_eq!(cli0.verbose, 0);
        let cli2 = Cli::try_parse_from(["adgm", "-vv", "checklist", "a.docx"]).unwrap();
        assert_eq!(cli2.verbose, 2);
    }

    #[test]
    fn cli_parse_config_option() {
        let cli =
            Cli::try_parse_from(["adgm", "--config", "adgm.yaml", "checklist", "a.docx"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("adgm.yaml")));
    }

    #[test]
    fn cli_parse_no_subcommand_errors() {
        assert!(Cli::try_parse_from(["adgm"]).is_err());
    }
}
