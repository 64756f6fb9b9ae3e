//! # Index Subcommand
//!
//! ```bash
//! adgm index build [--data-dir DIR] [--out DIR] [--no-web]
//! adgm index query "jurisdiction of ADGM courts" -k 4
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use adgm_agent::AgentConfig;
use adgm_rag::{build_index, Retriever, Scraper, VectorIndex};
use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::EXIT_OK;

#[derive(Args, Debug)]
pub struct IndexArgs {
    #[command(subcommand)]
    pub command: IndexCommand,
}

#[derive(Subcommand, Debug)]
pub enum IndexCommand {
    /// Build the knowledge-base index and save it.
    Build {
        /// Directory of local reference documents (.pdf, .docx, .txt, .md).
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Directory to write the index to.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Skip scraping the ADGM web pages.
        #[arg(long)]
        no_web: bool,
    },

    /// Print the chunks retrieved for a query.
    Query {
        /// Query text.
        text: String,

        /// Number of chunks to print.
        #[arg(short, long)]
        k: Option<usize>,
    },
}

pub async fn run_index(args: &IndexArgs, config: &AgentConfig) -> Result<u8> {
    match &args.command {
        IndexCommand::Build {
            data_dir,
            out,
            no_web,
        } => {
            let mut config = config.clone();
            if let Some(dir) = data_dir {
                config.data_dir = dir.clone();
            }
            if let Some(dir) = out {
                config.index_dir = dir.clone();
            }
            run_build(&config, !no_web).await
        }
        IndexCommand::Query { text, k } => {
            run_query(config, text, k.unwrap_or(config.top_k)).await
        }
    }
}

async fn run_build(config: &AgentConfig, with_web: bool) -> Result<u8> {
    let options = config.build_options(with_web);
    let embedder = config.embedder()?;
    let scraper = if with_web {
        Some(Scraper::new(config.timeout())?)
    } else {
        None
    };

    let index = build_index(&options, &embedder, scraper.as_ref())
        .await
        .context("building knowledge-base index")?;
    index
        .save(&config.index_dir)
        .with_context(|| format!("saving index to {}", config.index_dir.display()))?;

    println!(
        "Indexed {} chunks ({}, dimension {}) into {}",
        index.len(),
        index.embedding_model,
        index.dimension,
        config.index_dir.display()
    );
    Ok(EXIT_OK)
}

async fn run_query(config: &AgentConfig, text: &str, k: usize) -> Result<u8> {
    let index = VectorIndex::load(&config.index_dir)
        .with_context(|| format!("loading index from {}", config.index_dir.display()))?;
    let retriever = Retriever::new(Arc::new(index), config.embedder()?)?;
    let chunks = retriever.retrieve(text, k).await?;

    if chunks.is_empty() {
        println!("No chunks found.");
    }
    for (rank, chunk) in chunks.iter().enumerate() {
        println!("[{}] {} (score {:.3})", rank + 1, chunk.source, chunk.score);
        println!("{}\n", chunk.text);
    }
    Ok(EXIT_OK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use adgm_agent::EmbeddingProvider;

    fn hashing_config(root: &std::path::Path) -> AgentConfig {
        let mut config = AgentConfig::default();
        config.embedding.provider = EmbeddingProvider::Hashing;
        config.embedding.hashing_dimension = 32;
        config.data_dir = root.join("docs");
        config.index_dir = root.join("index");
        config
    }

    #[tokio::test]
    async fn build_then_query_offline() {
        let root = tempfile::tempdir().unwrap();
        let config = hashing_config(root.path());
        std::fs::create_dir_all(&config.data_dir).unwrap();
        std::fs::write(
            config.data_dir.join("courts.txt"),
            "Disputes are heard by the ADGM Courts.",
        )
        .unwrap();

        let build = IndexArgs {
            command: IndexCommand::Build {
                data_dir: None,
                out: None,
                no_web: true,
            },
        };
        assert_eq!(run_index(&build, &config).await.unwrap(), EXIT_OK);
        assert!(config.index_dir.join(adgm_rag::INDEX_FILE).is_file());

        let query = IndexArgs {
            command: IndexCommand::Query {
                text: "ADGM Courts".into(),
                k: Some(1),
            },
        };
        assert_eq!(run_index(&query, &config).await.unwrap(), EXIT_OK);
    }

    #[tokio::test]
    async fn build_with_no_sources_fails() {
        let root = tempfile::tempdir().unwrap();
        let build = IndexArgs {
            command: IndexCommand::Build {
                data_dir: None,
                out: None,
                no_web: true,
            },
        };
        let err = run_index(&build, &hashing_config(root.path()))
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("building knowledge-base index"));
    }

    #[tokio::test]
    async fn query_without_index_fails() {
        let root = tempfile::tempdir().unwrap();
        let query = IndexArgs {
            command: IndexCommand::Query {
                text: "anything".into(),
                k: None,
            },
        };
        assert!(run_index(&query, &hashing_config(root.path())).await.is_err());
    }
}
