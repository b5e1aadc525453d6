mod display;
mod summary;

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use regdelta_core::{CompareConfig, SemanticBackend};

#[derive(Parser)]
#[command(name = "regdelta", version, about = "Compare two revisions of a regulatory document")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse both documents and report classified section changes.
    Compare {
        /// Old revision (extracted text).
        old: PathBuf,
        /// New revision (extracted text).
        new: PathBuf,

        /// Emit the change records as JSON instead of cards.
        #[arg(long)]
        json: bool,

        /// Keep low-confidence structural/minor findings.
        #[arg(long)]
        all: bool,

        /// Enable semantic scoring (requires the `onnx` build feature).
        #[arg(long, env = "REGDELTA_ENABLE_EMBEDDINGS")]
        embeddings: bool,

        /// Directory holding model.onnx and tokenizer.json.
        #[arg(long, env = "REGDELTA_MODEL_DIR")]
        model_dir: Option<PathBuf>,

        /// Minimum blended score for an old/new assignment to count as a match.
        #[arg(long, env = "REGDELTA_MIN_MATCH_SCORE")]
        min_match_score: Option<f32>,

        /// Similarity at or above which a matched pair is treated as unchanged.
        #[arg(long, env = "REGDELTA_NO_CHANGE_THRESHOLD")]
        no_change_threshold: Option<f32>,

        /// Confidence floor for structural/minor findings.
        #[arg(long, env = "REGDELTA_CONFIDENCE_FLOOR")]
        confidence_floor: Option<f32>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Compare {
            old,
            new,
            json,
            all,
            embeddings,
            model_dir,
            min_match_score,
            no_change_threshold,
            confidence_floor,
        } => {
            let old_text = fs::read_to_string(&old)
                .with_context(|| format!("reading old revision {}", old.display()))?;
            let new_text = fs::read_to_string(&new)
                .with_context(|| format!("reading new revision {}", new.display()))?;

            let old_sections = regdelta_parse::parse_document(&old_text)
                .with_context(|| format!("parsing {}", old.display()))?;
            let new_sections = regdelta_parse::parse_document(&new_text)
                .with_context(|| format!("parsing {}", new.display()))?;

            tracing::info!(
                old = old_sections.len(),
                new = new_sections.len(),
                "parsed both revisions"
            );

            let mut config = CompareConfig {
                enable_embeddings: embeddings,
                ..CompareConfig::default()
            };
            if let Some(v) = min_match_score {
                config.min_match_score = v;
            }
            if let Some(v) = no_change_threshold {
                config.no_change_threshold = v;
            }
            if let Some(v) = confidence_floor {
                config.confidence_floor = v;
            }
            if all {
                config.confidence_floor = 0.0;
            }

            let backend = semantic_backend(&config, model_dir.as_deref());
            let records = regdelta_engine::compare(&old_sections, &new_sections, &config, backend);

            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                display::print_report(
                    &records,
                    &old.display().to_string(),
                    &new.display().to_string(),
                );
            }
        }
    }

    Ok(())
}

/// Load the semantic backend if embeddings are enabled. Failure to
/// load is not fatal: scoring degrades to lexical-only.
#[cfg(feature = "onnx")]
fn semantic_backend(
    config: &CompareConfig,
    model_dir: Option<&std::path::Path>,
) -> Option<Box<dyn SemanticBackend>> {
    if !config.enable_embeddings {
        return None;
    }
    let Some(dir) = model_dir else {
        tracing::warn!("--embeddings set without --model-dir; running lexical-only");
        return None;
    };
    match regdelta_ai::OnnxBackend::load(dir) {
        Ok(backend) => Some(Box::new(backend)),
        Err(error) => {
            tracing::warn!(%error, "failed to load embedding model; running lexical-only");
            None
        }
    }
}

#[cfg(not(feature = "onnx"))]
fn semantic_backend(
    config: &CompareConfig,
    _model_dir: Option<&std::path::Path>,
) -> Option<Box<dyn SemanticBackend>> {
    if config.enable_embeddings {
        tracing::warn!("built without the onnx feature; running lexical-only");
    }
    None
}
