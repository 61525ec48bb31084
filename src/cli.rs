use std::path::PathBuf;

use anyhow::{ensure, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::export::ExportFormat;
use crate::prompts::DEFAULT_BATCH_SIZE;
use crate::types::Language;

/// chaptercast - export utilities for AI co-authored scripts
///
/// Turns a JSON list of chapters into captions, structured dialogue,
/// manuscripts and image-prompt batches.
#[derive(Parser, Debug)]
#[command(name = "chaptercast", version, about = "Script export and timing toolkit", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render the script in one export format.
    Export(ExportArgs),
    /// Split caption chunks into `{id, text}` batches for the image-prompt collaborator.
    PromptBatches(PromptBatchArgs),
    /// Merge per-batch image-prompt answers into one list ordered by caption id.
    MergePrompts(MergePromptArgs),
    /// Manage the stored API keys.
    Keys(KeysArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Chapter list (JSON array or `{"chapters": [...]}`), optionally fenced
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,
    #[arg(long, value_enum)]
    pub format: ExportFormat,
    /// Label language; overrides the language from metadata
    #[arg(long, value_enum)]
    pub language: Option<Language>,
    /// Inline script metadata JSON
    #[arg(long, value_name = "JSON", conflicts_with = "meta_file")]
    pub meta_json: Option<String>,
    /// Path to script metadata JSON
    #[arg(long, value_name = "PATH", conflicts_with = "meta_json")]
    pub meta_file: Option<PathBuf>,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct PromptBatchArgs {
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,
    #[arg(long, value_enum, default_value_t = Language::Vi)]
    pub language: Language,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct MergePromptArgs {
    /// JSON array of collaborator answers, each `{"prompts": [{"id", "prompt"}]}`
    #[arg(value_name = "RESPONSES")]
    pub responses: PathBuf,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// File to write, or a directory to place `<title>.<ext>` in; stdout when omitted
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct KeysArgs {
    /// Directory holding the key stores (defaults to $CHAPTERCAST_HOME or ./.chaptercast)
    #[arg(long = "store-dir")]
    pub store_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub action: KeyAction,
}

#[derive(Subcommand, Debug, Clone)]
pub enum KeyAction {
    /// List stored keys, masked.
    List,
    /// Add a key.
    Add { key: String },
    /// Remove the key at INDEX.
    Remove { index: usize },
    /// Remove every key.
    Clear,
    /// Select the key tried first.
    Select { index: usize },
    /// Write a backup of the stored keys to PATH.
    Export { path: PathBuf },
    /// Replace the stored keys with the backup at PATH.
    Import { path: PathBuf },
    /// Enable or disable rotation to the next key on failure.
    AutoSwitch {
        #[arg(value_enum)]
        state: Toggle,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl PromptBatchArgs {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.batch_size > 0,
            "Batch size must be positive, got: {}",
            self.batch_size
        );
        Ok(())
    }
}
