use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use chaptercast::captions;
use chaptercast::cli::{
    Cli, Command, ExportArgs, KeyAction, KeysArgs, MergePromptArgs, OutputArgs, PromptBatchArgs,
    Toggle,
};
use chaptercast::config::{load_meta_from_sources, AppConfig};
use chaptercast::credentials::{mask_key, KeyBackup, KeyRing};
use chaptercast::export::{self, ExportFormat};
use chaptercast::prompts::{self, PromptBatchResponse};
use chaptercast::snapshot::strip_json_fence;
use chaptercast::types::{Chapter, ChapterDocument};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Export(args) => handle_export(&args),
        Command::PromptBatches(args) => handle_prompt_batches(&args),
        Command::MergePrompts(args) => handle_merge_prompts(&args),
        Command::Keys(args) => handle_keys(&args),
    }
}

fn handle_export(args: &ExportArgs) -> Result<()> {
    let chapters = load_chapters(&args.input)?;
    let mut meta = load_meta_from_sources(args.meta_file.as_deref(), args.meta_json.as_deref())
        .context("Failed to load script metadata")?;
    if let Some(language) = args.language {
        meta.language = language;
    }
    info!(
        chapters = chapters.len(),
        format = args.format.extension(),
        "exporting script"
    );

    let document = match args.format {
        ExportFormat::Txt => export::render_text(&meta, &chapters),
        ExportFormat::Json => export::render_structured(&chapters)?,
        ExportFormat::Srt => export::render_srt(&chapters, meta.language),
        ExportFormat::Fountain => export::render_fountain(&meta, &chapters),
    };

    let stem = export::file_stem(&meta.title);
    write_output(&args.output, &stem, args.format.extension(), &document)
}

fn handle_prompt_batches(args: &PromptBatchArgs) -> Result<()> {
    args.validate()
        .context("Failed to validate command-line arguments")?;
    let chapters = load_chapters(&args.input)?;

    let track = captions::synthesize(&chapters, args.language);
    let batches = prompts::batch_payload(&track.chunks, args.batch_size)?;
    info!(
        chunks = track.chunks.len(),
        batches = batches.len(),
        "prepared image-prompt batches"
    );

    let document =
        serde_json::to_string_pretty(&batches).context("Failed to serialize prompt batches")?;
    write_output(&args.output, "image_prompt_batches", "json", &document)
}

fn handle_merge_prompts(args: &MergePromptArgs) -> Result<()> {
    let raw = fs::read_to_string(&args.responses)
        .with_context(|| format!("Failed to read responses file {:?}", args.responses))?;
    let responses: Vec<PromptBatchResponse> = serde_json::from_str(strip_json_fence(&raw))
        .context("Failed to parse image-prompt responses")?;

    let merged = prompts::merge_prompt_batches(responses.into_iter().map(|r| r.prompts));
    info!(prompts = merged.len(), "merged image prompts");
    let strings: Vec<&str> = merged.iter().map(|p| p.prompt.as_str()).collect();

    let document =
        serde_json::to_string_pretty(&strings).context("Failed to serialize merged prompts")?;
    write_output(&args.output, "image_prompts", "json", &document)
}

fn handle_keys(args: &KeysArgs) -> Result<()> {
    let config = AppConfig::from_override(args.store_dir.clone())?;
    let mut ring = KeyRing::load(config.primary_store(), config.backup_store())
        .context("Failed to load key stores")?;

    match &args.action {
        KeyAction::List => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            for (index, key) in ring.keys().iter().enumerate() {
                let marker = if index == ring.selected() { "*" } else { " " };
                writeln!(out, "{marker} {index}: {}", mask_key(key))?;
            }
            writeln!(
                out,
                "auto-switch: {}",
                if ring.auto_switch() { "on" } else { "off" }
            )?;
        }
        KeyAction::Add { key } => {
            if !ring.add(key)? {
                bail!("Key is empty or already stored");
            }
        }
        KeyAction::Remove { index } => {
            if ring.remove(*index)?.is_none() {
                bail!("No key at index {}", index);
            }
        }
        KeyAction::Clear => ring.clear()?,
        KeyAction::Select { index } => {
            if !ring.select(*index)? {
                bail!("No key at index {}", index);
            }
        }
        KeyAction::AutoSwitch { state } => ring.set_auto_switch(*state == Toggle::On)?,
        KeyAction::Export { path } => {
            let document = ring.export_backup()?.to_json()?;
            fs::write(path, document)
                .with_context(|| format!("Failed to write key backup {:?}", path))?;
            info!(path = %path.display(), keys = ring.keys().len(), "exported API keys");
        }
        KeyAction::Import { path } => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("Failed to read key backup {:?}", path))?;
            let backup = KeyBackup::from_json(&raw)
                .with_context(|| format!("Failed to parse key backup {:?}", path))?;
            ring.import_backup(backup)?;
        }
    }
    Ok(())
}

fn load_chapters(path: &Path) -> Result<Vec<Chapter>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read chapters file {:?}", path))?;
    parse_chapters(&raw)
}

fn parse_chapters(raw: &str) -> Result<Vec<Chapter>> {
    let document: ChapterDocument =
        serde_json::from_str(strip_json_fence(raw)).context("Failed to parse chapters JSON")?;
    Ok(document.into_chapters())
}

/// Write to stdout, to a file, or into a directory as `<stem>.<extension>`
fn write_output(output: &OutputArgs, stem: &str, extension: &str, document: &str) -> Result<()> {
    let Some(target) = &output.output else {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        out.write_all(document.as_bytes())?;
        out.flush()?;
        return Ok(());
    };

    let path = resolve_output_path(target, stem, extension);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {:?}", parent))?;
    }
    fs::write(&path, document).with_context(|| format!("Failed to write {:?}", path))?;
    info!(path = %path.display(), bytes = document.len(), "wrote export");
    Ok(())
}

fn resolve_output_path(target: &Path, stem: &str, extension: &str) -> PathBuf {
    if target.is_dir() {
        target.join(format!("{stem}.{extension}"))
    } else {
        target.to_path_buf()
    }
}
