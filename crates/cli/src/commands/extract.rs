use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use log::debug;
use sha2::{Digest, Sha256};
use systract_core::analysis::CancellationToken;
use systract_core::config::EngineConfig;
use systract_core::services::{DumpReader, ExeReader, Extractor, SourceReader};

use crate::commands::{render_text, SyscallReport, Template};

/// Inputs of the `extract` command after argument parsing.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    pub path: PathBuf,
    /// Treat `path` as an existing `go tool objdump` listing instead of an executable.
    pub dumpfile: bool,
    pub template: Option<String>,
    pub json: bool,
    pub config: Option<PathBuf>,
    pub jobs: Option<usize>,
    pub entry_points: Vec<String>,
    pub go_path: Option<PathBuf>,
}

/// Merge the optional config file with command-line overrides.
pub fn resolve_engine_config(opts: &ExtractOptions) -> Result<EngineConfig> {
    let mut config = match &opts.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if opts.jobs.is_some() {
        config.jobs = opts.jobs;
    }
    if !opts.entry_points.is_empty() {
        config.entry_points = opts.entry_points.clone();
    }
    if opts.go_path.is_some() {
        config.go_path = opts.go_path.clone();
    }
    Ok(config)
}

/// Extract system calls from `opts.path` and write them to `out`.
///
/// Nothing is written unless extraction and rendering both succeed.
pub fn run_extract_command(
    opts: &ExtractOptions,
    cancel: CancellationToken,
    out: &mut dyn Write,
) -> Result<()> {
    let config = resolve_engine_config(opts)?;
    let template = opts.template.as_deref().map(Template::parse).transpose()?;

    let source: Box<dyn SourceReader> = if opts.dumpfile {
        Box::new(DumpReader::new(&opts.path))
    } else {
        Box::new(ExeReader::new(&opts.path, config.resolve_go_path()))
    };
    debug!("extracting from {} ({:?})", opts.path.display(), source.kind());

    let extractor = Extractor::new(config)
        .context("Failed to initialize extractor")?
        .with_cancellation(cancel);
    let calls = extractor
        .extract(source.as_ref())
        .with_context(|| format!("Failed to extract system calls from {}", opts.path.display()))?;

    let rendered = if opts.json {
        let report = SyscallReport {
            source: opts.path.display().to_string(),
            kind: source.kind(),
            sha256: sha256_file(&opts.path)?,
            generated_at: Utc::now().to_rfc3339(),
            syscalls: calls,
        };
        let mut json =
            serde_json::to_string_pretty(&report).context("Failed to serialize report to JSON")?;
        json.push('\n');
        json
    } else if let Some(template) = template {
        template.render(&calls)
    } else {
        render_text(&calls)
    };

    out.write_all(rendered.as_bytes()).context("Failed to write results")?;
    Ok(())
}

/// Hex SHA-256 of the analyzed input, recorded in the JSON report.
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut input =
        File::open(path).with_context(|| format!("Cannot hash input {}", path.display()))?;
    let mut hasher = Sha256::new();
    io::copy(&mut input, &mut hasher)
        .with_context(|| format!("Cannot hash input {}", path.display()))?;
    Ok(format!("{:x}", hasher.finalize()))
}
