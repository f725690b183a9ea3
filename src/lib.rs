pub mod cache;
pub mod cancel;
pub mod chain;
pub mod colors;
pub mod config;
pub mod editor;
mod error;
pub mod fs;
pub mod glob;
pub mod ini;
pub mod merge;
mod output;
pub mod progress;
pub mod properties;
pub mod resolver;
pub mod walker;

pub use cache::ConfigCache;
pub use cancel::CancelToken;
pub use colors::{ColorChoice, Colors};
pub use config::{
    find_config_file, generate_init_file, load_config, merge_settings, CliOptions, ConfigError,
    EcresToml, NewlineSetting, Settings, ECRES_TOML_TEMPLATE,
};
pub use editor::{preview_save, EditorDefaults, EditorOptions, SaveResult, SaveRules};
pub use error::{ReadError, ResolveError};
pub use fs::{FileSystem, MemoryFs, OsFs};
pub use output::{format_diff, Config, OutputContext, OutputMode, RunResult};
pub use progress::ProgressReporter;
pub use properties::PropertyMap;
pub use resolver::{resolve, Resolution, ResolveOptions, Resolver};
pub use walker::walk_paths;

use std::fs as stdfs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const BINARY_CHECK_SIZE: usize = 8192;

/// Check if content is binary by looking for null bytes in first 8192 bytes
pub fn is_binary(content: &[u8]) -> bool {
    let check_len = content.len().min(BINARY_CHECK_SIZE);
    content[..check_len].contains(&0)
}

/// Main entry point: resolve every file under the given absolute paths
pub fn run(paths: &[PathBuf], config: &Config, ctx: &OutputContext) -> io::Result<RunResult> {
    let mut result = RunResult::default();

    let files = walk_paths(paths);
    let progress = ProgressReporter::new(
        files.len() as u64,
        ctx.show_progress && config.check_only && ctx.mode != OutputMode::Diff,
    );
    let with_headers = files.len() > 1;

    let resolver = Resolver::new(OsFs)
        .with_options(config.settings.resolve.clone())
        .with_cache(Arc::new(ConfigCache::new()));

    for path in files {
        let path = path?;

        if let Some(name) = path.file_name() {
            progress.set_message(&name.to_string_lossy());
        }

        match resolver.resolve(&path) {
            Ok(resolution) => {
                result.files_resolved += 1;
                let report = if config.previews_saves() {
                    check_file(&path, &resolution, config, &mut result, ctx)
                } else {
                    Ok(describe_file(&path, &resolution, config, with_headers, ctx))
                };
                match report {
                    Ok(Some(report)) => progress.println(&report),
                    Ok(None) => {}
                    Err(e) => {
                        result.errors += 1;
                        log::error!("Error processing {}: {e}", path.display());
                    }
                }
            }
            Err(e) => {
                result.errors += 1;
                log::error!("{}: {e}", path.display());
            }
        }

        progress.inc();
    }

    progress.finish();

    if let Some(summary) = output::format_summary(&result, config, ctx) {
        println!("{summary}");
    }

    Ok(result)
}

/// Properties (or editor options) for one file.
fn describe_file(
    path: &Path,
    resolution: &Resolution,
    config: &Config,
    with_headers: bool,
    ctx: &OutputContext,
) -> Option<String> {
    let mut blocks = vec![];
    if with_headers {
        blocks.push(output::format_header(path, ctx));
    }
    if ctx.verbose {
        blocks.push(output::format_consulted(&resolution.files, ctx));
    }

    let body = if config.show_editor {
        let detected = read_text(path)
            .ok()
            .flatten()
            .and_then(|content| editor::detect_indentation(&content));
        let options =
            EditorOptions::with_detected(&resolution.properties, detected, &config.settings.editor);
        output::format_editor_options(&options, ctx)
    } else {
        output::format_properties(&resolution.properties, ctx)
    };
    if !body.is_empty() {
        blocks.push(body);
    }

    (!blocks.is_empty()).then(|| blocks.join("\n"))
}

/// Run the save preview over one file and report what it would change.
fn check_file(
    path: &Path,
    resolution: &Resolution,
    config: &Config,
    result: &mut RunResult,
    ctx: &OutputContext,
) -> io::Result<Option<String>> {
    let rules = SaveRules::from_properties(&resolution.properties, config.settings.default_newline);
    if rules.is_noop() {
        return Ok(ctx
            .verbose
            .then(|| output::format_skipped(path, "no save rules", ctx)));
    }

    let content = match read_text(path) {
        Ok(Some(content)) => content,
        Ok(None) => {
            return Ok(ctx
                .verbose
                .then(|| output::format_skipped(path, "binary or non-UTF-8", ctx)));
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Ok(ctx
                .verbose
                .then(|| output::format_skipped(path, "missing", ctx)));
        }
        Err(e) => return Err(e),
    };

    let save = preview_save(&content, &rules);
    if !save.has_changes() {
        return Ok(ctx.verbose.then(|| output::format_checked(path, ctx)));
    }

    if config.check_only {
        result.files_with_problems += 1;
    }
    let report = match ctx.mode {
        OutputMode::Diff => {
            format_diff(&path.display().to_string(), &save.original, &save.content)
        }
        OutputMode::Normal | OutputMode::Quiet => output::format_check_result(path, &save, ctx),
    };
    Ok(Some(report))
}

/// File content as text, or `None` for binary and non-UTF-8 files.
fn read_text(path: &Path) -> io::Result<Option<String>> {
    let bytes = stdfs::read(path)?;
    if is_binary(&bytes) {
        return Ok(None);
    }
    Ok(String::from_utf8(bytes).ok())
}
