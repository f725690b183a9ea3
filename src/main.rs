use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use ecres::{
    find_config_file, generate_init_file, load_config, merge_settings, run, CliOptions,
    ColorChoice, Config, EcresToml, NewlineSetting, OutputContext, OutputMode,
};

#[derive(Parser)]
#[command(name = "ecres")]
#[command(version, about = "Resolve the EditorConfig properties that apply to files")]
struct Cli {
    /// Target files or directories
    #[arg(required_unless_present = "init")]
    paths: Vec<PathBuf>,

    /// Check files against their save rules (no modifications), exit 1 if any would change
    #[arg(short, long)]
    check: bool,

    /// Show what saving would change in diff format
    #[arg(short, long)]
    diff: bool,

    /// Output only non-conforming file names
    #[arg(short, long)]
    quiet: bool,

    /// Also show consulted config files and debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Print editor indentation options instead of properties
    #[arg(short, long)]
    editor: bool,

    /// Config file name to look for in each directory
    #[arg(short, long, value_name = "NAME")]
    file_name: Option<String>,

    /// Tab width when no config supplies one (default: 8)
    #[arg(long, value_name = "N")]
    default_tab_width: Option<u32>,

    /// Newline used when inserting a final newline nothing else decides
    #[arg(long, value_enum, value_name = "EOL")]
    default_end_of_line: Option<NewlineSetting>,

    /// When to use colored output
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    /// Generate a template ecres.toml configuration file
    #[arg(long)]
    init: bool,

    /// Specify config file path (overrides auto-discovery)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Handle --init command
    if cli.init {
        return handle_init();
    }

    let toml_config = load_configuration(cli.config.as_deref(), cli.quiet);

    // Merge configurations: CLI > TOML > defaults
    let settings = merge_settings(&build_cli_options(&cli), toml_config.as_ref());

    let output_mode = if cli.quiet {
        OutputMode::Quiet
    } else if cli.diff {
        OutputMode::Diff
    } else {
        OutputMode::Normal
    };

    let config = Config {
        check_only: cli.check,
        output_mode,
        show_editor: cli.editor,
        settings,
    };

    let ctx = OutputContext::new(
        output_mode,
        cli.color.should_use_colors(),
        cli.verbose,
        io::stderr().is_terminal(),
    );

    let paths = match absolutize(&cli.paths) {
        Ok(paths) => paths,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(1);
        }
    };

    match run(&paths, &config, &ctx) {
        Ok(result) => {
            if config.check_only && result.has_problems() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

/// `RUST_LOG` wins; otherwise warnings, or debug output for this crate with `--verbose`.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "ecres=debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn handle_init() -> ExitCode {
    match generate_init_file() {
        Ok(path) => {
            println!("Created {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

fn load_configuration(explicit_path: Option<&Path>, quiet: bool) -> Option<EcresToml> {
    let config_path = explicit_path.map(Path::to_path_buf).or_else(|| {
        std::env::current_dir()
            .ok()
            .and_then(|d| find_config_file(&d))
    });

    config_path.and_then(|p| match load_config(&p) {
        Ok(config) => {
            if !quiet {
                log::info!("Using config: {}", p.display());
            }
            Some(config)
        }
        Err(e) => {
            log::warn!("Failed to load {}: {}", p.display(), e);
            None
        }
    })
}

fn build_cli_options(cli: &Cli) -> CliOptions {
    CliOptions {
        file_name: cli.file_name.clone(),
        default_tab_width: cli.default_tab_width,
        default_end_of_line: cli.default_end_of_line,
    }
}

/// Resolution needs absolute paths; relative ones are taken from the working directory.
fn absolutize(paths: &[PathBuf]) -> io::Result<Vec<PathBuf>> {
    paths.iter().map(std::path::absolute).collect()
}
