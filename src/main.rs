//! loupe command-line entry point

mod cli;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use loupe::config::ScanConfig;
use loupe::config_paths::ConfigPaths;
use loupe::diagnostics::sort_for_presentation;
use loupe::fs_watcher::FileWatcher;
use loupe::host::MemoryDocument;
use loupe::messages::ScanMsg;
use loupe::palette::{PaletteSet, ThemeKind, DARK_PALETTE_YAML, LIGHT_PALETTE_YAML};
use loupe::runtime::Runtime;
use loupe::scan::{ScanOutcome, TextSnapshot};
use loupe::scheduler::ScanScheduler;
use loupe::view::{self, FileReport};

use cli::{Cli, Command, OutputFormat};

/// How long `watch` waits for the initial scan before giving up
const SETTLE_TIMEOUT: Duration = Duration::from_secs(5);
/// Poll interval for the watch loop
const WATCH_TICK: Duration = Duration::from_millis(50);

fn main() -> Result<ExitCode> {
    loupe::logging::init();
    let cli = Cli::parse();
    let mut config = ScanConfig::load();

    match cli.command {
        Command::Check {
            paths,
            format,
            detector,
        } => {
            detector.apply_to(&mut config);
            check(&paths, format, &config)
        }
        Command::Tokens { path, format } => tokens(&path, format, &config),
        Command::Show {
            path,
            display,
            detector,
        } => {
            display.apply_to(&mut config);
            detector.apply_to(&mut config);
            show(&path, &config)
        }
        Command::Watch {
            path,
            display,
            detector,
        } => {
            display.apply_to(&mut config);
            detector.apply_to(&mut config);
            watch(&path, &config)
        }
        Command::Paths => paths(),
        Command::InitConfig { force } => init_config(force),
        Command::InitPalettes { force } => init_palettes(force),
    }
}

fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Exit status 1 when any file has problems, like a linter
fn check(paths: &[PathBuf], format: OutputFormat, config: &ScanConfig) -> Result<ExitCode> {
    let options = config.detector_options();
    let mut results = Vec::with_capacity(paths.len());

    for path in paths {
        let source = read_source(path)?;
        let mut outcome = ScanOutcome::scan(&source, options);
        sort_for_presentation(&mut outcome.errors);
        results.push((path.display().to_string(), outcome));
    }

    match format {
        OutputFormat::Text => {
            for (path, outcome) in &results {
                print_diagnostics(path, outcome);
            }
        }
        OutputFormat::Json => {
            let reports: Vec<FileReport<'_>> = results
                .iter()
                .map(|(path, outcome)| FileReport {
                    path,
                    errors: &outcome.errors,
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
    }

    let failed = results.iter().any(|(_, outcome)| outcome.has_errors());
    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn print_diagnostics(path: &str, outcome: &ScanOutcome) {
    let chars = outcome.snapshot.chars();
    for error in &outcome.errors {
        println!("{}", view::format_diagnostic(path, chars, error));
    }
}

fn print_summary(path: &str, outcome: &ScanOutcome) {
    if !outcome.has_errors() {
        println!("{}: no problems", path);
        return;
    }
    let counts: Vec<String> = outcome
        .counts_by_kind()
        .into_iter()
        .map(|(kind, n)| format!("{} {:?}", n, kind))
        .collect();
    println!(
        "{}: {} problem(s) ({})",
        path,
        outcome.errors.len(),
        counts.join(", ")
    );
}

fn tokens(path: &Path, format: OutputFormat, config: &ScanConfig) -> Result<ExitCode> {
    let source = read_source(path)?;
    let outcome = ScanOutcome::scan(&source, config.detector_options());

    match format {
        OutputFormat::Text => {
            let chars = outcome.snapshot.chars();
            for token in &outcome.tokens {
                println!("{}", view::format_token(chars, token));
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome.tokens)?),
    }
    Ok(ExitCode::SUCCESS)
}

/// Paint the file through the scheduler exactly as an editor would
fn show(path: &Path, config: &ScanConfig) -> Result<ExitCode> {
    let source = read_source(path)?;
    let mut doc = MemoryDocument::new(&source).with_dark_theme(config.theme.is_dark());
    let mut scheduler = ScanScheduler::from_config(config, PaletteSet::load());
    scheduler.update_inline(&mut doc, ScanMsg::DocumentOpened);

    print!("{}", view::render_ansi(&doc, config.theme));
    if !source.ends_with('\n') {
        println!();
    }

    let shown = path.display().to_string();
    if !scheduler.is_enabled() {
        tracing::info!("Scanning is disabled in the config, {} shown unpainted", shown);
        return Ok(ExitCode::SUCCESS);
    }
    match scheduler.last_outcome() {
        Some(outcome) => {
            print_diagnostics(&shown, outcome);
            Ok(if outcome.has_errors() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
        None => anyhow::bail!("Scan results could not be applied to {}", shown),
    }
}

fn watch(path: &Path, config: &ScanConfig) -> Result<ExitCode> {
    let shown = path.display().to_string();
    if !config.enabled {
        println!("{}: scanning is disabled in the config, nothing to watch", shown);
        return Ok(ExitCode::SUCCESS);
    }
    let watcher =
        FileWatcher::new(path).with_context(|| format!("Failed to watch {}", shown))?;

    let doc = MemoryDocument::new(&read_source(path)?).with_dark_theme(config.theme.is_dark());
    let scheduler = ScanScheduler::from_config(config, PaletteSet::load());
    let mut runtime = Runtime::new(doc, scheduler)?;

    runtime.dispatch(ScanMsg::DocumentOpened);
    if !runtime.run_until_settled(SETTLE_TIMEOUT) {
        tracing::warn!(path = %shown, "Initial scan did not finish in time");
    }
    let mut renders = 0;

    loop {
        let stats = runtime.scheduler().stats();
        if stats.renders != renders {
            renders = stats.renders;
            if let Some(outcome) = runtime.scheduler().last_outcome() {
                print_summary(&shown, outcome);
                print_diagnostics(&shown, outcome);
            }
        }

        if watcher.poll_changed() {
            match std::fs::read_to_string(watcher.path()) {
                Ok(source) => {
                    let unchanged =
                        TextSnapshot::new(&source) == TextSnapshot::capture(runtime.document());
                    if !unchanged {
                        runtime.document_mut().set_text(&source);
                        runtime.dispatch(ScanMsg::TextEdited);
                    }
                }
                Err(e) => tracing::warn!(path = %shown, "Failed to reload: {}", e),
            }
        }

        runtime.pump_timeout(WATCH_TICK);
    }
}

fn paths() -> Result<ExitCode> {
    let Some(paths) = ConfigPaths::discover() else {
        for label in ["config", "palettes", "log"] {
            println!("{:<10} (unavailable)", label);
        }
        return Ok(ExitCode::SUCCESS);
    };
    println!("{:<10} {}", "config", paths.config_file().display());
    println!("{:<10} {}", "palettes", paths.palettes_dir().display());
    println!("{:<10} {}", "log", paths.newest_log().display());
    Ok(ExitCode::SUCCESS)
}

fn discover_paths() -> Result<ConfigPaths> {
    ConfigPaths::discover().context("No config directory available")
}

fn init_config(force: bool) -> Result<ExitCode> {
    let target = discover_paths()?.config_file();
    if target.exists() && !force {
        println!("kept    {}", target.display());
        return Ok(ExitCode::SUCCESS);
    }
    ScanConfig::default()
        .save_to(&target)
        .map_err(anyhow::Error::msg)?;
    println!("wrote   {}", target.display());
    Ok(ExitCode::SUCCESS)
}

fn init_palettes(force: bool) -> Result<ExitCode> {
    let paths = discover_paths()?;
    paths.ensure_palettes_dir().map_err(anyhow::Error::msg)?;

    for (kind, yaml) in [
        (ThemeKind::Dark, DARK_PALETTE_YAML),
        (ThemeKind::Light, LIGHT_PALETTE_YAML),
    ] {
        let target = paths.palette_file(kind);
        if target.exists() && !force {
            println!("kept    {}", target.display());
            continue;
        }
        std::fs::write(&target, yaml)
            .with_context(|| format!("Failed to write {}", target.display()))?;
        println!("wrote   {}", target.display());
    }
    Ok(ExitCode::SUCCESS)
}
