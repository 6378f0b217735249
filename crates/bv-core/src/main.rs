//! Bugview Core - bug-detail pages from a static bug list
//!
//! The main entry point for bv-core, handling:
//! - Rendering a bug-detail page for one bug id
//! - Listing and checking the bug list
//! - Serving pages and static assets over HTTP

use bv_common::display::{display_date, display_title};
use bv_common::{BugId, BugSnapshot, OutputFormat};
use bv_core::check::{check_records, CheckReport, Severity};
use bv_core::config::{load_config, ConfigError, ConfigOptions, ResolvedConfig};
use bv_core::exit_codes::ExitCode;
use bv_core::fetch::{is_http_location, LoadError};
use bv_core::host::{NoopNavigator, ViewHost};
use bv_core::logging::{
    event_names, generate_run_id, init_logging, LogConfig, LogFormat, LogLevel, Stage,
};
use bv_core::serve::{BugServer, ServeOptions};
use bv_core::view::Msg;
use bv_render::{AssetProbe, DirProbe, InteractionMode, PageGenerator};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// Bugview Core - render, check and serve bug-detail pages
#[derive(Parser)]
#[command(name = "bv-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Config file (overrides BUGVIEW_CONFIG and the XDG location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Bug list source: http(s) origin or static-asset directory
    #[arg(long, global = true)]
    source: Option<String>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format on stderr (human, jsonl)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    /// Fetch timeout in seconds (no timeout unless set)
    #[arg(long, global = true)]
    timeout: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load one bug and write its detail page
    Render(RenderArgs),

    /// List bug ids, titles and dates
    List,

    /// Validate the bug list
    Check,

    /// Serve detail pages and static assets
    Serve(ServeArgs),

    /// Configuration management
    Config(ConfigArgs),

    /// Print version information
    Version,
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Render(_) => "render",
            Commands::List => "list",
            Commands::Check => "check",
            Commands::Serve(_) => "serve",
            Commands::Config(_) => "config",
            Commands::Version => "version",
        }
    }
}

// ============================================================================
// Command argument structs
// ============================================================================

#[derive(Args, Debug)]
struct RenderArgs {
    /// Bug id (route parameter)
    id: String,

    /// Write the page to a file instead of stdout
    #[arg(long, short = 'o')]
    out: Option<PathBuf>,

    /// Open this image in the overlay
    #[arg(long)]
    image: Option<String>,

    /// Use plain links instead of the inline lightbox script
    #[arg(long)]
    links: bool,
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Listen address (HOST:PORT)
    #[arg(long)]
    addr: Option<SocketAddr>,

    /// Static-asset root
    #[arg(long)]
    root: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Print the effective configuration
    Show,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version are not errors
            let code = if err.use_stderr() {
                ExitCode::ArgsError
            } else {
                ExitCode::Ok
            };
            let _ = err.print();
            std::process::exit(code.as_i32());
        }
    };

    let cli_level = (cli.global.verbose > 0 || cli.global.quiet)
        .then(|| LogLevel::from_verbosity(cli.global.verbose, cli.global.quiet));
    init_logging(&LogConfig::from_env(cli_level, cli.global.log_format));

    let run_id = generate_run_id();
    let span = tracing::info_span!("run", run_id = %run_id);
    let _guard = span.enter();
    info!(
        event = event_names::RUN_STARTED,
        command = cli.command.name(),
        version = env!("CARGO_PKG_VERSION"),
        "run started"
    );

    let exit_code = match &cli.command {
        Commands::Render(args) => run_render(&cli.global, args),
        Commands::List => run_list(&cli.global),
        Commands::Check => run_check(&cli.global),
        Commands::Serve(args) => run_serve(&cli.global, args),
        Commands::Config(args) => match args.command {
            ConfigCommands::Show => run_config_show(&cli.global),
        },
        Commands::Version => {
            print_version(&cli.global);
            ExitCode::Ok
        }
    };

    info!(
        event = event_names::RUN_FINISHED,
        exit_code = exit_code.as_i32(),
        "run finished"
    );
    std::process::exit(exit_code.as_i32());
}

// ============================================================================
// Shared helpers
// ============================================================================

fn load(global: &GlobalOpts) -> Result<ResolvedConfig, ExitCode> {
    let options = ConfigOptions {
        config_path: global.config.clone(),
        source: global.source.clone(),
        timeout_secs: global.timeout,
    };
    match load_config(&options) {
        Ok(resolved) => {
            match &resolved.path {
                Some(path) => info!(
                    event = event_names::CONFIG_LOADED,
                    path = %path.display(),
                    source = %resolved.config.source.location,
                    "config loaded"
                ),
                None => info!(
                    event = event_names::CONFIG_DEFAULT_USED,
                    source = %resolved.config.source.location,
                    "using default config"
                ),
            }
            Ok(resolved)
        }
        Err(e) => Err(output_config_error(global, &e)),
    }
}

/// Probe for asset checks, available when bugs come from a directory.
fn dir_probe(resolved: &ResolvedConfig) -> Option<DirProbe> {
    if is_http_location(&resolved.config.source.location) {
        None
    } else {
        Some(DirProbe::new(resolved.config.serve_root()))
    }
}

fn to_pretty_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        error!(error = %e, "failed to serialize output");
        "{}".to_string()
    })
}

/// Output a config error in the appropriate format.
fn output_config_error(global: &GlobalOpts, err: &ConfigError) -> ExitCode {
    let exit_code = match err {
        ConfigError::IoError { .. } => ExitCode::IoError,
        _ => ExitCode::ConfigError,
    };
    error!(event = event_names::CONFIG_ERROR, error = %err, "config error");
    output_error(global, exit_code, &err.to_string());
    exit_code
}

/// Output a load failure and map it to an exit code.
fn output_load_error(global: &GlobalOpts, err: &LoadError) -> ExitCode {
    let exit_code = ExitCode::for_load_error(err);
    output_error(global, exit_code, &err.to_string());
    exit_code
}

fn output_error(global: &GlobalOpts, exit_code: ExitCode, message: &str) {
    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "status": "error",
                "error": {
                    "code": exit_code.as_i32(),
                    "name": exit_code.code_name(),
                    "message": message,
                }
            });
            eprintln!("{}", to_pretty_json(&response));
        }
        OutputFormat::Summary => eprintln!("error: {}", message),
        OutputFormat::Md => {
            eprintln!("# Error");
            eprintln!();
            eprintln!("{}: {}", exit_code, message);
        }
    }
}

// ============================================================================
// Command implementations
// ============================================================================

fn run_render(global: &GlobalOpts, args: &RenderArgs) -> ExitCode {
    let resolved = match load(global) {
        Ok(resolved) => resolved,
        Err(code) => return code,
    };
    let config = &resolved.config;

    let mut render = config.render.clone();
    if args.links {
        render = render.with_interaction(InteractionMode::Links);
    }
    let mut generator = PageGenerator::new(render);
    if let Some(probe) = dir_probe(&resolved) {
        generator = generator.with_probe(Arc::new(probe));
    }

    let mut host = ViewHost::new(config.bug_source(), NoopNavigator);
    host.mount(BugId::new(args.id.as_str()));
    host.wait_settled(None);
    if let Some(image) = &args.image {
        host.dispatch(Msg::OpenImage(image.clone()));
    }

    let page = match host.render(&generator) {
        Ok(page) => page,
        Err(e) => {
            error!(error = %e, "failed to render page");
            output_error(global, ExitCode::InternalError, &e.to_string());
            return ExitCode::InternalError;
        }
    };
    let exit_code = match host.view().error() {
        Some(err) => {
            output_load_error(global, err);
            ExitCode::for_load_error(err)
        }
        None => ExitCode::Ok,
    };
    host.unmount();

    match &args.out {
        Some(path) => {
            if let Err(e) = std::fs::write(path, &page.html) {
                output_error(
                    global,
                    ExitCode::IoError,
                    &format!("failed to write {}: {}", path.display(), e),
                );
                return ExitCode::IoError;
            }
            info!(
                event = event_names::PAGE_WRITTEN,
                stage = %Stage::Render,
                path = %path.display(),
                bytes = page.html.len(),
                "page written"
            );
        }
        None => print!("{}", page.html),
    }

    exit_code
}

#[derive(Debug, Serialize)]
struct ListEntry {
    id: String,
    title: String,
    date: String,
    screenshots: usize,
    contributors: usize,
}

impl ListEntry {
    fn from_snapshot(snapshot: &BugSnapshot) -> Self {
        Self {
            id: snapshot.id().to_string(),
            title: display_title(snapshot.title()).to_string(),
            date: display_date(snapshot.date()),
            screenshots: snapshot.images().len(),
            contributors: snapshot.contributors().len(),
        }
    }
}

fn run_list(global: &GlobalOpts) -> ExitCode {
    let resolved = match load(global) {
        Ok(resolved) => resolved,
        Err(code) => return code,
    };
    let source = resolved.config.bug_source();
    let list = match source.fetch_list() {
        Ok(list) => list,
        Err(e) => return output_load_error(global, &e),
    };

    // Entries that fail to decode or have no string id can never be displayed
    let entries: Vec<ListEntry> = list
        .records()
        .filter_map(|record| record.ok())
        .filter_map(|record| BugSnapshot::normalize(record).ok())
        .map(|snapshot| ListEntry::from_snapshot(&snapshot))
        .collect();

    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "source": source.describe(),
                "count": entries.len(),
                "bugs": entries,
            });
            println!("{}", to_pretty_json(&response));
        }
        OutputFormat::Md => {
            println!("# Bugs");
            println!();
            println!("| ID | Title | Date |");
            println!("|----|-------|------|");
            for entry in &entries {
                println!("| {} | {} | {} |", entry.id, entry.title, entry.date);
            }
        }
        OutputFormat::Summary => {
            println!("{} bugs from {}", entries.len(), source.describe());
        }
    }

    ExitCode::Ok
}

fn run_check(global: &GlobalOpts) -> ExitCode {
    let resolved = match load(global) {
        Ok(resolved) => resolved,
        Err(code) => return code,
    };
    let list = match resolved.config.bug_source().fetch_list() {
        Ok(list) => list,
        Err(e) => return output_load_error(global, &e),
    };

    let probe = dir_probe(&resolved);
    let report = check_records(&list, probe.as_ref().map(|p| p as &dyn AssetProbe));
    output_check_report(global, &report);

    if report.is_clean() {
        ExitCode::Ok
    } else {
        ExitCode::CheckFailed
    }
}

fn output_check_report(global: &GlobalOpts, report: &CheckReport) {
    let errors = report.count(Severity::Error);
    let warnings = report.count(Severity::Warning);

    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "status": if report.is_clean() { "ok" } else { "failed" },
                "records": report.records,
                "errors": errors,
                "warnings": warnings,
                "findings": report.findings,
            });
            println!("{}", to_pretty_json(&response));
        }
        OutputFormat::Md => {
            println!("# Bug List Check");
            println!();
            println!(
                "{} records, {} errors, {} warnings",
                report.records, errors, warnings
            );
            if !report.findings.is_empty() {
                println!();
                for finding in &report.findings {
                    let marker = match finding.severity() {
                        Severity::Error => "error",
                        Severity::Warning => "warning",
                    };
                    println!("- **{}**: {}", marker, finding.describe());
                }
            }
        }
        OutputFormat::Summary => {
            println!(
                "{} records, {} errors, {} warnings",
                report.records, errors, warnings
            );
        }
    }
}

fn run_serve(global: &GlobalOpts, args: &ServeArgs) -> ExitCode {
    let resolved = match load(global) {
        Ok(resolved) => resolved,
        Err(code) => return code,
    };
    let config = &resolved.config;

    let addr = match args.addr {
        Some(addr) => addr,
        None => match config.serve_addr() {
            Ok(addr) => addr,
            Err(e) => return output_config_error(global, &e),
        },
    };
    let options = ServeOptions {
        addr,
        root: args.root.clone().unwrap_or_else(|| config.serve_root()),
        source: config.serve_source(),
        render: config.render.clone(),
        settle_timeout: config.settle_timeout(),
    };

    let server = match BugServer::start(options) {
        Ok(server) => server,
        Err(e) => {
            output_error(global, ExitCode::IoError, &e.to_string());
            return ExitCode::IoError;
        }
    };

    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "status": "listening",
                "addr": server.addr().to_string(),
            });
            println!("{}", to_pretty_json(&response));
        }
        _ => println!("listening on http://{}", server.addr()),
    }

    server.wait();
    ExitCode::Ok
}

fn run_config_show(global: &GlobalOpts) -> ExitCode {
    let resolved = match load(global) {
        Ok(resolved) => resolved,
        Err(code) => return code,
    };
    let path = resolved.path.as_ref().map(|p| p.display().to_string());

    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "path": path,
                "source": resolved.config.bug_source().describe(),
                "config": resolved.config,
            });
            println!("{}", to_pretty_json(&response));
        }
        OutputFormat::Md => {
            println!("# Configuration");
            println!();
            println!("Loaded from: {}", path.as_deref().unwrap_or("built-in defaults"));
            println!();
            match toml::to_string_pretty(&resolved.config) {
                Ok(text) => {
                    println!("```toml");
                    print!("{}", text);
                    println!("```");
                }
                Err(e) => {
                    output_error(global, ExitCode::InternalError, &e.to_string());
                    return ExitCode::InternalError;
                }
            }
        }
        OutputFormat::Summary => {
            println!(
                "source={} config={}",
                resolved.config.source.location,
                path.as_deref().unwrap_or("defaults")
            );
        }
    }

    ExitCode::Ok
}

fn print_version(global: &GlobalOpts) {
    let version_info = serde_json::json!({
        "bv_core_version": env!("CARGO_PKG_VERSION"),
        "rust_version": env!("CARGO_PKG_RUST_VERSION"),
        "resource_path": bv_common::RESOURCE_PATH,
    });

    match global.format {
        OutputFormat::Json => println!("{}", to_pretty_json(&version_info)),
        _ => println!("bv-core {}", env!("CARGO_PKG_VERSION")),
    }
}
