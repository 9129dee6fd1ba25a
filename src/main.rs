//! Sheetgrid - an editable data grid driven from the command line

mod commands;
mod config;
mod error;
mod logging;
mod render;
mod session;
mod storage;

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use sheetgrid_core::{GridConfig, Value};
use tracing::debug;

use crate::render::OutputFormat;
use crate::session::Session;

fn print_usage() {
    eprintln!("Usage: sheetgrid [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [FILE]                    CSV file to load (first line is the header)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <FILE>           Grid configuration (TOML)");
    eprintln!("  --no-user-config          Ignore the user's grid.toml");
    eprintln!("  -c, --command <SCRIPT>    Commands to run, separated by `;` (can be repeated)");
    eprintln!("  -s, --script <FILE>       Read commands from a file");
    eprintln!("  -o, --output <FORMAT>     table (default), json, changes or clipboard");
    eprintln!("  -w, --write <FILE>        Save every row to a CSV file");
    eprintln!("  -h, --help                Print help");
    eprintln!();
    eprintln!("Set {} to control diagnostics, e.g. {}=grid=debug", logging::LOG_ENV, logging::LOG_ENV);
}

#[derive(Debug, Default)]
struct Options {
    file: Option<PathBuf>,
    config: Option<PathBuf>,
    user_config: bool,
    commands: Vec<String>,
    scripts: Vec<PathBuf>,
    output: OutputFormat,
    write: Option<PathBuf>,
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let mut options = Options {
        user_config: true,
        ..Options::default()
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                return;
            }
            "--config" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a file path");
                    std::process::exit(1);
                }
                options.config = Some(PathBuf::from(&args[i]));
            }
            "--no-user-config" => options.user_config = false,
            "-c" | "--command" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --command requires a script");
                    std::process::exit(1);
                }
                options.commands.push(args[i].to_string());
            }
            "-s" | "--script" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --script requires a file path");
                    std::process::exit(1);
                }
                options.scripts.push(PathBuf::from(&args[i]));
            }
            "-o" | "--output" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --output requires a format");
                    std::process::exit(1);
                }
                options.output = match args[i].parse() {
                    Ok(format) => format,
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        std::process::exit(1);
                    }
                };
            }
            "-w" | "--write" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --write requires a file path");
                    std::process::exit(1);
                }
                options.write = Some(PathBuf::from(&args[i]));
            }
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                print_usage();
                std::process::exit(1);
            }
            _ => {
                if options.file.is_none() {
                    options.file = Some(PathBuf::from(&args[i]));
                } else {
                    eprintln!("Error: Unexpected argument: {}", args[i]);
                    print_usage();
                    std::process::exit(1);
                }
            }
        }
        i += 1;
    }

    logging::init();

    if let Err(e) = run(options) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(options: Options) -> Result<()> {
    let mut config = if options.config.is_some() || options.user_config {
        let (config, warnings) = config::load_config(options.config.as_deref())
            .context("Failed to load grid configuration")?;
        for warning in warnings {
            eprintln!("Warning: {}", warning);
        }
        config
    } else {
        GridConfig::default()
    };

    let rows = match &options.file {
        Some(path) => {
            let table = storage::read_csv(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            if config.columns.is_empty() {
                config.columns = table.columns();
            }
            let (rows, missing) = table.rows_for(&config.columns);
            for key in missing {
                eprintln!("Warning: column `{}` not found in {}", key, path.display());
            }
            rows
        }
        None => Vec::<Vec<Value>>::new(),
    };
    debug!(target: "session", columns = config.columns.len(), rows = rows.len(), "input loaded");

    let mut session = Session::open(config, rows).context("Invalid grid configuration")?;

    let mut script = options.commands.join(";");
    for path in &options.scripts {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        script.push('\n');
        script.push_str(&text);
    }
    let commands = commands::parse_script(&script, session.state().columns())?;
    session.run(commands);

    let output = render::render(session.state(), options.output)
        .context("Failed to render output")?;
    print!("{}", output);
    if !output.is_empty() && !output.ends_with('\n') {
        println!();
    }

    if let Some(path) = &options.write {
        storage::write_csv(path, session.state())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        eprintln!("Saved {}", path.display());
    }
    Ok(())
}
