//! Vaixterm Headless Runner
//!
//! Feeds a byte stream from stdin or a file through a terminal and prints
//! the resulting screen, plus any reply the terminal would have written
//! back to the PTY.

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use vaixterm_core::{Snapshot, Terminal, TerminalConfig};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut config = TerminalConfig::default();
    let mut config_file: Option<PathBuf> = None;
    let mut input_file: Option<String> = None;
    let mut output_format = OutputFormat::Text;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-c" | "--cols" => {
                i += 1;
                if let Some(v) = args.get(i) {
                    config.cols = v.parse().unwrap_or(config.cols);
                }
            }
            "-r" | "--rows" => {
                i += 1;
                if let Some(v) = args.get(i) {
                    config.rows = v.parse().unwrap_or(config.rows);
                }
            }
            "-s" | "--scrollback" => {
                i += 1;
                if let Some(v) = args.get(i) {
                    config.scrollback = v.parse().unwrap_or(config.scrollback);
                }
            }
            "--colorscheme" => {
                i += 1;
                config.colorscheme = args.get(i).map(PathBuf::from);
            }
            "--config" => {
                i += 1;
                config_file = args.get(i).map(PathBuf::from);
            }
            "-f" | "--file" => {
                i += 1;
                input_file = args.get(i).cloned();
            }
            "-j" | "--json" => output_format = OutputFormat::Json,
            "-t" | "--text" => output_format = OutputFormat::Text,
            "-h" | "--help" => {
                print_help();
                return ExitCode::SUCCESS;
            }
            arg => {
                if input_file.is_none() && !arg.starts_with('-') {
                    input_file = Some(arg.to_string());
                }
            }
        }
        i += 1;
    }

    if let Some(path) = &config_file {
        match TerminalConfig::load(path) {
            Ok(loaded) => config = loaded,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        }
    }

    let mut terminal = match Terminal::from_config(&config) {
        Ok(terminal) => terminal,
        Err(e) => {
            eprintln!("Error creating terminal: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let input_data = match &input_file {
        Some(path) => match std::fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => {
            let mut data = Vec::new();
            if let Err(e) = io::stdin().read_to_end(&mut data) {
                eprintln!("Error reading stdin: {}", e);
                return ExitCode::FAILURE;
            }
            data
        }
    };

    terminal.handle_input(&input_data);
    let snapshot = Snapshot::from_terminal(&terminal);
    let response = terminal.take_response();

    match output_format {
        OutputFormat::Text => {
            println!("Terminal State ({}x{}):", snapshot.cols, snapshot.rows);
            println!("Cursor: ({}, {})", snapshot.cursor.row, snapshot.cursor.col);
            println!("---");
            print!("{}", snapshot.to_text());
            println!("---");
            if !response.is_empty() {
                println!("Response: {}", String::from_utf8_lossy(&response).escape_debug());
            }
        }
        OutputFormat::Json => match snapshot.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing snapshot: {}", e);
                return ExitCode::FAILURE;
            }
        },
    }

    ExitCode::SUCCESS
}

#[derive(Clone, Copy)]
enum OutputFormat {
    Text,
    Json,
}

fn print_help() {
    println!("Vaixterm Headless Runner");
    println!();
    println!("Usage: vaixterm-headless [OPTIONS] [INPUT_FILE]");
    println!();
    println!("Options:");
    println!("  -c, --cols <N>          Set terminal width (default: 80)");
    println!("  -r, --rows <N>          Set terminal height (default: 24)");
    println!("  -s, --scrollback <N>    Set history depth (default: 1000)");
    println!("      --colorscheme <P>   Apply a colorscheme file");
    println!("      --config <P>        Load a JSON config file");
    println!("  -f, --file <PATH>       Read input from file");
    println!("  -j, --json              Output snapshot as JSON");
    println!("  -t, --text              Output snapshot as text (default)");
    println!("  -h, --help              Show this help message");
    println!();
    println!("Examples:");
    println!("  printf 'Hello\\x1b[6n' | vaixterm-headless");
    println!("  vaixterm-headless --json -c 40 -r 10 session.log");
}
