//! # schedsim
//!
//! Main entry point for the scheduling simulator.

use schedsim::{HostMode, HostRuntime, HostRuntimeConfig};
use std::env;
use std::io;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map_or("schedsim", String::as_str);

    let config = parse_args(&args).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        print_usage(program);
        process::exit(1);
    });

    init_tracing(config.verbose);

    let mut runtime = HostRuntime::new(config).unwrap_or_else(|e| {
        eprintln!("Failed to load simulation: {}", e);
        process::exit(1);
    });

    let stdin = io::stdin();
    let stdout = io::stdout();
    if let Err(e) = runtime.run(stdin.lock(), &mut stdout.lock()) {
        eprintln!("Runtime error: {}", e);
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn parse_args(args: &[String]) -> Result<HostRuntimeConfig, String> {
    let mut config = HostRuntimeConfig::default();
    let mut config_path = None;
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--mode" | "-m" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --mode".to_string());
                }
                config.mode = match args[i].as_str() {
                    "full" => HostMode::Full,
                    "step" => HostMode::Step,
                    other => return Err(format!("Invalid mode: {}", other)),
                };
            }
            "--max-ticks" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --max-ticks".to_string());
                }
                config.max_ticks = Some(
                    args[i]
                        .parse()
                        .map_err(|_| format!("Invalid max-ticks value: {}", args[i]))?,
                );
            }
            "--svg" | "-o" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --svg".to_string());
                }
                config.svg = Some(PathBuf::from(&args[i]));
            }
            "--json" => {
                config.json = true;
            }
            "--verbose" | "-v" => {
                config.verbose = true;
            }
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            other if other.starts_with('-') => {
                return Err(format!("Unknown option: {}", other));
            }
            path => {
                if config_path.is_some() {
                    return Err(format!("Unexpected argument: {}", path));
                }
                config_path = Some(PathBuf::from(path));
            }
        }
        i += 1;
    }

    config.config_path = config_path.ok_or("Missing configuration file")?;
    Ok(config)
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <CONFIG> [OPTIONS]", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -m, --mode <MODE>        Execution mode: full (default) or step");
    eprintln!("  --max-ticks <N>          Stop after N ticks");
    eprintln!("  -o, --svg <FILE>         Write the Gantt chart as SVG");
    eprintln!("  --json                   Print the report as JSON");
    eprintln!("  -v, --verbose            Log every tick to stderr");
    eprintln!("  -h, --help               Show this help message");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} demos/srtf.txt --svg srtf.svg", program);
    eprintln!("  {} demos/priority.txt --mode step", program);
}
