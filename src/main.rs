// sniprun: run a Java snippet from a file or stdin

use std::error::Error;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use crossterm::style::Stylize;
use tracing_subscriber::EnvFilter;

use sniprun::{Engine, EngineConfig, ExecutionResult, ExecutionTier};

const EXIT_FAILURE: i32 = 1;
const EXIT_USAGE: i32 = 2;

#[derive(Parser, Debug)]
#[command(name = "sniprun", about = "Run a Java snippet with an interpreter fallback", version)]
struct Cli {
    /// Snippet file; `-` or nothing reads stdin
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Engine configuration (TOML)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,

    /// Skip the native compiler and interpret directly
    #[arg(long = "interpreter-only")]
    interpreter_only: bool,

    /// Override the execution timeout
    #[arg(long = "timeout-ms", value_name = "N")]
    timeout_ms: Option<u64>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let (config, source) = match prepare(&cli) {
        Ok(prepared) => prepared,
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            process::exit(EXIT_USAGE);
        }
    };

    let result = Engine::new(config).execute(&source);

    let printed = if cli.json {
        print_json(&result)
    } else {
        print_human(&result)
    };
    if let Err(err) = printed {
        eprintln!("{} {}", "error:".red().bold(), err);
        process::exit(EXIT_USAGE);
    }

    if !result.success {
        process::exit(EXIT_FAILURE);
    }
}

fn prepare(cli: &Cli) -> Result<(EngineConfig, String), Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if cli.interpreter_only {
        config.native.enabled = false;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.policy.timeout_ms = timeout_ms;
    }

    let source = match cli.file.as_deref() {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)
            .map_err(|err| format!("cannot read {}: {}", path.display(), err))?,
        _ => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            source
        }
    };
    Ok((config, source))
}

fn print_json(result: &ExecutionResult) -> Result<(), Box<dyn Error>> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, result)?;
    writeln!(stdout)?;
    Ok(())
}

/// Program output on stdout; status, diagnostics and timing on stderr
fn print_human(result: &ExecutionResult) -> Result<(), Box<dyn Error>> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(result.output.as_bytes())?;
    if !result.output.is_empty() && !result.output.ends_with('\n') {
        writeln!(stdout)?;
    }
    stdout.flush()?;

    let tier = match result.tier {
        ExecutionTier::Native => "native",
        ExecutionTier::Interpreter if result.used_fallback => "interpreter, after native failure",
        ExecutionTier::Interpreter => "interpreter",
        ExecutionTier::None => "not run",
    };
    let status = if result.success {
        "ok".green().bold()
    } else {
        "failed".red().bold()
    };
    eprintln!("{} ({}) in {} ms", status, tier, result.duration_ms);

    if let Some(message) = &result.error_message {
        eprintln!("{}", message.as_str().red());
    }
    for diagnostic in &result.diagnostics {
        let line = format!("  • {}", diagnostic);
        if diagnostic.is_error() {
            eprintln!("{}", line.red());
        } else {
            eprintln!("{}", line.yellow());
        }
    }
    Ok(())
}
