use agora::{
    diagnostics::{emit_syntax_errors, report_io_error, report_runtime_error},
    print_string,
    runtime::config::{self, EngineConfig},
    EvalFailure,
};
use clap::{Parser, Subcommand};
use std::{fs, path::PathBuf, process::ExitCode};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "agora")]
#[command(version, about = "Evaluate programs for the Agora object engine", long_about = None)]
struct Cli {
    /// Engine configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a program file and print its result
    Run {
        /// Program to evaluate
        file: PathBuf,
    },
    /// Evaluate a program given on the command line
    Eval {
        /// Program text
        source: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let engine = match load_config(cli.config.as_ref()) {
        Ok(engine) => engine,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };
    debug!(?engine, "engine configuration");
    config::install(engine);

    let (name, source) = match cli.command {
        Commands::Run { file } => match fs::read_to_string(&file) {
            Ok(source) => (file.display().to_string(), source),
            Err(error) => {
                report_io_error(&file, &error);
                return ExitCode::FAILURE;
            }
        },
        Commands::Eval { source } => ("<eval>".to_string(), source),
    };

    match agora::evaluate(&source) {
        Ok(value) => match print_string(&value) {
            Ok(printed) => {
                println!("{printed}");
                ExitCode::SUCCESS
            }
            Err(error) => {
                report_runtime_error(&error);
                ExitCode::FAILURE
            }
        },
        Err(EvalFailure::Syntax(errors)) => {
            emit_syntax_errors(&name, &source, &errors);
            ExitCode::FAILURE
        }
        Err(EvalFailure::Runtime(error)) => {
            report_runtime_error(&error);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("AGORA_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<EngineConfig, String> {
    let base = match path {
        Some(path) => EngineConfig::load(path).map_err(|err| err.to_string())?,
        None => EngineConfig::default(),
    };
    base.with_env_overrides().map_err(|err| err.to_string())
}
