use std::path::PathBuf;

use clap::{Parser, Subcommand};
use logreg::{LoggerRegistry, ProcessEnv, ProcessPaths, Severity};
use serde_json::{json, Value};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "logreg-cli")]
#[command(about = "Inspect and exercise a process logging configuration", long_about = None)]
struct Cli {
    /// Base directory holding etc/conf/logging.json
    #[arg(short, long, env = "LOGREG_PREFIX")]
    prefix: Option<PathBuf>,

    /// Directory log files are written to [default: <prefix>/log]
    #[arg(short, long, env = "LOGREG_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Process name used for the built-in default log file
    #[arg(short = 'n', long, env = "LOGREG_PROCESS_NAME")]
    process_name: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved loggers and initialization events as JSON
    Check,
    /// Write one record through a logger
    Emit {
        /// Logger to write through; unknown names use the default logger
        #[arg(short = 'L', long, default_value = "default")]
        logger: String,

        /// Record severity
        #[arg(short = 's', long, default_value = "info")]
        level: Severity,

        message: String,
    },
}

impl Cli {
    fn paths(&self) -> ProcessPaths {
        let derived = ProcessPaths::from_current_exe();
        let prefix = self.prefix.clone().unwrap_or(derived.prefix);
        let log_dir = self.log_dir.clone().unwrap_or_else(|| prefix.join("log"));
        let process_name = self.process_name.clone().unwrap_or(derived.process_name);
        ProcessPaths::new(prefix, log_dir, process_name)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "logreg=info,logreg_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let paths = cli.paths();
    tracing::debug!(
        prefix = %paths.prefix_path().display(),
        log_dir = %paths.log_dir().display(),
        process = paths.process_name(),
        "building logger registry"
    );
    let registry = LoggerRegistry::init(&paths);

    match cli.command {
        Commands::Check => {
            println!("{}", serde_json::to_string_pretty(&describe(&registry))?);
        }
        Commands::Emit {
            logger,
            level,
            message,
        } => {
            let handle = registry.resolve(&[logger.as_str()]);
            if handle.name() != logger {
                tracing::warn!(requested = %logger, "unknown logger, using default");
            }
            handle.log(level, &message);
            tracing::info!(logger = handle.name(), %level, "record emitted");
        }
    }

    Ok(())
}

fn describe(registry: &LoggerRegistry) -> Value {
    let loggers: Vec<Value> = registry
        .names()
        .into_iter()
        .filter_map(|name| registry.get(name))
        .map(|handle| {
            let cores: Vec<Value> = handle
                .cores()
                .iter()
                .map(|core| {
                    json!({
                        "target": core.target,
                        "encoder": core.encoder,
                        "filter": core.filter.to_string(),
                    })
                })
                .collect();
            json!({
                "name": handle.name(),
                "level": handle.level().to_string(),
                "env": handle.environment(),
                "cores": cores,
            })
        })
        .collect();

    json!({
        "loggers": loggers,
        "events": registry.events(),
    })
}
