//! logtree sample application
//!
//! Small host application wiring a [`LogDispatcher`] the way a real app would:
//! a provider built from configuration decides between the debug sink
//! (events go to the console through `tracing`) and the remote sink (events go
//! to an in-memory reporter whose reports are printed on exit).
//!
//! ## Usage
//!
//! ```bash
//! # Report an error through the remote sink
//! logtree-sample emit error "upload failed" --tag net
//!
//! # Same event, but in debug mode it is printed locally instead
//! logtree-sample --debug emit error "upload failed"
//!
//! # Only suppress verbose events remotely
//! logtree-sample --ignore verbose emit info "visible"
//!
//! # Log every level from several tasks
//! logtree-sample demo --tasks 4
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use logtree_core::remote::memory::RecordedReport;
use logtree_core::{
    LogDispatcher, MemoryReporter, ProviderConfig, SeverityLevel, StaticProvider,
};

/// logtree sample - route log events to a debug or remote sink
#[derive(Parser)]
#[command(name = "logtree-sample")]
#[command(version = "0.1.0")]
#[command(about = "logtree sample - route log events to a debug or remote sink")]
struct Cli {
    /// Increase verbosity of internal diagnostics (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use the debug sink instead of the remote sink
    #[arg(long, global = true)]
    debug: bool,

    /// Level the remote sink should drop (repeatable; default: verbose, debug, info)
    #[arg(long = "ignore", value_name = "LEVEL", global = true)]
    ignore: Vec<SeverityLevel>,

    /// JSON provider configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a single event
    Emit {
        /// Severity (verbose, debug, info, warn, error, assert or 2-7)
        level: SeverityLevel,

        /// Message to log
        message: String,

        /// Tag attached to the event
        #[arg(short, long)]
        tag: Option<String>,
    },

    /// Log every level from concurrent tasks and attach user context
    Demo {
        /// Number of concurrent tasks
        #[arg(short, long, default_value_t = 3)]
        tasks: usize,
    },
}

fn setup_logging(verbosity: u8, debug_sink: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // The debug sink's own output must always be visible.
    let filter = if debug_sink {
        format!("{},logtree=trace", filter)
    } else {
        filter.to_string()
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();
}

/// Resolve the provider configuration: file, then environment, then flags.
fn load_config(cli: &Cli) -> Result<ProviderConfig> {
    let mut config = match &cli.config {
        Some(path) => ProviderConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ProviderConfig::default(),
    };
    config.apply_env_overrides()?;

    if cli.debug {
        config.debug = true;
    }
    if !cli.ignore.is_empty() {
        config.ignored_levels = cli.ignore.iter().map(|l| l.as_str().to_string()).collect();
    }
    Ok(config)
}

fn print_report(report: &RecordedReport) {
    let field = |key: &str| {
        report
            .context_value(key)
            .map(ToString::to_string)
            .unwrap_or_default()
    };
    println!(
        "report priority={} tag={} message={} error={}",
        field("priority"),
        field("tag"),
        field("message"),
        report.error
    );
}

async fn run_demo(dispatcher: Arc<LogDispatcher>, tasks: usize) -> Result<()> {
    dispatcher.set_user_identifier("sample-user");
    dispatcher.set_user_name("Sample User");
    dispatcher.set("tasks", tasks as i64);

    let handles: Vec<_> = (0..tasks)
        .map(|i| {
            let dispatcher = Arc::clone(&dispatcher);
            tokio::spawn(async move {
                let logger = dispatcher.tag(format!("task-{}", i));
                for level in SeverityLevel::ALL {
                    logger.log(level, format_args!("{} from task {}", level, i));
                    tokio::task::yield_now().await;
                }
            })
        })
        .collect();

    for handle in handles {
        handle.await.context("demo task panicked")?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    setup_logging(cli.verbose, config.debug);

    let provider = Arc::new(StaticProvider::from_config(&config).with_context("logtree-sample"));
    let reporter = Arc::new(MemoryReporter::new());
    let dispatcher = Arc::new(LogDispatcher::with_reporter(reporter.clone()));
    dispatcher.initialize(&provider);

    tracing::info!(
        state = ?dispatcher.state(),
        ignored = %config.ignored_level_set(),
        "sample dispatcher ready"
    );
    println!(
        "sink: {}",
        if dispatcher.has_debug_sink() { "debug" } else { "remote" }
    );

    match cli.command {
        Commands::Emit { level, message, tag } => match tag {
            Some(tag) => dispatcher.tag(tag).log(level, message),
            None => dispatcher.log(level, message),
        },
        Commands::Demo { tasks } => run_demo(Arc::clone(&dispatcher), tasks).await?,
    }

    let reports = reporter.reports();
    for report in &reports {
        print_report(report);
    }
    println!("reports: {}", reports.len());

    dispatcher.dispose();
    Ok(())
}
