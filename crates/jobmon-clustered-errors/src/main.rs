/*
[INPUT]:  CLI arguments, YAML configuration file, environment, OS shutdown signals
[OUTPUT]: Clustered error listings on stdout, or the interactive TUI
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, subcommands, startup flow, or shutdown handling
*/

mod tui;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use jobmon_adapter::JobmonClient;
use jobmon_clustered_errors::report::{detail_listing, groups_table, workflow_header};
use jobmon_clustered_errors::view::GROUPS_FAILED_MESSAGE;
use jobmon_clustered_errors::{ClusteredErrorsPanel, ErrorLogSource, ViewerConfig};

use crate::tui::{LOG_BUFFER_CAPACITY, LogBuffer, LogWriterFactory, run_tui_with_log};

#[derive(Parser, Debug)]
#[command(
    name = "jobmon-clustered-errors",
    version,
    about = "Browse clustered task errors of a Jobmon workflow"
)]
struct Cli {
    #[arg(long = "config", value_name = "PATH", global = true)]
    config_path: Option<PathBuf>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info", global = true)]
    log_level: String,
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    log_file: Option<PathBuf>,
    /// Validate configuration and exit
    #[arg(long = "dry-run", global = true)]
    dry_run: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the clustered errors of a task template
    List {
        #[arg(long)]
        workflow: u64,
        #[arg(long)]
        template: u64,
    },
    /// Print one error sample
    Show {
        #[arg(long)]
        workflow: u64,
        #[arg(long)]
        template: u64,
        #[arg(long = "task-instance")]
        task_instance: u64,
    },
    /// Browse clustered errors interactively
    Tui {
        #[arg(long)]
        workflow: u64,
        #[arg(long)]
        template: Option<u64>,
    },
    /// Print the resolved configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    let tui_mode = matches!(args.command, Command::Tui { .. });
    let log_buffer = Arc::new(Mutex::new(LogBuffer::new(LOG_BUFFER_CAPACITY)));
    let _log_guard = init_tracing(&args, tui_mode.then(|| log_buffer.clone()))?;

    let config = ViewerConfig::load(args.config_path.as_deref()).context("load config")?;
    info!(
        service_url = %config.http.service_url,
        route_prefix = %config.http.route_prefix,
        "configuration loaded"
    );

    if args.dry_run {
        info!("dry-run requested; configuration validated");
        return Ok(());
    }

    if let Command::Config = args.command {
        print!("{}", config.to_yaml()?);
        return Ok(());
    }

    let client = JobmonClient::with_config(config.client_config(), &config.http.service_url)
        .context("create jobmon client")?;

    match args.command {
        Command::List { workflow, template } => {
            print_workflow_header(&client, workflow).await;
            match client.error_groups(workflow, template).await {
                Ok(groups) => print!("{}", groups_table(&groups)),
                Err(err) => {
                    warn!(workflow, template, error = %err, "clustered errors request failed");
                    println!("{GROUPS_FAILED_MESSAGE}");
                }
            }
        }
        Command::Show {
            workflow,
            template,
            task_instance,
        } => {
            let detail = client
                .error_detail(workflow, template, task_instance)
                .await
                .unwrap_or_else(|err| {
                    warn!(task_instance, error = %err, "error detail request failed");
                    None
                });
            println!("Error Sample for Task Instance ID: {task_instance}");
            print!("{}", detail_listing(task_instance, detail.as_ref()));
        }
        Command::Tui { workflow, template } => {
            let shutdown = CancellationToken::new();
            setup_signal_handlers(shutdown.clone());
            let panel =
                ClusteredErrorsPanel::new(workflow, config.cache_ttl()).with_task_template(template);
            run_tui_with_log(Arc::new(client), panel, log_buffer, shutdown)
                .await
                .context("run tui")?;
        }
        Command::Config => {}
    }

    Ok(())
}

/// Workflow details are decoration; failures are only logged.
async fn print_workflow_header(client: &JobmonClient, workflow_id: u64) {
    match client.workflow_details(workflow_id).await {
        Ok(details) => println!("{}\n", workflow_header(workflow_id, details.as_ref())),
        Err(err) => warn!(workflow_id, error = %err, "workflow details unavailable"),
    }
}

/// Logs go to stderr, or to the TUI log pane when `tui_buffer` is set, plus
/// an optional non-blocking file writer.
fn init_tracing(
    args: &Cli,
    tui_buffer: Option<Arc<Mutex<LogBuffer>>>,
) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .context("invalid log level")?;

    let (file_layer, guard) = match &args.log_file {
        Some(path) => {
            let directory = path
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let file_name = path.file_name().context("log file path has no file name")?;
            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let (tui_layer, stderr_layer) = match tui_buffer {
        Some(buffer) => (
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(LogWriterFactory::new(buffer)),
            ),
            None,
        ),
        None => (
            None,
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(tui_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(guard)
}

fn setup_signal_handlers(shutdown: CancellationToken) {
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install SIGINT handler");
            return;
        }
        info!("received SIGINT");
        shutdown_clone.cancel();
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let shutdown_clone = shutdown.clone();
        tokio::spawn(async move {
            match signal(SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                    info!("received SIGTERM");
                    shutdown_clone.cancel();
                }
                Err(err) => {
                    warn!(error = %err, "failed to install SIGTERM handler");
                }
            }
        });
    }
}
