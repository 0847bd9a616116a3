//! Casebook CLI - add and list data sources of a forensic case

mod host;
mod logging;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tabled::{Table, Tabled};
use tokio::sync::oneshot;
use tracing::info;

use casebook_core::application::ingest::constants::LOCAL_FILES_DATA_SOURCE_TYPE;
use casebook_core::application::{
    Case, CaseManager, DataSourceLoader, DataSourceProcessor, DataSourceProcessorRegistry,
    IngestTaskHandle, LocalFilesPanel, LocalFilesProcessor,
};
use casebook_core::domain::{DataSourceProcessorResult, DeviceId, LocalFilesConfig};
use casebook_core::port::id_provider::UuidProvider;
use casebook_core::port::time_provider::SystemTimeProvider;
use casebook_core::port::{CaseProvider, IdProvider, TimeProvider};
use casebook_infra_sqlite::open_case_database;
use casebook_infra_system::WalkDirScanner;
use host::{ChannelCallback, Completion, TracingProgressMonitor};

const DEFAULT_CASE_DIR: &str = "~/.casebook/case";

#[derive(Parser)]
#[command(name = "casebook")]
#[command(about = "Add and list data sources of a forensic case", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Case directory (holds the case database)
    #[arg(long, env = "CASEBOOK_CASE_DIR", default_value = DEFAULT_CASE_DIR)]
    case_dir: String,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the case database (no-op if it exists)
    CreateCase,

    /// Add local files and directories as one logical data source
    AddLocalFiles {
        /// Name of the root virtual directory (default: LogicalFileSet<N>)
        #[arg(short, long, default_value = "")]
        name: String,

        /// Device id (default: a new UUID)
        #[arg(long)]
        device_id: Option<String>,

        /// Files and/or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Record a disk image data source (segment paths, first segment first)
    AddImage {
        /// Device id (default: a new UUID)
        #[arg(long)]
        device_id: Option<String>,

        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// List data sources of the case
    DataSources {
        /// Show full image paths instead of file names
        #[arg(long)]
        full_path: bool,
    },

    /// List available data source processors
    Processors,
}

#[derive(Tabled)]
struct DataSourceView {
    id: i64,
    name: String,
}

#[derive(Tabled)]
struct ProcessorView {
    data_source_type: String,
}

/// Wired services for one invocation
struct App {
    cases: Arc<CaseManager>,
    local_files: Arc<LocalFilesProcessor>,
    registry: DataSourceProcessorRegistry,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl App {
    async fn open(case_dir: &Path) -> Result<Self> {
        let database = open_case_database(case_dir)
            .await
            .with_context(|| format!("Failed to open case database in {}", case_dir.display()))?;

        let case_name = case_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| case_dir.display().to_string());

        let cases = Arc::new(CaseManager::new());
        cases.open(Case::new(case_name, case_dir, Arc::new(database)));

        let id_provider: Arc<dyn IdProvider> = Arc::new(UuidProvider);
        let time_provider: Arc<dyn TimeProvider> = Arc::new(SystemTimeProvider);

        let local_files = Arc::new(LocalFilesProcessor::new(
            Arc::new(LocalFilesPanel::new()),
            cases.clone(),
            Arc::new(WalkDirScanner::new()),
            id_provider.clone(),
            time_provider.clone(),
            tokio::runtime::Handle::current(),
        ));

        let mut registry = DataSourceProcessorRegistry::new();
        registry.register(local_files.clone())?;

        Ok(Self {
            cases,
            local_files,
            registry,
            id_provider,
            time_provider,
        })
    }

    fn device_id(&self, explicit: Option<String>) -> Result<DeviceId> {
        let id = explicit.unwrap_or_else(|| self.id_provider.generate_id());
        Ok(DeviceId::new(id)?)
    }
}

/// Wait for the task; Ctrl+C requests cooperative cancellation
async fn await_completion(
    handle: IngestTaskHandle,
    mut completion: oneshot::Receiver<Completion>,
) -> Result<Completion> {
    let finished = tokio::select! {
        done = &mut completion => Some(done),
        _ = tokio::signal::ctrl_c() => None,
    };
    let done = match finished {
        Some(done) => done,
        None => {
            println!("{}", "Cancelling...".yellow());
            handle.cancel();
            completion.await
        }
    };
    handle.wait().await?;
    done.context("Processor finished without reporting a result")
}

fn print_completion(completion: &Completion, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(completion)?);
        return Ok(());
    }

    match completion.result {
        DataSourceProcessorResult::NoErrors => {
            println!("{}", "✓ Data source added".green().bold())
        }
        DataSourceProcessorResult::NonCriticalErrors => {
            println!("{}", "✓ Data source added with errors".yellow().bold())
        }
        DataSourceProcessorResult::CriticalErrors => {
            println!("{}", "✗ Data source not added".red().bold())
        }
    }
    for content in &completion.new_data_sources {
        println!(
            "  {} {} ({}) device {}",
            "•".bold(),
            content.name,
            content.object_id,
            content.device_id
        );
    }
    for error in &completion.errors {
        println!("  {} {}", "!".red(), error);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging()?;

    let cli = Cli::parse();
    let case_dir = PathBuf::from(shellexpand::tilde(&cli.case_dir).into_owned());
    info!(case_dir = %case_dir.display(), "Casebook v{}", casebook_core::VERSION);

    let app = App::open(&case_dir).await?;

    match cli.command {
        Commands::CreateCase => {
            println!(
                "{}",
                format!("✓ Case ready in {}", case_dir.display()).green().bold()
            );
        }

        Commands::AddLocalFiles {
            name,
            device_id,
            paths,
        } => {
            let (callback, completion) = ChannelCallback::new();
            let progress = Arc::new(TracingProgressMonitor);

            let handle = match device_id {
                Some(device_id) => {
                    let config = LocalFilesConfig::new(app.device_id(Some(device_id))?, name, paths)?;
                    app.local_files
                        .run_with_config(config, progress, Arc::new(callback))
                }
                None => {
                    // Drive the processor the way a wizard would
                    let panel = app.local_files.config_panel();
                    panel.set_paths(paths);
                    panel.set_file_set_name(name);

                    let processor = app
                        .registry
                        .find_by_type(LOCAL_FILES_DATA_SOURCE_TYPE)
                        .context("Local files processor not registered")?;
                    if !processor.is_panel_valid() {
                        anyhow::bail!("No usable paths given");
                    }
                    processor.run(progress, Arc::new(callback))?
                }
            };

            let completion = await_completion(handle, completion).await?;
            print_completion(&completion, cli.json)?;
            if completion.result == DataSourceProcessorResult::CriticalErrors {
                std::process::exit(1);
            }
        }

        Commands::AddImage { device_id, paths } => {
            let device_id = app.device_id(device_id)?;
            let case = app.cases.current_case()?;
            let mut tx = case.database().begin_transaction().await?;
            let content = tx
                .add_image_data_source(
                    &device_id,
                    &paths,
                    &app.time_provider.time_zone(),
                    app.time_provider.now_secs(),
                )
                .await?;
            tx.commit().await?;

            print_completion(
                &Completion {
                    result: DataSourceProcessorResult::NoErrors,
                    errors: Vec::new(),
                    new_data_sources: vec![content],
                },
                cli.json,
            )?;
        }

        Commands::DataSources { full_path } => {
            let loader = DataSourceLoader::new(app.cases.clone());
            let map = if full_path {
                loader.full_path_data_source_map().await?
            } else {
                loader.data_source_map().await?
            };

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&map)?);
            } else if map.is_empty() {
                println!("{}", "No data sources".yellow());
            } else {
                let rows: Vec<DataSourceView> = map
                    .into_iter()
                    .map(|(id, name)| DataSourceView { id, name })
                    .collect();
                println!("{}", Table::new(rows));
            }
        }

        Commands::Processors => {
            let rows: Vec<ProcessorView> = app
                .registry
                .types()
                .into_iter()
                .map(|t| ProcessorView {
                    data_source_type: t.to_string(),
                })
                .collect();
            println!("{}", Table::new(rows));
        }
    }

    Ok(())
}
