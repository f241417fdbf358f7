mod render;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use common::{JobId, JobKey, JobRecord, JobType};
use jobdeck_engine::{
    ApiClient, BatchDispatcher, BatchKind, Config, JobListView, Registry, UnifiedJobs,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (.yaml, .yml or .toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct PageArgs {
    /// Page of the list to work on
    #[arg(long)]
    page: Option<u32>,
    /// Extra list query parameter, e.g. status=failed
    #[arg(long = "param", value_name = "KEY=VALUE")]
    params: Vec<String>,
}

#[derive(Args)]
struct SelectArgs {
    /// Jobs to act on: ID or TYPE:ID (e.g. 42, project_update:7)
    selectors: Vec<String>,
    /// Act on every job of the page
    #[arg(long, conflicts_with = "selectors")]
    all: bool,
    #[command(flatten)]
    page: PageArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// List jobs of every type
    List {
        #[command(flatten)]
        page: PageArgs,
        /// Print CSV instead of a table
        #[arg(long)]
        csv: bool,
    },
    /// Delete the selected jobs
    Delete(SelectArgs),
    /// Cancel the selected jobs
    Cancel(SelectArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    jobdeck_engine::logging::setup_logging(&config.logging)?;
    match &config.source {
        Some(path) => log::debug!("Using config file {:?}", path),
        None => log::debug!("No config file found, using defaults"),
    }

    let mut view = build_view(&config)?;

    match cli.command {
        Commands::List { page, csv } => {
            load(&mut view, &config, &page).await?;
            if csv {
                render::jobs_csv(view.jobs())?;
            } else {
                render::jobs_table(&view);
            }
        }
        Commands::Delete(args) => run_bulk(&mut view, &config, args, BatchKind::Delete).await?,
        Commands::Cancel(args) => run_bulk(&mut view, &config, args, BatchKind::Cancel).await?,
    }

    Ok(())
}

fn build_view(config: &Config) -> Result<JobListView> {
    let api = ApiClient::new(&config.api)?;
    let registry = Registry::http(&api);
    Ok(JobListView::new(
        Arc::new(UnifiedJobs::new(api)),
        BatchDispatcher::new(Arc::new(registry)),
        config.list.params(),
    ))
}

async fn load(view: &mut JobListView, config: &Config, page: &PageArgs) -> Result<()> {
    let mut params = config.list.params();
    if let Some(number) = page.page {
        params.set("page", number);
    }
    for raw in &page.params {
        let (key, value) = raw
            .split_once('=')
            .ok_or_else(|| anyhow!("Invalid parameter {:?}, expected KEY=VALUE", raw))?;
        params.set(key, value);
    }
    view.load(params).await.context("Failed to load job list")
}

async fn run_bulk(view: &mut JobListView, config: &Config, args: SelectArgs, kind: BatchKind) -> Result<()> {
    load(view, config, &args.page).await?;

    if args.all {
        view.select_all(true);
    } else {
        if args.selectors.is_empty() {
            bail!("Select jobs to {} by ID or TYPE:ID, or pass --all", kind);
        }
        for key in resolve_selectors(&args.selectors, view.jobs())? {
            if !view.is_selected(&key) {
                view.select_key(&key);
            }
        }
    }

    let gate = match kind {
        BatchKind::Delete => view.delete_gate(),
        BatchKind::Cancel => view.cancel_gate(),
    };
    if !gate.is_enabled() {
        for blocker in &gate.blockers {
            eprintln!("  {}", blocker.describe());
        }
        bail!("Cannot {} the selected jobs", kind);
    }

    let outcome = match kind {
        BatchKind::Delete => view.delete_selected().await,
        BatchKind::Cancel => view.cancel_selected().await,
    };
    render::outcome_table(&outcome);

    if let Some(error) = view.error() {
        render::batch_error(error);
    }
    if let Some(error) = view.content_error() {
        eprintln!("Job list could not be refreshed: {}", error);
    } else {
        render::jobs_table(view);
    }

    if view.error().is_some() {
        std::process::exit(1);
    }
    Ok(())
}

fn resolve_selectors(selectors: &[String], jobs: &[JobRecord]) -> Result<Vec<JobKey>> {
    selectors
        .iter()
        .map(|raw| -> Result<JobKey> {
            let (job_type, id) = match raw.split_once(':') {
                Some((t, id)) => (Some(t.parse::<JobType>()?), id),
                None => (None, raw.as_str()),
            };
            let id = JobId(id.parse().with_context(|| format!("Invalid job id in {:?}", raw))?);

            let matches: Vec<JobKey> = jobs
                .iter()
                .map(|record| record.key())
                .filter(|key| key.id == id && job_type.map_or(true, |t| key.job_type == t))
                .collect();
            match matches.as_slice() {
                [key] => Ok(*key),
                [] => Err(anyhow!("No job {} on this page", raw)),
                _ => Err(anyhow!(
                    "Job id {} is ambiguous, use one of: {}",
                    id,
                    matches.iter().map(|k| k.to_string()).collect::<Vec<_>>().join(", ")
                )),
            }
        })
        .collect()
}
