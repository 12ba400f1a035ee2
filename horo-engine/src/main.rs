//! horo - command-line front end for the horoscope engine
//!
//! Resolves signs, prints daily/weekly readings (generating and caching them on
//! first request), and maintains the reading cache. Output is JSON on stdout;
//! logs go to stderr or the configured log file.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use futures::StreamExt;
use serde::Serialize;
use tracing::{debug, info, warn};

use horo_common::config::{RootFolderInitializer, RootFolderResolver, TomlConfig};
use horo_common::db::init_database;
use horo_common::time::{parse_date, today};
use horo_engine::config::RuntimeSettings;
use horo_engine::content::{ContentCatalog, ContentSource, DirectoryContentSource, StaticContentSource};
use horo_engine::{
    CacheState, HoroscopeService, MemoryReadingStore, ReadingStore, RetentionPolicy, Sign,
    SqliteReadingStore,
};

/// English bank compiled into the binary, used when no content directory is found
const BUNDLED_CONTENT: &str = include_str!("../content/en/zodiac.json");

/// Command-line arguments for horo
#[derive(Parser, Debug)]
#[command(name = "horo")]
#[command(about = "Deterministic horoscope readings with a local cache")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct GlobalArgs {
    /// Root folder holding horo.db
    #[arg(long, global = true)]
    root_folder: Option<PathBuf>,

    /// Content directory (`{dir}/{locale}/zodiac.json`)
    #[arg(long, global = true, env = "HORO_CONTENT_DIR")]
    content_dir: Option<PathBuf>,

    /// Content locale for this run
    #[arg(long, global = true)]
    locale: Option<String>,

    /// Keep readings in memory instead of the database
    #[arg(long, global = true)]
    memory: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign for a date (YYYY-MM-DD)
    Sign { date: String },
    /// Attributes of a sign
    Info { sign: Sign },
    #[command(flatten)]
    Cached(CachedCommand),
}

/// Commands that need the content catalog and the reading store
#[derive(Subcommand, Debug)]
enum CachedCommand {
    /// Daily reading
    Daily {
        #[arg(long, conflicts_with = "birthdate")]
        sign: Option<Sign>,
        /// Resolve the sign from a birthdate instead
        #[arg(long)]
        birthdate: Option<String>,
        /// Reading date, defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// Weekly reading for the week containing --date
    Weekly {
        #[arg(long)]
        sign: Sign,
        #[arg(long)]
        date: Option<String>,
    },
    /// Cached daily reading by id, e.g. leo_2024-08-01
    Show { id: String },
    /// Compatibility of two signs
    Compat { first: Sign, second: Sign },
    /// Delete stale readings
    Evict {
        /// Days to keep; defaults to the configured retention
        #[arg(long)]
        days: Option<u32>,
    },
    /// Number of cached readings
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let toml_config = TomlConfig::load_or_default();
    init_tracing(&toml_config)?;

    info!("Starting horo v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Sign { date } => print_json(&horo_engine::zodiac::resolve(parse_date(&date)?)),
        Command::Info { sign } => print_json(&horo_engine::zodiac::info(sign)),
        Command::Cached(command) => {
            let (service, retention) = build_service(&cli.global, toml_config).await?;
            run_cached(command, &service, retention).await
        }
    }
}

async fn run_cached(
    command: CachedCommand,
    service: &HoroscopeService,
    retention: RetentionPolicy,
) -> Result<()> {
    match command {
        CachedCommand::Daily {
            sign,
            birthdate,
            date,
        } => {
            let date = optional_date(date.as_deref())?;
            let stream = match (sign, birthdate) {
                (Some(sign), None) => service.get_daily_horoscope(sign, date).boxed(),
                (None, Some(birthdate)) => service
                    .get_user_daily_horoscope(parse_date(&birthdate)?, date)
                    .boxed(),
                _ => bail!("pass either --sign or --birthdate"),
            };
            print_terminal(stream).await
        }
        CachedCommand::Weekly { sign, date } => {
            let date = optional_date(date.as_deref())?;
            print_terminal(service.get_weekly_horoscope(sign, date).boxed()).await
        }
        CachedCommand::Show { id } => match service.get_horoscope_by_id(&id).await? {
            Some(reading) => print_json(&reading),
            None => bail!("no cached reading with id '{}'", id),
        },
        CachedCommand::Compat { first, second } => {
            print_json(&service.get_compatibility(first, second).await)
        }
        CachedCommand::Evict { days: Some(days) } => {
            print_json(&service.clear_old_cache(days).await?)
        }
        CachedCommand::Evict { days: None } => {
            let today = today();
            let (daily_deleted, weekly_deleted) =
                service.evictor().evict_with(retention, today).await?;
            print_json(&serde_json::json!({
                "daily_cutoff": retention.daily_cutoff(today),
                "weekly_cutoff": retention.weekly_cutoff(today),
                "daily_deleted": daily_deleted,
                "weekly_deleted": weekly_deleted,
            }))
        }
        CachedCommand::Stats => print_json(&service.cache_stats().await?),
    }
}

fn init_tracing(config: &TomlConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match &config.logging.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

async fn build_service(
    args: &GlobalArgs,
    toml_config: TomlConfig,
) -> Result<(HoroscopeService, RetentionPolicy)> {
    let default_locale = toml_config.default_locale().to_string();
    let content_dir_override = args.content_dir.clone().or_else(|| toml_config.content_dir.clone());

    let resolver = RootFolderResolver::new("horo")
        .with_cli_arg(args.root_folder.clone())
        .with_toml_config(toml_config);
    let initializer = RootFolderInitializer::new(resolver.resolve());

    let (store, settings): (Arc<dyn ReadingStore>, RuntimeSettings) = if args.memory {
        info!("Using in-memory reading store");
        (Arc::new(MemoryReadingStore::new()), RuntimeSettings::default())
    } else {
        initializer.ensure_directory_exists()?;
        let db_path = initializer.database_path();
        info!("Database path: {}", db_path.display());
        let pool = init_database(&db_path)
            .await
            .context("Failed to open reading database")?;
        let settings = RuntimeSettings::load(&pool).await?;
        (Arc::new(SqliteReadingStore::new(pool)), settings)
    };

    let content_dir = content_dir_override.unwrap_or_else(|| initializer.content_path());
    let source = content_source(content_dir, &default_locale).await;
    let catalog = Arc::new(ContentCatalog::new(source, default_locale));

    let service = HoroscopeService::new(catalog, store);
    let locale = args.locale.clone().unwrap_or(settings.content_locale);
    service.set_locale(&locale).await;
    debug!(locale = %locale, "Active content locale");

    Ok((service, settings.retention))
}

async fn content_source(content_dir: PathBuf, default_locale: &str) -> Arc<dyn ContentSource> {
    let directory = DirectoryContentSource::new(&content_dir);
    match directory.locales().await {
        Ok(locales) if !locales.is_empty() => {
            info!(dir = %content_dir.display(), ?locales, "Using content directory");
            Arc::new(directory)
        }
        _ => {
            warn!(
                dir = %content_dir.display(),
                "No content found, using bundled English content"
            );
            Arc::new(StaticContentSource::new().with_document(default_locale, BUNDLED_CONTENT))
        }
    }
}

fn optional_date(text: Option<&str>) -> Result<NaiveDate> {
    match text {
        Some(text) => Ok(parse_date(text)?),
        None => Ok(today()),
    }
}

/// Drain a state stream and print its terminal state
async fn print_terminal<T: Serialize>(
    mut stream: futures::stream::BoxStream<'static, CacheState<T>>,
) -> Result<()> {
    while let Some(state) = stream.next().await {
        match state {
            CacheState::Loading => debug!("Loading"),
            CacheState::Success(reading) => return print_json(&reading),
            CacheState::Error(reason) => bail!(reason),
        }
    }
    bail!("reading stream ended without a result")
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
