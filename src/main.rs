//! otakudesu command-line entry point
//!
//! Every subcommand prints its result as pretty JSON on stdout; logs go to
//! stderr.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use otakudesu_scraper::client::{DetailOptions, SearchOptions};
use otakudesu_scraper::config::{load_config_with_hash, Config};
use otakudesu_scraper::{MergePolicy, OtakuClient, SearchKind};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// otakudesu: structured data from the OtakuDesu anime site
#[derive(Parser, Debug)]
#[command(name = "otakudesu")]
#[command(version)]
#[command(about = "Scrape anime listings, episodes and download links", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search the site
    Search {
        query: String,

        /// Result type to search for
        #[arg(long, value_enum, default_value_t = KindArg::Anime)]
        kind: KindArg,

        /// Fetch each anime result's detail page
        #[arg(long)]
        anime_details: bool,

        /// Fetch each episode result's page
        #[arg(long)]
        episode_details: bool,

        /// Fetch each batch result's page
        #[arg(long)]
        batch_details: bool,

        /// Let detail pages overwrite fields the results already have
        #[arg(long)]
        overwrite: bool,

        /// Fail if any detail page cannot be fetched
        #[arg(long)]
        raise_on_error: bool,
    },

    /// Currently airing anime
    Ongoing {
        /// Walk every listing page instead of the first one
        #[arg(long)]
        all: bool,

        /// Do not cache visited listing pages
        #[arg(long)]
        no_cache: bool,
    },

    /// Weekly release schedule
    Schedules,

    /// Alphabetical index of every anime
    AnimeList,

    /// One anime page
    Anime {
        url: String,

        /// Fetch every episode's own page
        #[arg(long)]
        episode_details: bool,
    },

    /// One episode page
    Episode {
        url: String,

        /// Fetch the pages of the other listed episodes
        #[arg(long)]
        episode_details: bool,
    },

    /// One batch download page
    Batch { url: String },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum KindArg {
    Anime,
    Episode,
    Batch,
    All,
}

impl From<KindArg> for SearchKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Anime => SearchKind::Anime,
            KindArg::Episode => SearchKind::Episode,
            KindArg::Batch => SearchKind::Batch,
            KindArg::All => SearchKind::All,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Command::Ongoing { no_cache: true, .. } = cli.command {
        config.pagination.use_cache = false;
    }

    let client = OtakuClient::new(config).context("failed to build HTTP client")?;
    run(&client, cli.command).await
}

async fn run(client: &OtakuClient, command: Command) -> anyhow::Result<()> {
    let mut enrich = client.enrich_options();

    match command {
        Command::Search {
            query,
            kind,
            anime_details,
            episode_details,
            batch_details,
            overwrite,
            raise_on_error,
        } => {
            if overwrite {
                enrich.merge_policy = MergePolicy::Overwrite;
            }
            enrich.raise_on_error |= raise_on_error;
            let options = SearchOptions {
                anime_details,
                episode_details,
                batch_details,
                enrich,
            };
            print_json(&client.search(&query, kind.into(), &options).await?)
        }
        Command::Ongoing { all: true, .. } => print_json(&client.ongoing_all().await?),
        Command::Ongoing { all: false, .. } => {
            let walker = client.ongoing().await?;
            print_json(walker.records())
        }
        Command::Schedules => print_json(&client.schedules().await?),
        Command::AnimeList => print_json(&client.anime_list().await?),
        Command::Anime {
            url,
            episode_details,
        } => {
            let options = DetailOptions {
                episode_details,
                enrich,
            };
            print_json(&client.anime(&url, &options).await?)
        }
        Command::Episode {
            url,
            episode_details,
        } => {
            let options = DetailOptions {
                episode_details,
                enrich,
            };
            print_json(&client.episode(&url, &options).await?)
        }
        Command::Batch { url } => print_json(&client.batch(&url).await?),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("otakudesu_scraper=info,warn"),
            1 => EnvFilter::new("otakudesu_scraper=debug,info"),
            2 => EnvFilter::new("otakudesu_scraper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
