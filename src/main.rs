use clap::{Parser, Subcommand};
use serde::Serialize;

use miru_catalog::shared::utils::logger::init_logger;
use miru_catalog::{AppConfig, CatalogService};

/// miru-catalog - query the aggregated anime catalog
#[derive(Parser)]
#[command(name = "miru-catalog")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Print cache counters after the command
    #[arg(long, global = true)]
    stats: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Currently trending titles
    #[command(alias = "t")]
    Trending {
        #[arg(long, default_value = "1")]
        page: u32,
    },

    /// Search titles by name
    #[command(alias = "s")]
    Search {
        /// Search query
        #[arg(required = true)]
        query: Vec<String>,
        #[arg(long, default_value = "1")]
        page: u32,
    },

    /// Popular titles, optionally within one genre
    Discover {
        #[arg(long)]
        genre: Option<String>,
        #[arg(long, default_value = "1")]
        page: u32,
    },

    /// List known genres
    Genres,

    /// Show one title with its seasons
    #[command(alias = "i")]
    Info {
        /// MyAnimeList or AniList id
        id: u32,
    },

    /// List reconciled episodes
    #[command(alias = "e")]
    Episodes {
        id: u32,
        #[arg(long, default_value = "1")]
        page: u32,
    },

    /// Streaming links for one episode
    #[command(alias = "w")]
    Watch {
        id: u32,
        episode: u32,
        /// Provider episode id, used instead of the title slug
        #[arg(long)]
        episode_id: Option<String>,
    },

    /// Titles airing this season
    #[command(alias = "new")]
    NewReleases {
        #[arg(long, default_value = "1")]
        page: u32,
    },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logger();
    let config = AppConfig::from_env()?;
    let catalog = CatalogService::from_config(&config)?;

    match cli.command {
        Commands::Trending { page } => print_json(&catalog.trending(page).await?)?,
        Commands::Search { query, page } => {
            print_json(&catalog.search(&query.join(" "), page).await?)?
        }
        Commands::Discover { genre, page } => {
            print_json(&catalog.discover(genre.as_deref(), page).await?)?
        }
        Commands::Genres => print_json(&catalog.genres().await?)?,
        Commands::Info { id } => match catalog.info(id).await? {
            Some(summary) => print_json(&summary)?,
            None => anyhow::bail!("No anime found for id {}", id),
        },
        Commands::Episodes { id, page } => print_json(&catalog.episodes(id, page).await?)?,
        Commands::Watch {
            id,
            episode,
            episode_id,
        } => print_json(
            &catalog
                .streaming(id, episode, episode_id.as_deref())
                .await?,
        )?,
        Commands::NewReleases { page } => print_json(&catalog.new_releases(page).await?)?,
    }

    if cli.stats {
        for (name, stats) in catalog.cache_stats() {
            log::info!(
                "Cache {}: {} hits, {} misses, {} entries ({:.0}% hit rate)",
                name,
                stats.hits,
                stats.misses,
                stats.entries_count,
                stats.hit_rate() * 100.0
            );
        }
    }

    Ok(())
}
