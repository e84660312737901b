use clap::{ArgAction, Parser, Subcommand};
use commands::{browse, config, entries, AppContext};
use std::path::PathBuf;
use watchlist_config::PathManager;
use watchlist_models::{MediaType, WatchStatus};

mod commands;
mod logging;
mod output;
mod ui;

#[derive(Parser)]
#[command(name = "watchlist")]
#[command(about = "Watchlist - Keep track of the movies and shows you want to watch")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Write logs to a daily-rotated file instead of stderr (defaults to the data directory's logs/watchlist.log)
    #[arg(long, global = true, value_name = "PATH", num_args = 0..=1)]
    log_file: Option<Option<PathBuf>>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog for movies and shows
    #[command(long_about = "Search the remote catalog. Results are marked when they are already on your watchlist. At most `browse.search_limit` results are shown.")]
    Search {
        /// Search text
        query: String,

        /// Restrict to movies or shows (movie, tv)
        #[arg(long = "type", value_name = "TYPE")]
        media_type: Option<MediaType>,
    },
    /// Browse curated catalog lists
    #[command(long_about = "Show a curated list from the catalog: trending (default), popular, top_rated, or upcoming. Without --type both movies and shows are listed. Passing --genre, --year or --sort switches to a filtered discover query.")]
    Browse {
        /// trending, popular, top_rated, upcoming
        #[arg(default_value = "trending")]
        category: catalog_sources::CatalogCategory,

        /// Only movies or only shows (movie, tv)
        #[arg(long = "type", value_name = "TYPE")]
        media_type: Option<MediaType>,

        /// Genre id (see `watchlist genres`)
        #[arg(long)]
        genre: Option<u64>,

        /// Release year
        #[arg(long)]
        year: Option<u32>,

        /// popularity, vote_average, release_date
        #[arg(long)]
        sort: Option<catalog_sources::SortBy>,

        /// Number of items per list (defaults to `browse.trending_limit`)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List catalog genres
    Genres {
        /// movie or tv
        #[arg(long = "type", value_name = "TYPE", default_value = "movie")]
        media_type: MediaType,
    },
    /// Add a catalog item to the watchlist
    #[command(long_about = "Look up a movie or show by its catalog id and add it to the watchlist. Items already on the list are left alone.")]
    Add {
        /// Catalog id (as shown by search/browse)
        catalog_id: u64,

        /// movie or tv
        #[arg(long = "type", value_name = "TYPE", default_value = "movie")]
        media_type: MediaType,

        /// Initial status (want_to_watch, watching, watched)
        #[arg(long)]
        status: Option<WatchStatus>,
    },
    /// Remove an entry
    Remove {
        /// Entry id, or `movie:<catalog id>` / `tv:<catalog id>`
        target: String,
    },
    /// Edit rating, notes, or status of an entry
    Edit {
        /// Entry id, or `movie:<catalog id>` / `tv:<catalog id>`
        target: String,

        /// Rating from 1 to 10
        #[arg(long, conflicts_with = "clear_rating")]
        rating: Option<u8>,

        #[arg(long, action = ArgAction::SetTrue)]
        clear_rating: bool,

        #[arg(long, conflicts_with = "clear_notes")]
        notes: Option<String>,

        #[arg(long, action = ArgAction::SetTrue)]
        clear_notes: bool,

        #[arg(long)]
        status: Option<WatchStatus>,
    },
    /// Change the status of an entry
    Status {
        /// Entry id, or `movie:<catalog id>` / `tv:<catalog id>`
        target: String,

        /// want_to_watch, watching, watched
        status: WatchStatus,
    },
    /// Mark an entry as watched
    Watched {
        /// Entry id, or `movie:<catalog id>` / `tv:<catalog id>`
        target: String,

        /// Rating from 1 to 10; keeps the current rating when omitted
        #[arg(long)]
        rating: Option<u8>,
    },
    /// Show the watchlist
    List {
        /// Only entries with this status
        #[arg(long)]
        status: Option<WatchStatus>,

        /// Group entries by status
        #[arg(long, action = ArgAction::SetTrue, conflicts_with = "status")]
        grouped: bool,
    },
    /// Count entries per status
    Stats,
    /// Remove every entry
    Clear {
        /// Do not ask for confirmation
        #[arg(long, short, action = ArgAction::SetTrue)]
        yes: bool,
    },
    /// Show or change configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show {
        /// Show the API key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Store the TMDB API key and connection settings
    #[command(long_about = "Store the TMDB API key in the credentials file and optionally change the language. Get a key at https://www.themoviedb.org/settings/api. The WATCHLIST_TMDB_API_KEY environment variable overrides the stored key.")]
    Tmdb {
        /// API key (if not provided, will prompt)
        #[arg(long)]
        api_key: Option<String>,

        /// Response language, e.g. en-US
        #[arg(long)]
        language: Option<String>,

        /// Skip the test request against the catalog
        #[arg(long, action = ArgAction::SetTrue)]
        no_verify: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let log_file = cli
        .log_file
        .clone()
        .map(|path| path.unwrap_or_else(|| PathManager::default().log_file()));
    logging::init_logging_with_file(cli.verbose, cli.quiet, log_file)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    if let Commands::Config { cmd } = cli.command {
        return config::run_config(cmd, &output).await;
    }

    let ctx = AppContext::load()?;

    match cli.command {
        Commands::Search { query, media_type } => browse::run_search(&ctx, &query, media_type, &output).await,
        Commands::Browse { category, media_type, genre, year, sort, limit } => {
            let filters = catalog_sources::DiscoverFilters { genre, year, sort_by: sort };
            browse::run_browse(&ctx, category, media_type, filters, limit, &output).await
        }
        Commands::Genres { media_type } => browse::run_genres(&ctx, media_type, &output).await,
        Commands::Add { catalog_id, media_type, status } => {
            entries::run_add(&ctx, catalog_id, media_type, status, &output).await
        }
        Commands::Remove { target } => entries::run_remove(&ctx, &target, &output),
        Commands::Edit { target, rating, clear_rating, notes, clear_notes, status } => {
            let edit = entries::EditArgs { rating, clear_rating, notes, clear_notes, status };
            entries::run_edit(&ctx, &target, edit, &output)
        }
        Commands::Status { target, status } => entries::run_status(&ctx, &target, status, &output),
        Commands::Watched { target, rating } => entries::run_watched(&ctx, &target, rating, &output),
        Commands::List { status, grouped } => entries::run_list(&ctx, status, grouped, &output),
        Commands::Stats => entries::run_stats(&ctx, &output),
        Commands::Clear { yes } => entries::run_clear(&ctx, yes, &output),
        Commands::Config { .. } => Ok(()),
    }
}
