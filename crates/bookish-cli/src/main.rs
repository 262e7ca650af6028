//! Bookish CLI
//!
//! Command-line interface for Bookish - a local-first reading tracker.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use bookish_core::{Library, Shelf};

mod catalog;
mod commands;
mod output;
mod prompt;

use commands::shelf::EditFields;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "bookish")]
#[command(about = "Bookish - Track, discover, and remember your reading")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Shelf selector for CLI arguments
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ShelfArg {
    /// To-be-read
    Goal,
    /// Currently reading
    Reading,
    /// Finished
    Read,
}

impl From<ShelfArg> for Shelf {
    fn from(arg: ShelfArg) -> Self {
        match arg {
            ShelfArg::Goal => Shelf::Goal,
            ShelfArg::Reading => Shelf::Reading,
            ShelfArg::Read => Shelf::Read,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Search the remote book catalog
    Search {
        /// Search query
        query: String,
        /// Result offset for pagination
        #[arg(long, default_value_t = 0)]
        offset: u32,
        /// Maximum number of results
        #[arg(long, default_value_t = catalog::DEFAULT_LIMIT)]
        limit: u32,
        /// Add the Nth result (1-based) to the To Be Read shelf
        #[arg(long)]
        add: Option<usize>,
    },
    /// Add a manually entered book to the To Be Read shelf
    Add {
        /// Book title
        title: String,
        /// Author display name
        #[arg(short, long)]
        author: Option<String>,
        /// Total page count
        #[arg(short, long)]
        pages: Option<u32>,
        /// Genre
        #[arg(short, long)]
        genre: Option<String>,
    },
    /// Start reading a book from the To Be Read shelf
    Start {
        /// Book ID
        id: String,
    },
    /// Update reading progress
    Progress {
        /// Book ID
        id: String,
        /// Current page (clamped into the book's page range)
        page: i64,
    },
    /// Finish a book with a rating and optional review
    Finish {
        /// Book ID (on the To Be Read or Currently Reading shelf)
        id: String,
        /// Star rating, 1-5
        #[arg(short, long)]
        rating: u8,
        /// Free-text review
        #[arg(long)]
        review: Option<String>,
    },
    /// List books on one shelf, or all shelves
    #[command(alias = "ls")]
    List {
        /// Shelf to list
        shelf: Option<ShelfArg>,
    },
    /// Remove a book from a shelf
    #[command(alias = "rm")]
    Remove {
        /// Shelf to remove from
        shelf: ShelfArg,
        /// Book ID
        id: String,
    },
    /// Edit a book's fields in place
    Edit {
        /// Shelf the book is on
        shelf: ShelfArg,
        /// Book ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New author
        #[arg(long)]
        author: Option<String>,
        /// New total page count
        #[arg(long)]
        pages: Option<u32>,
        /// New current page (reading shelf)
        #[arg(long)]
        page: Option<i64>,
        /// New rating, 1-5 (finished shelf)
        #[arg(long)]
        rating: Option<u8>,
        /// New review text
        #[arg(long)]
        review: Option<String>,
        /// New genre
        #[arg(long)]
        genre: Option<String>,
    },
    /// Export the whole library to a JSON snapshot
    Export {
        /// Output file (default: bookish-library-<date>.json)
        path: Option<PathBuf>,
    },
    /// Import a snapshot, replacing all current data
    Import {
        /// Snapshot file to import
        path: PathBuf,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Delete all data from every shelf
    Clear {
        /// Skip the confirmation prompts
        #[arg(long)]
        yes: bool,
    },
    /// Show library status and quick stats
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, catalog_url)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands don't need the library
    if let Commands::Config { command } = &cli.command {
        return match command.clone() {
            Some(ConfigCommands::Show) | None => commands::config::show(&output),
            Some(ConfigCommands::Set { key, value }) => {
                commands::config::set(key, value, &output)
            }
        };
    }

    let mut library = Library::open()?;

    match cli.command {
        Commands::Search {
            query,
            offset,
            limit,
            add,
        } => commands::search::run(&mut library, query, offset, limit, add, &output),
        Commands::Add {
            title,
            author,
            pages,
            genre,
        } => commands::book::add(&mut library, title, author, pages, genre, &output),
        Commands::Start { id } => commands::book::start(&mut library, id, &output),
        Commands::Progress { id, page } => {
            commands::book::progress(&mut library, id, page, &output)
        }
        Commands::Finish { id, rating, review } => {
            commands::book::finish(&mut library, id, rating, review, &output)
        }
        Commands::List { shelf } => {
            commands::shelf::list(&library, shelf.map(Into::into), &output)
        }
        Commands::Remove { shelf, id } => {
            commands::shelf::remove(&mut library, shelf.into(), id, &output)
        }
        Commands::Edit {
            shelf,
            id,
            title,
            author,
            pages,
            page,
            rating,
            review,
            genre,
        } => {
            let fields = EditFields {
                title,
                author,
                pages,
                page,
                rating,
                review,
                genre,
            };
            commands::shelf::edit(&mut library, shelf.into(), id, fields, &output)
        }
        Commands::Export { path } => commands::data::export(&library, path, &output),
        Commands::Import { path, yes } => {
            commands::data::import(&mut library, path, yes, &output)
        }
        Commands::Clear { yes } => commands::data::clear(&mut library, yes, &output),
        Commands::Status => commands::status::show(&library, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}
