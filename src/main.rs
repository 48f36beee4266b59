mod commands;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::env;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use opinaai::db::Database;
use opinaai::filters::{self, Filters};
use opinaai::models::{Location, NewComplaint, Status};
use opinaai::storage::Storage;
use opinaai::store::ComplaintStore;

const DATA_DIR_NAME: &str = ".opinaai";

#[derive(Parser)]
#[command(name = "opinaai")]
#[command(about = "Post, browse and answer complaints about public services")]
#[command(version)]
struct Cli {
    /// Data directory (defaults to the nearest .opinaai in this or a parent directory)
    #[arg(long, global = true, env = "OPINAAI_DIR")]
    data_dir: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize opinaai in the current directory and seed mock data
    Init {
        /// Replace existing data with fresh mock data
        #[arg(short, long)]
        force: bool,
    },

    /// List complaints
    List {
        /// Filter by city
        #[arg(long)]
        city: Option<String>,
        /// Filter by category
        #[arg(long)]
        category: Option<String>,
        /// Filter by complaint type
        #[arg(long = "type")]
        kind: Option<String>,
        /// Filter by status (awaiting, in-progress, resolved)
        #[arg(short, long)]
        status: Option<String>,
        /// Search title, description, city, category and type
        #[arg(short = 'q', long)]
        search: Option<String>,
        /// Sort order (recent, likes, comments)
        #[arg(long, default_value = "recent")]
        sort: String,
        /// Print the cities, categories and types available to filter on
        #[arg(long)]
        options: bool,
    },

    /// Show complaint details
    Show {
        /// Complaint ID
        id: String,
    },

    /// Post a new complaint as the current user
    Create {
        /// Complaint title
        title: String,
        /// Complaint description
        #[arg(short, long)]
        description: String,
        /// City
        #[arg(long)]
        city: String,
        /// Category
        #[arg(long)]
        category: String,
        /// Complaint type within the category
        #[arg(long = "type")]
        kind: String,
        /// Image reference (repeatable)
        #[arg(long = "image")]
        images: Vec<String>,
        /// Latitude
        #[arg(long, requires = "lng", allow_hyphen_values = true)]
        lat: Option<f64>,
        /// Longitude
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lng: Option<f64>,
        /// Street address
        #[arg(long, requires = "lat")]
        address: Option<String>,
    },

    /// Like a complaint, or remove your like
    Like {
        /// Complaint ID
        id: String,
    },

    /// Comment on a complaint
    Comment {
        /// Complaint ID
        id: String,
        /// Comment text
        text: String,
    },

    /// Respond to a complaint (admin only)
    Respond {
        /// Complaint ID
        id: String,
        /// Response text
        text: String,
    },

    /// Change a complaint's status (admin only)
    Status {
        /// Complaint ID
        id: String,
        /// New status (awaiting, in-progress, resolved)
        status: String,
    },

    /// Delete one of your complaints
    Delete {
        /// Complaint ID
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// Statistics
    Stats {
        #[command(subcommand)]
        action: StatsCommands,
    },

    /// List users
    Users,

    /// Act as another user
    Login {
        /// User ID
        id: String,
    },

    /// Clear the current user
    Logout,

    /// Show the current user
    Whoami,

    /// Export complaints
    Export {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Format (json, markdown)
        #[arg(short, long, default_value = "json")]
        format: String,
    },
}

#[derive(Subcommand)]
enum StatsCommands {
    /// Rank cities
    Cities {
        /// Ranking (resolution, total, speed)
        #[arg(long, default_value = "resolution")]
        by: String,
        /// Number of cities to show (default 10)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Complaints per category
    Categories {
        /// Number of categories to show
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Dashboard overview
    Overview,
    /// Resolution rate of cities with at least two complaints
    Chart,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn find_data_dir() -> Result<PathBuf> {
    let mut current = env::current_dir()?;

    loop {
        let candidate = current.join(DATA_DIR_NAME);
        if candidate.exists() && candidate.is_dir() {
            return Ok(candidate);
        }

        if !current.pop() {
            bail!("Not an opinaai directory (or any parent). Run 'opinaai init' first.");
        }
    }
}

fn open_store(data_dir: &Path) -> Result<ComplaintStore> {
    let db_path = data_dir.join(commands::init::DB_FILE_NAME);
    let db = Database::open(&db_path).context("Failed to open database")?;
    ComplaintStore::open(Storage::new(db))
}

fn get_store(data_dir: Option<&Path>) -> Result<ComplaintStore> {
    match data_dir {
        Some(dir) => {
            if !dir.is_dir() {
                bail!("Data directory {} does not exist", dir.display());
            }
            open_store(dir)
        }
        None => open_store(&find_data_dir()?),
    }
}

fn or_empty(value: Option<String>) -> String {
    value.unwrap_or_default()
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);
    let data_dir = cli.data_dir.as_deref();

    match cli.command {
        Commands::Init { force } => {
            let dir = match data_dir {
                Some(dir) => dir.to_path_buf(),
                None => env::current_dir()?.join(DATA_DIR_NAME),
            };
            commands::init::run(&dir, force)
        }

        Commands::List {
            city,
            category,
            kind,
            status,
            search,
            sort,
            options,
        } => {
            let mut store = get_store(data_dir)?;
            if options {
                return commands::list::options(&store);
            }
            let status = match status {
                Some(s) if s != filters::ALL => s.parse::<Status>()?.label().to_string(),
                other => or_empty(other),
            };
            let filters = Filters {
                city: or_empty(city),
                category: or_empty(category),
                kind: or_empty(kind),
                status,
                search: or_empty(search),
            };
            commands::list::run(&mut store, filters, &sort)
        }

        Commands::Show { id } => {
            let store = get_store(data_dir)?;
            commands::show::run(&store, &id)
        }

        Commands::Create {
            title,
            description,
            city,
            category,
            kind,
            images,
            lat,
            lng,
            address,
        } => {
            let mut store = get_store(data_dir)?;
            let location = match (lat, lng) {
                (Some(lat), Some(lng)) => Some(Location { lat, lng, address }),
                _ => None,
            };
            commands::create::run(
                &mut store,
                NewComplaint {
                    title,
                    description,
                    city,
                    category,
                    kind,
                    images,
                    location,
                },
            )
        }

        Commands::Like { id } => {
            let mut store = get_store(data_dir)?;
            commands::like::run(&mut store, &id)
        }

        Commands::Comment { id, text } => {
            let mut store = get_store(data_dir)?;
            commands::comment::run(&mut store, &id, &text)
        }

        Commands::Respond { id, text } => {
            let mut store = get_store(data_dir)?;
            commands::respond::run(&mut store, &id, &text)
        }

        Commands::Status { id, status } => {
            let mut store = get_store(data_dir)?;
            commands::status::run(&mut store, &id, &status)
        }

        Commands::Delete { id, force } => {
            let mut store = get_store(data_dir)?;
            commands::delete::run(&mut store, &id, force)
        }

        Commands::Stats { action } => {
            let store = get_store(data_dir)?;
            match action {
                StatsCommands::Cities { by, limit } => {
                    commands::stats::cities(&store, &by, limit)
                }
                StatsCommands::Categories { limit } => {
                    commands::stats::categories(&store, limit)
                }
                StatsCommands::Overview => commands::stats::overview(&store),
                StatsCommands::Chart => commands::stats::chart(&store),
            }
        }

        Commands::Users => {
            let store = get_store(data_dir)?;
            commands::users::list(&store)
        }

        Commands::Login { id } => {
            let mut store = get_store(data_dir)?;
            commands::users::login(&mut store, &id)
        }

        Commands::Logout => {
            let mut store = get_store(data_dir)?;
            commands::users::logout(&mut store)
        }

        Commands::Whoami => {
            let store = get_store(data_dir)?;
            commands::users::whoami(&store)
        }

        Commands::Export { output, format } => {
            let store = get_store(data_dir)?;
            match format.as_str() {
                "json" => commands::export::run_json(&store, output.as_deref()),
                "markdown" | "md" => commands::export::run_markdown(&store, output.as_deref()),
                other => bail!("Unknown export format '{}'. Use json or markdown", other),
            }
        }
    }
}
