mod file_store;
mod lucky;
mod menu;
mod pantry;
mod recipes;
mod seed;

use anyhow::{Context, Result};
use bistro_core::BistroConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::file_store::{FilePantryStore, FileRecipeStore};

#[derive(Parser)]
#[command(name = "bistro")]
#[command(about = "What can I cook with what's in my pantry?", long_about = None)]
struct Cli {
    /// Directory holding pantry.json and recipes.json (default: $BISTRO_DATA_DIR or ~/.bistro)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a sample pantry and recipe collection
    Seed {
        /// Replace existing data
        #[arg(long)]
        force: bool,
    },
    /// Show recipes that can be cooked now and ones that are close
    Menu {
        /// Only recipes carrying this tag (repeatable; all must match)
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Maximum cooking time in minutes
        #[arg(long)]
        max_time: Option<u32>,
        /// Hide recipes that are missing ingredients
        #[arg(long)]
        available_only: bool,
    },
    /// Suggest a random recipe
    Lucky {
        /// quick, comfort, healthy, adventurous, family or date-night
        #[arg(long)]
        mood: Option<String>,
        /// Draw from every recipe, not just the ones that can be cooked now
        #[arg(long)]
        any: bool,
        /// Seed for a repeatable pick
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Show a recipe with its ingredient checklist
    Recipe {
        /// Recipe name (case-insensitive)
        name: String,
    },
    /// List recipes
    Recipes {
        /// Filter by recipe or ingredient name
        #[arg(long)]
        search: Option<String>,
    },
    /// Add a recipe from a JSON file
    AddRecipe {
        /// Path to a JSON recipe
        file: PathBuf,
        /// Comma-separated tags, replacing the file's tags
        #[arg(long)]
        tags: Option<String>,
    },
    /// List pantry items
    Pantry {
        /// Filter by ingredient name
        #[arg(long)]
        search: Option<String>,
        /// Only this category
        #[arg(long)]
        category: Option<String>,
        /// Flip the stock flag of one item and save right away
        #[arg(long)]
        toggle: Option<String>,
    },
    /// Edit several pantry items and save them together
    Edit {
        /// Mark an item out of stock (repeatable)
        #[arg(long = "out-of-stock")]
        out_of_stock: Vec<String>,
        /// Mark an item in stock (repeatable)
        #[arg(long = "in-stock")]
        in_stock: Vec<String>,
        /// Remove an item (repeatable)
        #[arg(long)]
        delete: Vec<String>,
        /// Add an item as NAME or NAME:CATEGORY (repeatable)
        #[arg(long)]
        add: Vec<String>,
        /// Print the changes without saving them
        #[arg(long)]
        dry_run: bool,
    },
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let mut config = BistroConfig::from_env().context("Invalid configuration")?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    tracing::debug!(data_dir = %config.data_dir.display(), "loaded configuration");

    let pantry_store = FilePantryStore::new(config.pantry_path());
    let recipe_store = FileRecipeStore::new(config.recipes_path());

    match cli.command {
        Commands::Seed { force } => {
            seed::seed(&pantry_store, &recipe_store, force).await?;
        }
        Commands::Menu {
            tags,
            max_time,
            available_only,
        } => {
            let filter = bistro_core::MenuFilter {
                tags,
                max_cooking_time: max_time,
                available_only,
            };
            menu::show_menu(&config, &pantry_store, &recipe_store, &filter).await?;
        }
        Commands::Lucky { mood, any, seed } => {
            let prefer_available = config.prefer_available && !any;
            lucky::feeling_lucky(
                &pantry_store,
                &recipe_store,
                mood.as_deref(),
                prefer_available,
                seed,
            )
            .await?;
        }
        Commands::Recipe { name } => {
            recipes::show_recipe(&pantry_store, &recipe_store, &name).await?;
        }
        Commands::Recipes { search } => {
            recipes::list_recipes(&recipe_store, search.as_deref()).await?;
        }
        Commands::AddRecipe { file, tags } => {
            recipes::add_recipe(&recipe_store, &file, tags.as_deref()).await?;
        }
        Commands::Pantry {
            search,
            category,
            toggle,
        } => match toggle {
            Some(name) => pantry::toggle(&pantry_store, &name).await?,
            None => {
                pantry::list_pantry(
                    &config,
                    &pantry_store,
                    search.as_deref(),
                    category.as_deref(),
                )
                .await?
            }
        },
        Commands::Edit {
            out_of_stock,
            in_stock,
            delete,
            add,
            dry_run,
        } => {
            let edits = pantry::BulkEdit {
                out_of_stock,
                in_stock,
                delete,
                add,
            };
            pantry::bulk_edit(pantry_store, &edits, dry_run).await?;
        }
    }

    Ok(())
}
