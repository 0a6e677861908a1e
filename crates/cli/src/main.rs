//! Artisan Woodcraft CLI - browse the catalog and run a simulated checkout.
//!
//! # Usage
//!
//! ```bash
//! # List every product
//! woodcraft products
//!
//! # Walnut or oak pieces from the rustic collection
//! woodcraft products --wood walnut --wood oak --collection rustic
//!
//! # Show one product
//! woodcraft product 2
//!
//! # List the values each filter can take
//! woodcraft filters
//!
//! # Buy two chairs and a bookshelf
//! woodcraft checkout --item 6:2 --item 2 --email emily@example.com \
//!     --first-name Emily --last-name Chen --address "12 Grain Street" \
//!     --city Portland --state OR --zip 97201
//! ```
//!
//! Every command accepts `--json` for machine-readable output.
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Log filter (default: `woodcraft=info`)
//! - `WOODCRAFT_*` - Storefront configuration, see `StorefrontConfig`

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use woodcraft_core::{Collection, Finish, ProductId, WoodType};

mod commands;

use commands::checkout::CheckoutArgs;

#[derive(Parser)]
#[command(name = "woodcraft")]
#[command(author, version, about = "Artisan Woodcraft storefront")]
struct Cli {
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products, optionally filtered
    Products {
        /// Wood type to include (repeatable)
        #[arg(long = "wood")]
        wood_types: Vec<WoodType>,

        /// Finish to include (repeatable)
        #[arg(long = "finish")]
        finishes: Vec<Finish>,

        /// Collection to include (repeatable)
        #[arg(long = "collection")]
        collections: Vec<Collection>,

        /// Only featured products
        #[arg(long)]
        featured: bool,
    },
    /// Show a single product
    Product {
        /// Product ID
        id: ProductId,
    },
    /// List the values available for each filter
    Filters,
    /// Run a simulated checkout and print the order
    Checkout(CheckoutArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "woodcraft=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    let mut session = commands::open_session()?;
    let output = commands::Output::new(cli.json);

    match cli.command {
        Commands::Products {
            wood_types,
            finishes,
            collections,
            featured,
        } => {
            commands::catalog::products(
                &mut session,
                &output,
                commands::catalog::ProductQuery {
                    wood_types,
                    finishes,
                    collections,
                    featured,
                },
            )?;
        }
        Commands::Product { id } => commands::catalog::product(&session, &output, id)?,
        Commands::Filters => commands::catalog::filters(&session, &output)?,
        Commands::Checkout(args) => commands::checkout::run(session, &output, args).await?,
    }
    Ok(())
}
