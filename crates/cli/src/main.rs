//! Copper Kettle CLI - admin product management from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Create a product
//! ck-cli product create \
//!     --name "Stovetop Kettle" \
//!     --description "2L enameled steel kettle" \
//!     --category Kitchen \
//!     --price 39.99 \
//!     --stock 12 \
//!     --image ./kettle.jpg
//! ```
//!
//! # Commands
//!
//! - `product create` - Submit a new product to the backend
//!
//! Configuration comes from the environment (see `copper-kettle-client`
//! config docs); a `.env` file is honored.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "ck-cli")]
#[command(author, version, about = "Copper Kettle admin CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage products
    Product {
        #[command(subcommand)]
        action: ProductAction,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// Create a new product
    Create {
        /// Product name
        #[arg(long)]
        name: String,

        /// Product description
        #[arg(long)]
        description: String,

        /// Product category (e.g., Kitchen, Electronics)
        #[arg(long)]
        category: String,

        /// Price, a non-negative decimal
        #[arg(long)]
        price: String,

        /// Stock quantity, a non-negative whole number
        #[arg(long)]
        stock: String,

        /// Path to the product image (JPG, PNG, WEBP)
        #[arg(long)]
        image: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Product { action } => match action {
            ProductAction::Create {
                name,
                description,
                category,
                price,
                stock,
                image,
            } => {
                commands::product::create(commands::product::CreateArgs {
                    name,
                    description,
                    category,
                    price,
                    stock,
                    image,
                })
                .await?;
            }
        },
    }
    Ok(())
}
