//! Bazaar CLI - cart, wishlist and access guard tools.
//!
//! # Usage
//!
//! ```bash
//! # Inspect and edit the locally saved cart
//! bazaar cart list
//! bazaar cart add p1 --name "Desk Lamp" --price 24.99
//! bazaar cart update p1 -- -1
//! bazaar cart clear
//!
//! # Wishlist (needs BAZAAR_API_URL and BAZAAR_ACCESS_TOKEN)
//! bazaar wishlist list
//! bazaar wishlist add p1
//!
//! # Ask the access guard what it would do with a request
//! bazaar guard check --path /dashboard/admin --access-token <jwt>
//! ```
//!
//! # Commands
//!
//! - `cart` - Local cart stored under `BAZAAR_DATA_DIR`
//! - `wishlist` - Backend wishlist for the configured session token
//! - `guard check` - Evaluate the default storefront route policy offline

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

mod commands;

#[derive(Parser)]
#[command(name = "bazaar")]
#[command(author, version, about = "Bazaar CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the locally saved cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the backend wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Access guard tools
    Guard {
        #[command(subcommand)]
        action: GuardAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart lines and totals
    List,
    /// Add one unit of a product
    Add {
        /// Product ID
        id: String,

        /// Product display name
        #[arg(short, long)]
        name: String,

        /// Unit price (e.g., 24.99)
        #[arg(short, long)]
        price: Decimal,

        /// Product image URL
        #[arg(short, long)]
        image: Option<String>,
    },
    /// Remove a product line
    Remove {
        /// Product ID
        id: String,
    },
    /// Change a line's quantity by a signed amount (never below 1)
    Update {
        /// Product ID
        id: String,

        /// Amount to add; negative values decrease
        #[arg(allow_hyphen_values = true)]
        delta: i64,
    },
    /// Remove every line
    Clear,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Show wishlist entries from the backend
    List,
    /// Add a product to the wishlist
    Add {
        /// Product ID
        id: String,
    },
    /// Remove a product from the wishlist
    Remove {
        /// Product ID
        id: String,
    },
    /// Check whether a product is on the wishlist
    Check {
        /// Product ID
        id: String,
    },
}

#[derive(Subcommand)]
enum GuardAction {
    /// Print the guard decision for a request
    Check {
        /// Request path (e.g., /dashboard/admin)
        #[arg(short, long)]
        path: String,

        /// Value of the `accessToken` cookie
        #[arg(short, long)]
        access_token: Option<String>,

        /// Value of the `refreshToken` cookie
        #[arg(short, long)]
        refresh_token: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Cart { action } => {
            let mut cart = commands::cart::open().await;
            match action {
                CartAction::List => {}
                CartAction::Add {
                    id,
                    name,
                    price,
                    image,
                } => commands::cart::add(&mut cart, id, name, price, image).await?,
                CartAction::Remove { id } => commands::cart::remove(&mut cart, id).await,
                CartAction::Update { id, delta } => {
                    commands::cart::update(&mut cart, id, delta).await;
                }
                CartAction::Clear => cart.clear().await,
            }
            commands::cart::print(&cart);
        }
        Commands::Wishlist { action } => {
            let context = commands::wishlist::WishlistContext::from_env()?;
            match action {
                WishlistAction::List => commands::wishlist::list(context).await?,
                WishlistAction::Add { id } => commands::wishlist::add(context, id).await?,
                WishlistAction::Remove { id } => commands::wishlist::remove(context, id).await?,
                WishlistAction::Check { id } => commands::wishlist::check(context, id).await?,
            }
        }
        Commands::Guard { action } => match action {
            GuardAction::Check {
                path,
                access_token,
                refresh_token,
            } => commands::guard::check(&path, access_token.as_deref(), refresh_token.as_deref()),
        },
    }
    Ok(())
}
