//! StorePilot CLI - browse the catalog and manage a cart from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse
//! storepilot products --page 2
//! storepilot product 7
//! storepilot search shirt
//! storepilot flash-sale
//!
//! # Log in, then shop
//! storepilot login -e john@mail.com -p changeme1
//! storepilot cart add 7 -q 2
//! storepilot cart dec 7
//! storepilot wishlist toggle 7
//! storepilot cart show
//! ```
//!
//! Configuration comes from `STOREPILOT_*` environment variables (or a
//! `.env` file); see `storepilot_storefront::config`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write as _;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use secrecy::ExposeSecret;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storepilot_core::{CategoryId, ProductId};
use storepilot_storefront::config::{LogFormat, StorefrontConfig};
use storepilot_storefront::{AppState, StorefrontError};

mod commands;
mod render;

use render::Notification;

#[derive(Debug, Parser)]
#[command(name = "storepilot")]
#[command(author, version, about = "StorePilot storefront in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List a page of products
    Products {
        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Products per page (default: `STOREPILOT_PAGE_SIZE`)
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Show a product and related products
    Product {
        /// Product ID
        id: ProductId,
    },
    /// List categories
    Categories,
    /// List the products in a category
    Category {
        /// Category ID
        id: CategoryId,
    },
    /// Search product titles
    Search {
        /// Text to look for, case-insensitive
        query: String,
    },
    /// Show today's flash sale
    FlashSale,
    /// View or change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// View or change the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Log in and keep the session
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Forget the session
    Logout,
    /// Create an account
    Signup {
        /// Display name (at least 3 characters)
        #[arg(short, long)]
        name: String,

        /// Account email
        #[arg(short, long)]
        email: String,

        /// Password (letters and digits, at least 6)
        #[arg(short, long)]
        password: String,

        /// Avatar image URL
        #[arg(long)]
        avatar: Option<String>,
    },
    /// View or edit the logged-in profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

#[derive(Debug, Subcommand)]
enum CartAction {
    /// Show the cart with totals
    Show,
    /// Add a product
    Add {
        /// Product ID
        id: ProductId,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a product
    Remove {
        /// Product ID
        id: ProductId,
    },
    /// Set a product's quantity (0 removes it)
    Set {
        /// Product ID
        id: ProductId,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Add one unit
    Inc {
        /// Product ID
        id: ProductId,
    },
    /// Remove one unit
    Dec {
        /// Product ID
        id: ProductId,
    },
    /// Empty the cart
    Clear,
}

#[derive(Debug, Subcommand)]
enum WishlistAction {
    /// Show the wishlist
    Show,
    /// Add a product
    Add {
        /// Product ID
        id: ProductId,
    },
    /// Remove a product
    Remove {
        /// Product ID
        id: ProductId,
    },
    /// Add a product, or remove it if already there
    Toggle {
        /// Product ID
        id: ProductId,
    },
    /// Empty the wishlist
    Clear,
}

#[derive(Debug, Subcommand)]
enum ProfileAction {
    /// Show the profile
    Show,
    /// Change name and email
    Update {
        /// New display name
        #[arg(short, long)]
        name: String,

        /// New email
        #[arg(short, long)]
        email: String,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.expose_secret(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Initialize tracing with EnvFilter and Sentry integration.
fn init_tracing(format: LogFormat) {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "storepilot_storefront=info,storepilot_cli=info".into());

    // Logs go to stderr so command output stays clean on stdout
    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter));

    match format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration from environment (needed for Sentry init)
    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(LogFormat::default());
            tracing::error!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);
    init_tracing(config.log_format);

    let result = match AppState::new(config) {
        Ok(state) => run(&state, cli.command).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(output) => emit(&output),
        Err(StorefrontError::Shop(e)) => {
            emit(&format!("{}\n", Notification::rejected(e)));
            ExitCode::FAILURE
        }
        Err(e) => {
            if e.is_reportable() {
                let event_id = sentry::capture_error(&e);
                tracing::error!(error = %e, sentry_event_id = %event_id, "Command failed");
            } else {
                tracing::error!("Command failed: {e}");
            }
            ExitCode::FAILURE
        }
    }
}

/// Write command output to stdout.
fn emit(output: &str) -> ExitCode {
    let mut stdout = std::io::stdout().lock();
    match stdout.write_all(output.as_bytes()).and_then(|()| stdout.flush()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Failed to write output: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(state: &AppState, command: Commands) -> storepilot_storefront::Result<String> {
    use commands::{account, cart, catalog, wishlist};

    match command {
        Commands::Products { page, limit } => catalog::products(state, page, limit).await,
        Commands::Product { id } => catalog::product(state, id).await,
        Commands::Categories => catalog::categories(state).await,
        Commands::Category { id } => catalog::category(state, id).await,
        Commands::Search { query } => catalog::search(state, &query).await,
        Commands::FlashSale => catalog::flash_sale(state).await,
        Commands::Cart { action } => match action {
            CartAction::Show => Ok(cart::show(state)),
            CartAction::Add { id, quantity } => cart::add(state, id, quantity).await,
            CartAction::Remove { id } => cart::remove(state, id),
            CartAction::Set { id, quantity } => cart::set(state, id, quantity),
            CartAction::Inc { id } => cart::increase(state, id),
            CartAction::Dec { id } => cart::decrease(state, id),
            CartAction::Clear => cart::clear(state),
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::Show => Ok(wishlist::show(state)),
            WishlistAction::Add { id } => wishlist::add(state, id).await,
            WishlistAction::Remove { id } => wishlist::remove(state, id),
            WishlistAction::Toggle { id } => wishlist::toggle(state, id).await,
            WishlistAction::Clear => wishlist::clear(state),
        },
        Commands::Login { email, password } => account::login(state, &email, &password).await,
        Commands::Logout => account::logout(state),
        Commands::Signup {
            name,
            email,
            password,
            avatar,
        } => account::signup(state, &name, &email, &password, avatar.as_deref()).await,
        Commands::Profile { action } => match action {
            ProfileAction::Show => account::show_profile(state).await,
            ProfileAction::Update { name, email } => {
                account::update_profile(state, &name, &email).await
            }
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_cart_add_with_quantity() {
        let cli = Cli::try_parse_from(["storepilot", "cart", "add", "7", "-q", "3"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Cart {
                action: CartAction::Add { id, quantity: 3 }
            } if id == ProductId::new(7)
        ));
    }

    #[test]
    fn test_parse_cart_set_accepts_negative() {
        let cli = Cli::try_parse_from(["storepilot", "cart", "set", "7", "-1"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Cart {
                action: CartAction::Set { quantity: -1, .. }
            }
        ));
    }

    #[test]
    fn test_parse_rejects_non_numeric_id() {
        assert!(Cli::try_parse_from(["storepilot", "product", "lamp"]).is_err());
    }

    #[test]
    fn test_parse_signup() {
        let cli = Cli::try_parse_from([
            "storepilot",
            "signup",
            "-n",
            "John",
            "-e",
            "john@mail.com",
            "-p",
            "abc123",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Signup { avatar: None, .. }
        ));
    }

    #[test]
    fn test_products_defaults_to_first_page() {
        let cli = Cli::try_parse_from(["storepilot", "products"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Products {
                page: 1,
                limit: None
            }
        ));
    }
}
