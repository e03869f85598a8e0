//! LopCafe CLI - browse the menu, place orders and run the shop.
//!
//! # Usage
//!
//! ```bash
//! # Log in (the session is kept in .lopcafe-session.json)
//! lopcafe login -e a@b.com -p secret
//!
//! # Browse and order
//! lopcafe recipes list
//! lopcafe orders place 3 --quantity 2
//! lopcafe orders list --pending --limit 5
//!
//! # Admin
//! lopcafe recipes create --name Cortado --price 3.80 --brew-method 1 -i 4:30ml
//! lopcafe orders update 7 --status Shipped
//! lopcafe upload cortado.png
//!
//! # Where would the web app send me?
//! lopcafe open /admin-dashboard
//! ```
//!
//! # Environment Variables
//!
//! - `LOPCAFE_API_URL` - API base URL (default `http://localhost:5000`)
//! - `LOPCAFE_SESSION_FILE` - Session file path
//! - `LOPCAFE_LOG_FORMAT` - `json` for structured logs
//! - `RUST_LOG` - Log filter

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use lopcafe_client::ClientConfig;
use lopcafe_client::api::DEFAULT_ORDER_LIMIT;
use secrecy::SecretString;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;
mod output;

use commands::Context;
use commands::recipes::RecipeArgs;

#[derive(Parser)]
#[command(name = "lopcafe")]
#[command(author, version, about = "LopCafe coffee ordering from the command line")]
struct Cli {
    /// API base URL (overrides `LOPCAFE_API_URL`)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Session file (overrides `LOPCAFE_SESSION_FILE`)
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and remember the session
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
        /// Request the Admin role
        #[arg(long)]
        admin: bool,
    },
    /// Confirm the e-mailed one-time code
    Verify {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        otp: String,
    },
    /// Forget the session
    Logout,
    /// Show the current session
    Whoami,
    /// Print every session change until interrupted
    Watch {
        /// Seconds between checks of the session file
        #[arg(long, default_value_t = 1)]
        interval: u64,
    },
    /// Show what the app does for a view path (allow or redirect)
    Open { path: String },
    /// Menu and recipe administration
    Recipes {
        #[command(subcommand)]
        action: RecipeAction,
    },
    /// Brew methods (admin)
    BrewMethods {
        #[command(subcommand)]
        action: BrewMethodAction,
    },
    /// Ingredients (admin)
    Ingredients {
        #[command(subcommand)]
        action: IngredientAction,
    },
    /// Orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Upload a recipe image (PNG, JPEG or GIF)
    Upload { path: PathBuf },
}

#[derive(Subcommand)]
enum RecipeAction {
    /// List the menu
    List,
    /// Create a recipe
    Create(RecipeFields),
    /// Replace a recipe
    Update {
        id: String,
        #[command(flatten)]
        fields: RecipeFields,
    },
    /// Delete a recipe
    Delete { id: String },
}

#[derive(Args)]
struct RecipeFields {
    #[arg(long)]
    name: String,
    #[arg(long)]
    price: String,
    /// Brew method ID
    #[arg(long)]
    brew_method: Option<i32>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    takeaway: bool,
    /// Ingredient as `ID` or `ID:QUANTITY` (repeatable)
    #[arg(short, long = "ingredient")]
    ingredients: Vec<String>,
    #[arg(long)]
    image_url: Option<String>,
}

impl From<RecipeFields> for RecipeArgs {
    fn from(f: RecipeFields) -> Self {
        Self {
            name: f.name,
            price: f.price,
            brew_method: f.brew_method,
            description: f.description,
            takeaway: f.takeaway,
            ingredients: f.ingredients,
            image_url: f.image_url,
        }
    }
}

#[derive(Subcommand)]
enum BrewMethodAction {
    /// List brew methods
    List,
    /// Add a brew method
    Create {
        #[arg(long)]
        name: String,
        /// Preparation notes
        #[arg(long)]
        details: Option<String>,
    },
}

#[derive(Subcommand)]
enum IngredientAction {
    /// List ingredients
    List,
    /// Add an ingredient
    Create {
        #[arg(long)]
        name: String,
    },
}

#[derive(Subcommand)]
enum OrderAction {
    /// List orders
    List {
        /// Most recent N orders
        #[arg(long)]
        limit: Option<u32>,
        /// Only pending orders
        #[arg(long)]
        pending: bool,
    },
    /// Show one order
    Show { id: String },
    /// Order a recipe
    Place {
        recipe_id: String,
        #[arg(short, long, default_value = "1")]
        quantity: String,
    },
    /// Change quantity and/or status (status: admins only)
    Update {
        id: String,
        #[arg(long)]
        quantity: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Delete an order
    Delete { id: String },
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

/// Log to stderr; JSON when `LOPCAFE_LOG_FORMAT=json`.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "lopcafe=info,lopcafe_client=info".into());

    let json = std::env::var("LOPCAFE_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

fn load_config(cli: &Cli) -> Result<ClientConfig, Box<dyn std::error::Error>> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = &cli.api_url {
        config = ClientConfig::new(url, config.session_file)?;
    }
    if let Some(path) = &cli.session_file {
        config.session_file.clone_from(path);
    }
    Ok(config)
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&cli)?;
    let ctx = Context::open(&config)?;

    match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&ctx, &email, SecretString::from(password)).await?;
        }
        Commands::Register {
            username,
            email,
            password,
            admin,
        } => {
            commands::auth::register(&ctx, username, email, SecretString::from(password), admin)
                .await?;
        }
        Commands::Verify { email, otp } => commands::auth::verify(&ctx, &email, &otp).await?,
        Commands::Logout => commands::auth::logout(&ctx)?,
        Commands::Whoami => commands::session::whoami(&ctx),
        Commands::Watch { interval } => {
            commands::session::watch(&ctx, Duration::from_secs(interval.max(1))).await?;
        }
        Commands::Open { path } => commands::session::open(&ctx, &path)?,
        Commands::Recipes { action } => match action {
            RecipeAction::List => commands::catalog::list_recipes(&ctx).await?,
            RecipeAction::Create(fields) => commands::recipes::create(&ctx, fields.into()).await?,
            RecipeAction::Update { id, fields } => {
                commands::recipes::update(&ctx, &id, fields.into()).await?;
            }
            RecipeAction::Delete { id } => commands::recipes::delete(&ctx, &id).await?,
        },
        Commands::BrewMethods { action } => match action {
            BrewMethodAction::List => commands::catalog::list_brew_methods(&ctx).await?,
            BrewMethodAction::Create { name, details } => {
                commands::catalog::create_brew_method(&ctx, name, details).await?;
            }
        },
        Commands::Ingredients { action } => match action {
            IngredientAction::List => commands::catalog::list_ingredients(&ctx).await?,
            IngredientAction::Create { name } => {
                commands::catalog::create_ingredient(&ctx, &name).await?;
            }
        },
        Commands::Orders { action } => match action {
            OrderAction::List { limit, pending } => {
                let limit = limit.or_else(|| pending.then_some(DEFAULT_ORDER_LIMIT));
                commands::orders::list(&ctx, limit, pending).await?;
            }
            OrderAction::Show { id } => commands::orders::show(&ctx, &id).await?,
            OrderAction::Place {
                recipe_id,
                quantity,
            } => commands::orders::place(&ctx, &recipe_id, &quantity).await?,
            OrderAction::Update {
                id,
                quantity,
                status,
            } => {
                commands::orders::update(&ctx, &id, quantity.as_deref(), status.as_deref())
                    .await?;
            }
            OrderAction::Delete { id } => commands::orders::delete(&ctx, &id).await?,
        },
        Commands::Upload { path } => commands::upload::image(&ctx, &path).await?,
    }
    Ok(())
}
