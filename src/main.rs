//! Glo Stock CLI
//!
//! Runs the API server and covers the operator tasks the API leaves out:
//! - Provision and verify users, change roles
//! - Issue access tokens
//! - Load the demo catalog
//! - Generate a default config file

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use glostock::api::{serve, ApiConfig, AppState};
use glostock::auth::JwtHandler;
use glostock::config::{generate_default_config, Config, LoggingConfig};
use glostock::seed::{seed_demo_catalog, SeedOutcome};
use glostock::storage::{InventoryStore, NewUser, Role, UserUpdate};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "glostock")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inventory management REST backend")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the API server
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Configuration helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Manage users
    User {
        #[command(subcommand)]
        command: UserCommand,
    },

    /// Manage access tokens
    Token {
        #[command(subcommand)]
        command: TokenCommand,
    },

    /// Load the demo catalog into an empty database
    Seed,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Generate default config file
    Init {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum UserCommand {
    /// Create a user
    Add {
        #[arg(long)]
        email: String,
        /// Full name
        #[arg(long, default_value = "")]
        name: String,
        /// admin, staff or user
        #[arg(long, default_value = "user")]
        role: Role,
        /// Mark the account verified right away
        #[arg(long)]
        verified: bool,
    },

    /// List users
    List,

    /// Mark a user verified
    Verify { email: String },

    /// Change a user's role
    Role { email: String, role: Role },
}

#[derive(Subcommand)]
pub enum TokenCommand {
    /// Issue a token for a user
    Issue {
        email: String,
        /// Token lifetime in hours (default: from config)
        #[arg(long)]
        ttl_hours: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    config.validate()?;

    init_tracing(&config.logging);

    match cli.command {
        Commands::Serve { host, port } => run_server(config, host, port).await?,

        Commands::Config {
            command: ConfigCommand::Init { output },
        } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("Failed to write {:?}", path))?;
                    println!("Wrote default config to {:?}", path);
                }
                None => print!("{}", content),
            }
        }

        Commands::User { command } => {
            let store = open_store(&config)?;
            run_user_command(&store, command)?;
        }

        Commands::Token {
            command: TokenCommand::Issue { email, ttl_hours },
        } => {
            let store = open_store(&config)?;
            let ttl = ttl_hours.unwrap_or(config.auth.token_ttl_hours);
            if ttl <= 0 {
                bail!("--ttl-hours must be positive");
            }

            let user = store
                .get_user_by_email(&email)?
                .with_context(|| format!("No user with email {}", email))?;
            if !user.is_verified {
                eprintln!(
                    "warning: {} is not verified; the API will refuse this token until it is",
                    user.email
                );
            }

            let jwt = JwtHandler::new(config.jwt_secret()?, ttl);
            let (token, expires_in) = jwt.generate_token(&user)?;
            eprintln!("Token for {} ({}), expires in {}s", user.email, user.role, expires_in);
            println!("{}", token);
        }

        Commands::Seed => {
            let store = open_store(&config)?;
            match seed_demo_catalog(&store)? {
                SeedOutcome::Seeded { categories, items } => {
                    println!("Seeded {} categories and {} items", categories, items)
                }
                SeedOutcome::Skipped => println!("Database already has data; nothing seeded"),
            }
        }
    }

    Ok(())
}

async fn run_server(config: Config, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    tracing::info!("Starting Glo Stock API server v{}", env!("CARGO_PKG_VERSION"));

    let secret = config.jwt_secret()?;
    let jwt = Arc::new(JwtHandler::new(secret, config.auth.token_ttl_hours));
    tracing::info!("Access tokens valid for {}h", jwt.ttl_hours());

    let store = Arc::new(open_store(&config)?);
    tracing::info!("Database: {}", config.database.path);

    let mut api_config = ApiConfig::from_config(&config);
    if let Some(host) = host {
        api_config.host = host;
    }
    if let Some(port) = port {
        api_config.port = port;
    }

    let state = AppState::new(store, jwt, api_config.clone());
    serve(state, &api_config).await?;

    tracing::info!("Glo Stock API server stopped");
    Ok(())
}

fn run_user_command(store: &InventoryStore, command: UserCommand) -> anyhow::Result<()> {
    match command {
        UserCommand::Add {
            email,
            name,
            role,
            verified,
        } => {
            let mut new = NewUser::new(email, role).full_name(name);
            if verified {
                new = new.verified();
            }
            let user = store.create_user(new)?;
            println!("Created {} user {} ({})", user.role, user.email, user.id);
        }

        UserCommand::List => {
            let users = store.list_users()?;
            if users.is_empty() {
                println!("No users");
                return Ok(());
            }
            println!(
                "{:<36}  {:<32}  {:<6}  {:<8}  NAME",
                "ID", "EMAIL", "ROLE", "VERIFIED"
            );
            for user in users {
                println!(
                    "{:<36}  {:<32}  {:<6}  {:<8}  {}",
                    user.id,
                    user.email,
                    user.role,
                    if user.is_verified { "yes" } else { "no" },
                    user.full_name
                );
            }
        }

        UserCommand::Verify { email } => {
            let user = store.set_verified(&email)?;
            println!("Verified {}", user.email);
        }

        UserCommand::Role { email, role } => {
            let user = store
                .get_user_by_email(&email)?
                .with_context(|| format!("No user with email {}", email))?;
            let user = store.update_user(
                user.id,
                UserUpdate {
                    role: Some(role),
                    ..Default::default()
                },
            )?;
            println!("{} is now {}", user.email, user.role);
        }
    }

    Ok(())
}

fn open_store(config: &Config) -> anyhow::Result<InventoryStore> {
    InventoryStore::open(&config.database.path)
        .with_context(|| format!("Failed to open database at {}", config.database.path))
}

/// `RUST_LOG` wins over the configured level
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("glostock={},tower_http=debug", logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
