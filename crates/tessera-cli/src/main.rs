//! Tessera CLI - User lifecycle management
//!
//! Thin client over the Tessera HTTP API.

mod api;
mod config;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::Confirm;
use uuid::Uuid;

use api::{TesseraClient, UserResponse};
use config::Config;

#[derive(Parser)]
#[command(name = "tessera")]
#[command(about = "Tessera CLI - User lifecycle management", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// User operations
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Register a new User
    Create {
        /// Display name
        #[arg(short, long)]
        name: String,
        /// Email address (must be unique)
        #[arg(short, long)]
        email: String,
    },

    /// Show a single User
    Get {
        /// User ID
        id: Uuid,
    },

    /// List Users in creation order
    List {
        /// Number of Users to skip
        #[arg(short, long, default_value_t = 0)]
        offset: u64,
        /// Page size (1-100)
        #[arg(short, long, default_value_t = 20)]
        limit: u32,
    },

    /// Change a User's name and/or email
    Update {
        /// User ID
        id: Uuid,
        /// New display name
        #[arg(short, long)]
        name: Option<String>,
        /// New email address
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Deactivate a User
    Deactivate {
        /// User ID
        id: Uuid,
    },

    /// Re-activate a User
    Activate {
        /// User ID
        id: Uuid,
    },

    /// Delete a User permanently
    Delete {
        /// User ID
        id: Uuid,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set the API base URL
    SetUrl {
        /// e.g. http://localhost:8000
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::User { action } => cmd_user(action).await,
        Commands::Config { action } => cmd_config(action).await,
    }
}

// ============================================
// Command Implementations
// ============================================

async fn cmd_user(action: UserAction) -> Result<()> {
    let config = Config::load()?;
    let client = TesseraClient::new(&config.base_url);

    match action {
        UserAction::Create { name, email } => {
            let user = client.create_user(&name, &email).await?;
            println!("{} User created", "✓".green());
            print_user(&user);
        }

        UserAction::Get { id } => {
            let user = client.get_user(id).await?;
            print_user(&user);
        }

        UserAction::List { offset, limit } => {
            let page = client.list_users(offset, limit).await?;

            if page.items.is_empty() {
                println!("No Users found (total: {}).", page.total);
                return Ok(());
            }

            println!(
                "{} ({}-{} of {}, page size {})",
                "Users:".bold(),
                page.offset + 1,
                page.offset + page.items.len() as u64,
                page.total,
                page.limit
            );
            for user in &page.items {
                let status = if user.is_active {
                    "active".green()
                } else {
                    "inactive".red()
                };
                println!(
                    "  {} {} <{}> [{}]",
                    user.id.to_string().dimmed(),
                    user.name.cyan(),
                    user.email,
                    status
                );
            }
        }

        UserAction::Update { id, name, email } => {
            if name.is_none() && email.is_none() {
                bail!("Nothing to update. Pass --name and/or --email.");
            }
            let user = client
                .update_user(id, name.as_deref(), email.as_deref())
                .await?;
            println!("{} User updated", "✓".green());
            print_user(&user);
        }

        UserAction::Deactivate { id } => {
            let user = client.set_active(id, false).await?;
            println!("{} User '{}' deactivated", "✓".green(), user.name);
        }

        UserAction::Activate { id } => {
            let user = client.set_active(id, true).await?;
            println!("{} User '{}' activated", "✓".green(), user.name);
        }

        UserAction::Delete { id, yes } => {
            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Delete User {}? This cannot be undone", id))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    println!("Aborted.");
                    return Ok(());
                }
            }

            client.delete_user(id).await?;
            println!("{} User {} deleted", "✓".green(), id);
        }
    }

    Ok(())
}

fn print_user(user: &UserResponse) {
    println!("  ID: {}", user.id.to_string().dimmed());
    println!("  Name: {}", user.name.cyan());
    println!("  Email: {}", user.email);
    println!(
        "  Status: {}",
        if user.is_active { "active".green() } else { "inactive".red() }
    );
    println!("  Created: {}", user.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("  Updated: {}", user.updated_at.format("%Y-%m-%d %H:%M:%S UTC"));
}

async fn cmd_config(action: ConfigAction) -> Result<()> {
    let mut config = Config::load()?;

    match action {
        ConfigAction::Show => {
            println!("{}", "Configuration:".bold());
            println!("  Path: {:?}", Config::config_path()?);
            println!("  Base URL: {}", config.base_url);

            let client = TesseraClient::new(&config.base_url);
            let reachable = client.health().await.unwrap_or(false);
            println!(
                "  Server: {}",
                if reachable { "Reachable".green() } else { "Unreachable".red() }
            );
        }

        ConfigAction::SetUrl { url } => {
            config.set_base_url(&url)?;
            config.save()?;
            println!("{} Base URL set to {}", "✓".green(), config.base_url);
        }
    }

    Ok(())
}
