use clap::{Parser, Subcommand};
use clipsync::{
    config::MailerSettings,
    db,
    repositories::{
        InviteRepository, SqliteInviteRepository, SqliteUserRepository,
        SqliteWorkspaceRepository, WorkspaceRepository,
    },
    services::{compose_message, create_mail_transport, user_service::UserService},
};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "clipsync-cli")]
#[command(about = "CLI tool for operating the ClipSync accounts service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// User management commands
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Workspace inspection commands
    Workspace {
        #[command(subcommand)]
        command: WorkspaceCommands,
    },

    /// Invitation inspection commands
    Invite {
        #[command(subcommand)]
        command: InviteCommands,
    },

    /// Mailer commands
    Mail {
        #[command(subcommand)]
        command: MailCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// List all users
    List {
        /// Maximum number of users to display
        #[arg(short, long, default_value_t = 100)]
        limit: i64,

        /// Offset for pagination
        #[arg(short = 'o', long, default_value_t = 0)]
        offset: i64,
    },

    /// Show a user's studio settings
    Studio {
        /// Internal user id
        #[arg(long)]
        user: String,
    },
}

#[derive(Subcommand)]
enum WorkspaceCommands {
    /// List the workspaces a user owns
    List {
        /// Internal user id of the owner
        #[arg(long)]
        owner: String,
    },
}

#[derive(Subcommand)]
enum InviteCommands {
    /// List invites into a workspace
    List {
        /// Workspace id
        #[arg(short, long)]
        workspace: String,
    },
}

#[derive(Subcommand)]
enum MailCommands {
    /// Send a test message and wait for the outcome
    Test {
        /// Recipient address
        #[arg(short, long)]
        to: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    match cli.command {
        Commands::Mail { command } => match command {
            MailCommands::Test { to } => {
                let settings = MailerSettings::from_env()?;
                let transport = create_mail_transport(&settings);
                let mail = compose_message(
                    &settings,
                    &to,
                    "ClipSync test message",
                    "This is a test message from ClipSync.",
                    None,
                )?;

                match transport.send(mail).await {
                    Ok(()) => println!("✅ Test message sent to {}", to),
                    Err(err) => {
                        eprintln!("❌ Failed to send test message: {}", err);
                        std::process::exit(1);
                    }
                }
            }
        },

        Commands::User { command } => {
            let pool = connect().await?;
            let user_service = UserService::new(Arc::new(SqliteUserRepository::new(pool)));

            match command {
                UserCommands::List { limit, offset } => {
                    match user_service.list_users(Some(limit), Some(offset)).await {
                        Ok(users) => {
                            if users.is_empty() {
                                println!("No users found.");
                            } else {
                                println!(
                                    "{:<38} {:<32} {:<24} {:<20}",
                                    "ID", "Email", "Name", "Created"
                                );
                                println!("{}", "-".repeat(114));
                                for user in users {
                                    let name = format!(
                                        "{} {}",
                                        user.first_name.as_deref().unwrap_or_default(),
                                        user.last_name.as_deref().unwrap_or_default()
                                    );
                                    println!(
                                        "{:<38} {:<32} {:<24} {:<20}",
                                        user.id,
                                        user.email,
                                        name.trim(),
                                        user.created_at.format("%Y-%m-%d %H:%M:%S")
                                    );
                                }
                            }
                        }
                        Err(err) => {
                            eprintln!("❌ Failed to list users: {}", err);
                            std::process::exit(1);
                        }
                    }
                }
                UserCommands::Studio { user } => match user_service.find_studio(&user).await {
                    Ok(Some(studio)) => {
                        println!("Studio {} for user {}", studio.id, studio.user_id);
                        println!("  preset: {}", studio.preset.as_str());
                        println!("  screen: {}", studio.screen.as_deref().unwrap_or("-"));
                        println!("  mic:    {}", studio.mic.as_deref().unwrap_or("-"));
                        println!("  camera: {}", studio.camera.as_deref().unwrap_or("-"));
                    }
                    Ok(None) => println!("No studio found for '{}'.", user),
                    Err(err) => {
                        eprintln!("❌ Failed to load studio: {}", err);
                        std::process::exit(1);
                    }
                },
            }
        }

        Commands::Workspace { command } => {
            let pool = connect().await?;
            let repository = SqliteWorkspaceRepository::new(pool);

            match command {
                WorkspaceCommands::List { owner } => match repository.list_for_user(&owner).await {
                    Ok(workspaces) if workspaces.is_empty() => {
                        println!("No workspaces found for '{}'.", owner);
                    }
                    Ok(workspaces) => {
                        println!("{:<38} {:<10} {:<30}", "ID", "Type", "Name");
                        println!("{}", "-".repeat(80));
                        for workspace in workspaces {
                            println!(
                                "{:<38} {:<10} {:<30}",
                                workspace.id,
                                workspace.workspace_type.as_str(),
                                workspace.name
                            );
                        }
                    }
                    Err(err) => {
                        eprintln!("❌ Failed to list workspaces: {}", err);
                        std::process::exit(1);
                    }
                },
            }
        }

        Commands::Invite { command } => {
            let pool = connect().await?;
            let repository = SqliteInviteRepository::new(pool);

            match command {
                InviteCommands::List { workspace } => {
                    match repository.list_for_workspace(&workspace).await {
                        Ok(invites) if invites.is_empty() => {
                            println!("No invites found for workspace '{}'.", workspace);
                        }
                        Ok(invites) => {
                            println!(
                                "{:<38} {:<38} {:<38} {:<9}",
                                "ID", "Sender", "Receiver", "Accepted"
                            );
                            println!("{}", "-".repeat(126));
                            for invite in invites {
                                println!(
                                    "{:<38} {:<38} {:<38} {:<9}",
                                    invite.id,
                                    invite.sender_id,
                                    invite.receiver_id,
                                    if invite.accepted { "Yes" } else { "No" }
                                );
                            }
                        }
                        Err(err) => {
                            eprintln!("❌ Failed to list invites: {}", err);
                            std::process::exit(1);
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

async fn connect() -> anyhow::Result<sqlx::SqlitePool> {
    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
    Ok(db::connect_and_migrate(&database_url).await?)
}
