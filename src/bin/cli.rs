use clap::{Parser, Subcommand};
use classificados::{
    config::ServerConfig,
    db,
    repositories::{
        ListingRepository, SqliteAdminRepository, SqliteListingRepository, SqliteUserRepository,
    },
    services::{
        seed_service::DEFAULT_ADMIN_PASSWORD, AdminService, CreateUserRequest, SeedService,
        UpdatePasswordRequest, UserService,
    },
};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "classificados-cli")]
#[command(about = "Operator tool for the classificados marketplace", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Advertiser accounts
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Moderation accounts
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Create the default admin and demo data (safe to run twice)
    Seed {
        /// Password for the `admin` account when it has to be created
        #[arg(long, default_value = DEFAULT_ADMIN_PASSWORD)]
        admin_password: String,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create a new advertiser
    Create {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// List advertisers with their listing counts
    List,

    /// Delete an advertiser and all of their listings
    Delete {
        #[arg(short, long)]
        email: String,
    },

    /// Set a new password for an advertiser
    SetPassword {
        #[arg(short, long)]
        email: String,

        /// New password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Create a moderation account
    Create {
        #[arg(short, long)]
        username: String,

        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Set a new password for a moderation account
    SetPassword {
        #[arg(short, long)]
        username: String,

        /// New password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },
}

fn get_password(prompt: &str) -> anyhow::Result<String> {
    use std::io::{self, Write};
    print!("{}: ", prompt);
    io::stdout().flush()?;

    Ok(rpassword::read_password()?)
}

/// Uses the flag value when given, otherwise prompts twice.
fn password_or_prompt(password: Option<String>, prompt: &str) -> anyhow::Result<String> {
    if let Some(pw) = password {
        return Ok(pw);
    }

    let password = get_password(prompt)?;
    let confirm = get_password("Confirm password")?;
    if password != confirm {
        fail("Passwords do not match");
    }
    Ok(password)
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("❌ {}", message);
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = ServerConfig::from_env()?;
    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;

    let user_service = Arc::new(UserService::new(Arc::new(SqliteUserRepository::new(
        pool.clone(),
    ))));
    let admin_service = Arc::new(AdminService::new(Arc::new(SqliteAdminRepository::new(
        pool.clone(),
    ))));

    match cli.command {
        Commands::User { command } => match command {
            UserCommands::Create {
                name,
                email,
                password,
            } => {
                let password = password_or_prompt(password, "Password")?;
                let request = CreateUserRequest {
                    name,
                    email,
                    password,
                };

                match user_service.create_user(request).await {
                    Ok(user) => {
                        println!("✅ User created successfully!");
                        println!("  ID: {}", user.id);
                        println!("  Name: {}", user.name);
                        println!("  Email: {}", user.email);
                    }
                    Err(err) => fail(format!("Failed to create user: {}", err)),
                }
            }

            UserCommands::List => match user_service.list_users().await {
                Ok(users) if users.is_empty() => println!("No users found."),
                Ok(users) => {
                    println!(
                        "{:<5} {:<25} {:<35} {:<9} {:<25}",
                        "ID", "Name", "Email", "Listings", "Created"
                    );
                    println!("{}", "-".repeat(100));
                    for user in users {
                        println!(
                            "{:<5} {:<25} {:<35} {:<9} {:<25}",
                            user.id, user.name, user.email, user.count.listings, user.created_at
                        );
                    }
                }
                Err(err) => fail(format!("Failed to list users: {}", err)),
            },

            UserCommands::Delete { email } => match user_service.find_user_by_email(&email).await {
                Ok(Some(user)) => match user_service.delete_user(user.id).await {
                    Ok(removed) => {
                        println!(
                            "✅ User '{}' deleted with {} listing(s)",
                            user.email, removed
                        );
                    }
                    Err(err) => fail(format!("Failed to delete user: {}", err)),
                },
                Ok(None) => fail(format!("User '{}' not found", email)),
                Err(err) => fail(format!("Failed to find user: {}", err)),
            },

            UserCommands::SetPassword { email, password } => {
                let user = match user_service.find_user_by_email(&email).await {
                    Ok(Some(user)) => user,
                    Ok(None) => fail(format!("User '{}' not found", email)),
                    Err(err) => fail(format!("Failed to find user: {}", err)),
                };
                let new_password = password_or_prompt(password, "New password")?;

                let request = UpdatePasswordRequest {
                    user_id: user.id,
                    new_password,
                };
                match user_service.update_password(request).await {
                    Ok(()) => println!("✅ Password updated successfully for '{}'!", user.email),
                    Err(err) => fail(format!("Failed to update password: {}", err)),
                }
            }
        },

        Commands::Admin { command } => match command {
            AdminCommands::Create { username, password } => {
                let password = password_or_prompt(password, "Password")?;
                match admin_service.create_admin(&username, &password).await {
                    Ok(admin) => {
                        println!("✅ Admin created successfully!");
                        println!("  ID: {}", admin.id);
                        println!("  Username: {}", admin.username);
                    }
                    Err(err) => fail(format!("Failed to create admin: {}", err)),
                }
            }

            AdminCommands::SetPassword { username, password } => {
                let password = password_or_prompt(password, "New password")?;
                match admin_service.set_password(&username, &password).await {
                    Ok(()) => println!("✅ Password updated successfully for '{}'!", username),
                    Err(err) => fail(format!("Failed to update password: {}", err)),
                }
            }
        },

        Commands::Seed { admin_password } => {
            let listing_repository: Arc<dyn ListingRepository> =
                Arc::new(SqliteListingRepository::new(pool.clone()));
            let seeder = SeedService::new(user_service, admin_service, listing_repository);

            match seeder.run(&admin_password).await {
                Ok(report) => {
                    println!("✅ Seed complete");
                    println!(
                        "  Admin: {}",
                        if report.admin_created {
                            "created"
                        } else {
                            "already present"
                        }
                    );
                    println!("  Users created: {}", report.users_created);
                    println!("  Listings created: {}", report.listings_created);
                }
                Err(err) => fail(format!("Seed failed: {:#}", err)),
            }
        }
    }

    Ok(())
}
