use clap::{Args, Parser, Subcommand};
use dialoguer::Password;
use dotenvy::dotenv;
use welding_admin_cli::client::{AdminClient, ClientError, Credential, DeleteBy};
use welding_admin_cli::seeder::{self, SeedConfig};

#[derive(Parser)]
#[command(name = "welding-admin-cli")]
#[command(about = "Welding Admin CLI - Account administration from the terminal", long_about = None)]
struct Cli {
    /// Base URL of the admin API
    #[arg(long, env = "WELDING_ADMIN_URL", default_value = "http://localhost:5000")]
    url: String,

    #[command(flatten)]
    auth: AuthArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct AuthArgs {
    /// Firebase ID token of a supervisor account
    #[arg(long, env = "ADMIN_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Operator address, for servers using the static allow-list policy
    #[arg(long, env = "ADMIN_EMAIL")]
    admin_email: Option<String>,
}

impl AuthArgs {
    fn credential(self) -> Option<Credential> {
        match (self.token, self.admin_email) {
            (Some(token), _) => Some(Credential::Bearer(token)),
            (None, Some(email)) => Some(Credential::AdminEmail(email)),
            (None, None) => None,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List accounts
    List,
    /// Create an account
    Create {
        #[arg(short = 'e', long)]
        email: String,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Change an account's email address
    UpdateEmail {
        #[arg(short = 'u', long)]
        uid: String,

        #[arg(short = 'e', long)]
        email: String,
    },
    /// Set a new password for an account
    UpdatePassword {
        #[arg(short = 'u', long)]
        uid: String,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Delete an account and its role record
    Delete {
        #[arg(short = 'u', long, conflicts_with = "email", required_unless_present = "email")]
        uid: Option<String>,

        #[arg(short = 'e', long)]
        email: Option<String>,
    },
    /// Create fake accounts for development
    Seed {
        /// Number of accounts to create
        #[arg(short = 'n', long, default_value = "10")]
        count: usize,

        /// Password given to every seeded account
        #[arg(short = 'p', long, default_value = "welding123")]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();
    let Some(credential) = cli.auth.credential() else {
        fail("Either --token or --admin-email is required");
    };

    let client = match AdminClient::new(&cli.url, credential) {
        Ok(client) => client,
        Err(e) => fail(&format!("Could not build HTTP client: {}", e)),
    };

    let result = match cli.command {
        Commands::List => handle_list(&client).await,
        Commands::Create { email, password } => {
            let password = password_or_prompt(password);
            client.create_user(&email, &password).await.map(|uid| {
                println!("✅ Created {} ({})", email, uid);
            })
        }
        Commands::UpdateEmail { uid, email } => {
            client.update_email(&uid, &email).await.map(|_| {
                println!("✅ Email for {} is now {}", uid, email);
            })
        }
        Commands::UpdatePassword { uid, password } => {
            let password = password_or_prompt(password);
            client.update_password(&uid, &password).await.map(|_| {
                println!("✅ Password updated for {}", uid);
            })
        }
        Commands::Delete { uid, email } => handle_delete(&client, uid, email).await,
        Commands::Seed { count, password } => handle_seed(&client, count, password).await,
    };

    if let Err(e) = result {
        fail(&e.to_string());
    }
}

fn fail(message: &str) -> ! {
    eprintln!("\n❌ {}", message);
    std::process::exit(1);
}

fn password_or_prompt(password: Option<String>) -> String {
    if let Some(password) = password {
        return password;
    }
    match Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords don't match")
        .interact()
    {
        Ok(password) => password,
        Err(e) => fail(&format!("Failed to read password: {}", e)),
    }
}

async fn handle_list(client: &AdminClient) -> Result<(), ClientError> {
    let users = client.list_users().await?;
    println!("{:<30} {:<40} {}", "UID", "EMAIL", "LAST LOGIN");
    for user in &users {
        println!(
            "{:<30} {:<40} {}",
            user.uid,
            user.email.as_deref().unwrap_or("-"),
            user.last_login_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "never".to_string())
        );
    }
    println!("\n{} accounts", users.len());
    Ok(())
}

async fn handle_delete(
    client: &AdminClient,
    uid: Option<String>,
    email: Option<String>,
) -> Result<(), ClientError> {
    let target = match (uid, email) {
        (Some(uid), _) => DeleteBy::Uid(uid),
        (None, Some(email)) => DeleteBy::Email(email),
        (None, None) => fail("Either --uid or --email is required"),
    };
    client.delete_user(&target).await?;
    println!("✅ Deleted {:?}", target);
    Ok(())
}

async fn handle_seed(
    client: &AdminClient,
    count: usize,
    password: String,
) -> Result<(), ClientError> {
    println!("🌱 Creating {} accounts...", count);
    let report = seeder::seed_accounts(client, &SeedConfig::new(count, password)).await;

    println!(
        "\n✅ Created {} accounts, {} failed",
        report.created.len(),
        report.failed.len()
    );
    if !report.failed.is_empty() && report.created.is_empty() {
        fail("No accounts were created");
    }
    Ok(())
}
