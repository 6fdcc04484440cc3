use anyhow::Context;
use bunch_backend_runtime::{telemetry, BackendServices};
use bunch_config::{load as load_config, AppConfig};
use bunch_gateway::{create_router, default_registry, GatewayState};
use bunch_users::{Account, AccountQuery, NewAccount};
use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(name = "bunch-backend")]
#[command(about = "Bunch accounts backend (serves HTTP by default)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// Create a regular account
    CreateUser(AccountArgs),
    /// Create an account with staff and superuser rights
    CreateSuperuser(AccountArgs),
    /// Print every account in join order
    DumpAccounts,
    /// Create a group and optionally add accounts to it by email
    CreateGroup {
        name: String,
        #[arg(long = "member")]
        members: Vec<String>,
    },
}

#[derive(Args)]
struct AccountArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    email: String,
    /// Read from stdin when omitted
    #[arg(long)]
    password: Option<String>,
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    telemetry::init_tracing().context("failed to initialise tracing")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server().await,
        Commands::CreateUser(args) => create_account(args, false).await,
        Commands::CreateSuperuser(args) => create_account(args, true).await,
        Commands::DumpAccounts => dump_accounts().await,
        Commands::CreateGroup { name, members } => create_group(name, members).await,
    }
}

async fn bootstrap() -> anyhow::Result<(AppConfig, BackendServices)> {
    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    Ok((config, services))
}

async fn run_server() -> anyhow::Result<()> {
    info!("starting Bunch backend");

    let (config, services) = bootstrap().await?;

    let state = GatewayState::new(services.db_pool.clone(), config.media.clone());
    let app = create_router(state, &default_registry());

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(bunch_backend_runtime::shutdown_signal())
        .await
        .context("http server error")?;

    info!("backend shut down");
    Ok(())
}

async fn create_account(args: AccountArgs, superuser: bool) -> anyhow::Result<()> {
    let (_config, services) = bootstrap().await?;

    let password = match args.password {
        Some(password) => password,
        None => prompt_password().await?,
    };

    let mut request = NewAccount::new(args.username, args.email, password);
    request.first_name = args.first_name;
    request.last_name = args.last_name;

    let account = if superuser {
        services.accounts.create_superuser(request).await
    } else {
        services.accounts.create_account(request).await
    }
    .context("failed to create account")?;

    println!("Created {}", describe_account(&account));
    Ok(())
}

async fn prompt_password() -> anyhow::Result<String> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(b"Password: ").await?;
    stdout.flush().await?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("failed to read password")?;

    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        anyhow::bail!("password must not be empty");
    }
    Ok(password)
}

async fn dump_accounts() -> anyhow::Result<()> {
    info!("dumping accounts from database");

    let (_config, services) = bootstrap().await?;

    let accounts = services
        .accounts
        .list_accounts(&AccountQuery::default())
        .await
        .context("failed to fetch accounts")?;

    println!("=== ACCOUNTS ===");
    if accounts.is_empty() {
        println!("No accounts found in database");
        return Ok(());
    }

    println!("Found {} accounts:", accounts.len());
    println!("{}", account_header());
    println!("{}", "-".repeat(120));

    for account in &accounts {
        let groups = services
            .groups
            .list_for_account(account.id)
            .await
            .context("failed to fetch group memberships")?;
        let names: Vec<_> = groups.iter().map(|g| g.name.as_str()).collect();

        println!("{} {}", account_row(account), names.join(","));
    }

    Ok(())
}

async fn create_group(name: String, members: Vec<String>) -> anyhow::Result<()> {
    let (_config, services) = bootstrap().await?;

    let group = services
        .groups
        .create(&name)
        .await
        .with_context(|| format!("failed to create group {name}"))?;

    for email in members {
        let account = services
            .accounts
            .get_by_email(&email)
            .await
            .context("failed to look up account")?
            .with_context(|| format!("no account with email {email}"))?;

        services
            .groups
            .add_member(group.id, account.id)
            .await
            .context("failed to add group member")?;
        println!("Added {account} to {}", group.name);
    }

    println!("Group {} has id {}", group.name, group.id);
    Ok(())
}

fn describe_account(account: &Account) -> String {
    let color = account
        .color()
        .map(|color| format!("{} {}", color.name(), color.hex()))
        .unwrap_or_else(|| "no color".to_string());

    format!(
        "{} <{}> ({}, {})",
        account,
        account.identity.email,
        if account.identity.is_superuser { "superuser" } else { "user" },
        color
    )
}

fn account_header() -> String {
    format!(
        "{:<36} {:<20} {:<30} {:<7} {:<7} {:<6} {:<8} {:<25} {}",
        "ID", "Username", "Email", "Active", "Staff", "Super", "Color", "Joined", "Groups"
    )
}

fn account_row(account: &Account) -> String {
    let identity = &account.identity;
    format!(
        "{:<36} {:<20} {:<30} {:<7} {:<7} {:<6} {:<8} {:<25}",
        account.id,
        identity.username,
        identity.email,
        identity.is_active,
        identity.is_staff,
        identity.is_superuser,
        account.color().map(|c| c.hex()).unwrap_or("NULL"),
        identity.date_joined.format("%Y-%m-%d %H:%M:%S UTC"),
    )
}
