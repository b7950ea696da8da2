use anyhow::Context;
use clap::{Parser, Subcommand};
use sheet_auth::{
    auth::{build_controller, model::AuthResponse, sheet::SqlSheet},
    client::gateway::{AuthGateway, Authenticator},
    config::Config,
    db::Database,
    server::Server,
};
use tokio::sync::oneshot;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sheet-auth")]
#[command(
    about = "Username/password sign-up and sign-in over a flat record sheet",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP endpoint
    Serve,
    /// Sign in against the configured endpoint
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// Create an account through the configured endpoint
    Register {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// GET the endpoint and print the liveness text
    Ping,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sheet_auth=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::load().context("Failed to load config")?;

    match cli.command {
        Commands::Serve => serve(config).await,
        Commands::Login { username, password } => {
            let gateway = AuthGateway::new(&config.endpoint_url)?;
            report(gateway.login(&username, &password).await)
        }
        Commands::Register { username, password } => {
            let gateway = AuthGateway::new(&config.endpoint_url)?;
            report(gateway.register(&username, &password).await)
        }
        Commands::Ping => {
            let gateway = AuthGateway::new(&config.endpoint_url)?;
            println!("{}", gateway.ping().await.context("Liveness check failed")?);
            Ok(())
        }
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let database = Database::connect(&config.database_url)
        .await
        .context("Failed to create DB pool")?;
    let sheet = SqlSheet::new(database.pool, &config.sheet_name);
    sheet
        .ensure_schema(database.dialect)
        .await
        .context("Failed to prepare record sheet")?;
    tracing::info!(sheet = %config.sheet_name, "Record sheet ready");

    let controller = build_controller(sheet, &config);
    let server = Server::bind(config.bind_addr, &config.endpoint_path, controller).await?;

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(());
        }
    });

    server.start(shutdown_rx).await
}

fn report(response: AuthResponse) -> anyhow::Result<()> {
    println!("{}", response.message);
    if response.success {
        Ok(())
    } else {
        std::process::exit(1)
    }
}
