use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use datadeck::auth::credentials::CredentialStore;
use datadeck::auth::token::TokenIssuer;
use datadeck::files::decode::DecoderRegistry;
use datadeck::files::FileController;
use datadeck::store::postgres::PgStore;
use datadeck::store::{FileStore, UserStore};
use datadeck::{api, cli, config, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "datadeck=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = config::load()?;
    let args = cli::Cli::parse();

    let result = match args.command {
        Some(cli::Commands::Serve { port }) => run_server(cfg, port).await,
        Some(cli::Commands::User { command }) => handle_user_command(cfg, command).await,
        None => {
            let port = cfg.port;
            run_server(cfg, port).await
        }
    };

    if let Err(ref e) = result {
        eprintln!("Error: {:?}", e);
    }
    result
}

async fn run_server(cfg: config::Config, port: u16) -> anyhow::Result<()> {
    tracing::info!("Connecting to database...");
    let db = PgStore::connect(&cfg.database_url).await?;

    tracing::info!("Running migrations...");
    db.migrate().await?;

    let state = Arc::new(build_state(db, cfg));
    let app = api::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("datadeck listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_state(db: PgStore, cfg: config::Config) -> AppState {
    let db = Arc::new(db);
    let users: Arc<dyn UserStore> = db.clone();
    let files: Arc<dyn FileStore> = db;

    AppState {
        accounts: CredentialStore::new(users, cfg.bcrypt_cost),
        files: FileController::new(files, Arc::new(DecoderRegistry::builtin())),
        tokens: TokenIssuer::new(&cfg.signing_key),
        config: cfg,
    }
}

async fn handle_user_command(cfg: config::Config, cmd: cli::UserCommands) -> anyhow::Result<()> {
    match cmd {
        cli::UserCommands::Add { username, password } => {
            let db = PgStore::connect(&cfg.database_url).await?;
            db.migrate().await?;

            let users: Arc<dyn UserStore> = Arc::new(db);
            let accounts = CredentialStore::new(users, cfg.bcrypt_cost);
            match accounts.register(&username, &password).await {
                Ok(()) => println!("User created: {}", username),
                Err(e) => anyhow::bail!("could not create user: {}", e),
            }
        }
    }
    Ok(())
}
