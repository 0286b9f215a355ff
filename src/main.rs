use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cinematch::{
    api::{create_router, AppState},
    cli::{load_dataset, print_dataset_summary, run_recommend, Cli, Command},
    config::Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;

    match cli.command {
        Command::Recommend(args) => {
            args.apply(&mut config);
            println!("Loading movies and ratings...");
            let dataset = load_dataset(config.ingest()).await?;
            print_dataset_summary(&dataset);
            run_recommend(&config, &args, &dataset)?;
        }
        Command::Serve(args) => {
            args.apply(&mut config);
            let dataset = load_dataset(config.ingest()).await?;
            let app = create_router(AppState::new(dataset, config.engine_defaults()));

            let address = config.bind_address();
            let listener = tokio::net::TcpListener::bind(&address).await?;
            tracing::info!(address = %address, "Server running");
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
