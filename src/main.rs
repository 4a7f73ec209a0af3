use clap::Parser;
use faceid::cli::commands::{Cli, Commands};
use faceid::config::Config;
use faceid::http::server;
use faceid::FaceId;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("faceid=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error reading configuration: {e}");
            std::process::exit(1);
        }
    };

    let app = match FaceId::new(&config).await {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error initializing FaceId: {e}");
            std::process::exit(1);
        }
    };

    let result = run_command(app, &config, cli.command).await;
    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_command(app: FaceId, config: &Config, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Serve { listen } => {
            let addr = listen.unwrap_or_else(|| config.listen.clone());
            server::serve(&addr, Arc::new(app), config.max_body_bytes).await?;
        }
        Commands::Register { name, images } => {
            let mut data = Vec::with_capacity(images.len());
            for path in &images {
                data.push(tokio::fs::read(path).await?);
            }
            let registration = app.register(&name, &data).await?;
            println!("{}", serde_json::to_string_pretty(&registration)?);
        }
        Commands::Recognize { image } => {
            let data = tokio::fs::read(&image).await?;
            let recognition = app.recognize(&data).await?;
            println!("{}", serde_json::to_string_pretty(&recognition)?);
        }
        Commands::Delete { name } => {
            let outcome = app.delete_person(&name).await?;
            println!(
                "{}",
                serde_json::json!({ "name": name, "outcome": outcome, "deleted": outcome.deleted_flag() })
            );
        }
        Commands::Exists { name } => {
            let exists = app.exists(&name).await?;
            println!("{}", serde_json::json!({ "name": name, "exists": exists }));
        }
    }
    Ok(())
}
