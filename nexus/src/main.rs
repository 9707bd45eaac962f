mod cli;
mod render;
mod session;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Command};
use nexus_core::{compose, ContentKind, GenerationRequest, Studio, StudioConfig};

/// Logs go to stderr so generated text on stdout stays clean.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "nexus=info,nexus_core=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing();

    let config = cli.model.apply(StudioConfig::from_env()?);

    match cli.command {
        Some(Command::Generate { kind, export, json }) => {
            let (kind, form) = kind.into_form();
            let request = GenerationRequest::from_form(kind, &form)?;

            let mut studio = Studio::new(config).context("could not start the generator")?;
            let generation = studio.generate_until(request, session::interrupted()).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&generation.entry)?);
            } else {
                println!("{}", generation.entry.content);
            }

            if export {
                let path = studio.export_entry(generation.entry.id).await?;
                tracing::info!("Exported to {}", path.display());
            }
        }
        Some(Command::Prompt { kind }) => {
            let (kind, form) = kind.into_form();
            println!("{}", compose(kind, &form)?);
        }
        Some(Command::Options { kind }) => match kind {
            Some(kind) => print!("{}", render::options(kind)),
            None => {
                for kind in ContentKind::ALL {
                    print!("{}", render::options(kind));
                }
            }
        },
        Some(Command::Session) | None => {
            let studio = Studio::new(config).context("could not start the generator")?;
            session::run(studio).await?;
        }
    }

    Ok(())
}
