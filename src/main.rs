use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use pix_brcode::application::service::PixService;
use pix_brcode::domain::charge::{Amount, ChargeRequest, Mode};
use pix_brcode::domain::ports::{ProviderBox, RendererArc};
use pix_brcode::infrastructure::efi::{EfiConfig, EfiProvider};
use pix_brcode::infrastructure::qr::PngRenderer;
use pix_brcode::infrastructure::static_provider::StaticPixProvider;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a Pix charge and print the BR Code
    Charge {
        /// Receiving Pix key: email, +55 phone, CPF, CNPJ or random key
        #[arg(long)]
        key: String,

        /// Amount in BRL, e.g. 15.50
        #[arg(long)]
        amount: Decimal,

        /// Recipient name (truncated to 25 characters after normalization)
        #[arg(long)]
        name: String,

        /// Recipient city (truncated to 15 characters after normalization)
        #[arg(long)]
        city: String,

        /// Optional payment description (truncated to 25 characters)
        #[arg(long)]
        description: Option<String>,

        /// Print the full charge result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the service health report as JSON
    Health,
}

/// Wires the provider chain: Efí first when credentials are present in the
/// environment, the static codec always last as the fallback.
fn build_service() -> Result<PixService> {
    let renderer: RendererArc = Arc::new(PngRenderer::new());
    let mut providers: Vec<ProviderBox> = Vec::new();

    let mode = match EfiConfig::from_env() {
        Some(config) => {
            let mode = if config.sandbox {
                Mode::Sandbox
            } else {
                Mode::Production
            };
            providers.push(Box::new(
                EfiProvider::new(config, renderer.clone()).into_diagnostic()?,
            ));
            mode
        }
        None => {
            info!("no Efí credentials in environment, using static codec only");
            Mode::Static
        }
    };

    providers.push(Box::new(StaticPixProvider::new(renderer)));
    Ok(PixService::new(providers, mode))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let service = build_service()?;

    match cli.command {
        Command::Charge {
            key,
            amount,
            name,
            city,
            description,
            json,
        } => {
            let request = ChargeRequest {
                payment_key: key,
                amount: Amount::new(amount).into_diagnostic()?,
                recipient_name: name,
                recipient_city: city,
                description,
            };

            let result = service.create_charge(&request).await.into_diagnostic()?;

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&result).into_diagnostic()?
                );
            } else {
                println!("Pix charge created via {}", result.provider);
                println!("  Transaction: {}", result.transaction_id);
                println!("  Amount: R$ {:.2}", result.amount);
                println!("  Expires: {}", result.expires_at.to_rfc3339());
                println!();
                println!("Copy and paste:");
                println!("{}", result.payload_text);
            }
        }
        Command::Health => {
            let health = service.health();
            println!(
                "{}",
                serde_json::to_string_pretty(&health).into_diagnostic()?
            );
        }
    }

    Ok(())
}
