use clap::{Parser, Subcommand};
use ysync_client::ProductInput;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "ysync")]
#[command(about = "Yotpo product and review sync command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the products known to Yotpo, keyed by external id
    Products {
        /// Rebuild the product index instead of reusing a loaded one
        #[arg(long)]
        refresh: bool,
    },
    /// Create a product on Yotpo, or patch it when it already exists
    Upsert {
        #[arg(long)]
        external_id: String,
        #[arg(long)]
        sku: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        price: Option<String>,
        /// Allow patching a product that already exists remotely
        #[arg(long)]
        update: bool,
    },
    /// Fetch all review bottom lines, keyed by domain key
    Reviews,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = ysync_core::load_app_config_from_env()?;
    match cli.command {
        Commands::Products { refresh } => commands::products(&config, refresh).await,
        Commands::Upsert {
            external_id,
            sku,
            name,
            description,
            url,
            price,
            update,
        } => {
            let input = ProductInput {
                external_id,
                sku,
                name,
                description,
                url,
                price,
            };
            commands::upsert(&config, &input, update).await
        }
        Commands::Reviews => commands::reviews(&config).await,
    }
}
