use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use country_exchange::api::AppState;
use country_exchange::config::AppConfig;
use country_exchange::database_ops::open_store;
use country_exchange::query::{CountryQuery, SortOrder};
use country_exchange::tracing::init_tracing;
use country_exchange::util::env;
use serde::Serialize;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "cx", version, about = "Country exchange admin CLI")]
struct Cli {
    /// Optional override for the database URL
    #[arg(long, global = true)]
    db_url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum Commands {
    /// Fetch both upstreams and rebuild the country cache
    Refresh,
    /// Print the cached country count and last refresh time
    Status,
    /// List cached countries
    List {
        #[arg(long)]
        region: Option<String>,
        #[arg(long)]
        currency: Option<String>,
        /// gdp_desc, gdp_asc, population_desc or population_asc
        #[arg(long)]
        sort: Option<SortOrder>,
    },
    /// Show one country by name (case-sensitive)
    Show { name: String },
    /// Remove one country by name (case-sensitive)
    Delete { name: String },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env::init_env();
    init_tracing("warn,country_exchange=info")?;

    let cli = Cli::parse();
    let mut config = AppConfig::from_env()?;
    if let Some(url) = cli.db_url {
        config.database_url = url;
    }

    let store = open_store(&config.database_url, config.max_connections)
        .await
        .context("opening country store")?;

    let outcome = run(cli.command, &config, &store).await;
    store.close().await;
    outcome
}

async fn run(
    command: Commands,
    config: &AppConfig,
    store: &country_exchange::database_ops::SharedStore,
) -> Result<()> {
    match command {
        Commands::Refresh => {
            let state = AppState::from_config(config, store.clone())?;
            let summary = state.refresh.run().await?;
            info!(
                stored = summary.stored,
                skipped = summary.skipped,
                failed = summary.failed,
                image = %state.summary.image_path().display(),
                "refresh: completed"
            );
            print_json(&summary)
        }
        Commands::Status => print_json(&store.status().await?),
        Commands::List {
            region,
            currency,
            sort,
        } => {
            let query = CountryQuery {
                region,
                currency,
                sort,
            };
            print_json(&query.apply(store.list_all().await?))
        }
        Commands::Show { name } => match store.get(&name).await? {
            Some(country) => print_json(&country),
            None => bail!("country not found: {name}"),
        },
        Commands::Delete { name } => {
            if !store.delete(&name).await? {
                bail!("country not found: {name}");
            }
            println!("deleted {name}");
            Ok(())
        }
    }
}
