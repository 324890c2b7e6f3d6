use clap::{Parser, Subcommand};
use database::OrderRepository;
use rust_decimal::Decimal;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// The main entry point for the bfx order data access service.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = configuration::load_config()?;
    let pool = database::connect(&config.database).await?;
    let repository =
        OrderRepository::new(pool).statement_logging(config.database.statement_logging);

    let cli = Cli::parse();
    match cli.command {
        Commands::FetchOrders { ids } => {
            let orders = repository.order_details(&ids).await?;
            info!(count = orders.len(), "fetched order details");
            println!("{}", serde_json::to_string_pretty(&orders)?);
        }
        Commands::Counterparties { order_id } => {
            let candidates = repository.counterparty_candidates(order_id).await?;
            println!("{}", serde_json::to_string_pretty(&candidates)?);
        }
        Commands::Lock { ids, user_id } => {
            let ok = repository.lock_orders(&ids, user_id).await?;
            println!("locked: {ok}");
        }
        Commands::Unlock { ids, user_id } => {
            let ok = repository.unlock_orders(&ids, user_id).await?;
            println!("unlocked: {ok}");
        }
        Commands::NettingCode {
            execution_type,
            ccy_dealt,
            order_type,
            dealt_quantity,
        } => {
            let code = repository
                .netting_code(&execution_type, &ccy_dealt, &order_type, dealt_quantity)
                .await?;
            match code {
                Some(code) => println!("{code}"),
                None => println!("no netting code for this combination"),
            }
        }
        Commands::CashExposures { ids } => {
            let exposures = repository.cash_to_trade_exposures(&ids).await?;
            println!("{}", serde_json::to_string_pretty(&exposures)?);
        }
        Commands::SplitBatchId => {
            let batch_id = repository.split_order_batch_id().await?;
            println!("{batch_id}");
        }
        Commands::SplitStages { batch_id } => {
            let stages = repository.split_order_stages_detail(batch_id).await?;
            println!("{}", serde_json::to_string_pretty(&stages)?);
        }
    }

    Ok(())
}

/// Operational access to the bfx order database.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch full order details, legs and counterparty candidates included.
    FetchOrders {
        /// Order ids, comma separated.
        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<i64>,
    },
    /// List the counterparty candidates for one order.
    Counterparties {
        #[arg(long)]
        order_id: i64,
    },
    /// Lock a batch of orders for a user.
    Lock {
        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<i64>,
        #[arg(long)]
        user_id: i64,
    },
    /// Release a batch of locked orders.
    Unlock {
        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<i64>,
        #[arg(long)]
        user_id: i64,
    },
    /// Look up the netting action code for one order shape.
    NettingCode {
        #[arg(long)]
        execution_type: String,
        #[arg(long)]
        ccy_dealt: String,
        #[arg(long)]
        order_type: String,
        #[arg(long)]
        dealt_quantity: Decimal,
    },
    /// Fetch cash exposures eligible for conversion into trades.
    CashExposures {
        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<i64>,
    },
    /// Draw the next split-order batch id.
    SplitBatchId,
    /// List the staged child orders of a split batch.
    SplitStages {
        #[arg(long)]
        batch_id: i64,
    },
}
