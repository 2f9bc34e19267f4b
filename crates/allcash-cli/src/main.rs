/*
[INPUT]:  CLI arguments, optional YAML configuration file, ALLCASH_API_KEY
[OUTPUT]: Broker API results printed as JSON on stdout
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, subcommands, or startup flow
*/

mod config;

use std::path::PathBuf;

use allcash_adapter::AllcashClient;
use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::CliConfig;

#[derive(Parser, Debug)]
#[command(name = "allcash", version, about = "AllCash broker API command line client")]
struct Cli {
    #[arg(long = "config", value_name = "PATH")]
    config_path: Option<PathBuf>,
    #[arg(long = "api-key", env = "ALLCASH_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    /// Trade against the live account even if the config says demo
    #[arg(long = "live")]
    live: bool,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show account information
    Account,
    /// List open positions
    Positions,
    /// Place a buy order
    Buy(OrderArgs),
    /// Place a sell order
    Sell(OrderArgs),
    /// Close an order
    Close { order_id: String },
    /// Show the status of an order
    Status { order_id: String },
    /// Change take profit / stop loss of an order
    Modify {
        order_id: String,
        #[arg(long = "take-profit")]
        take_profit: Option<Decimal>,
        #[arg(long = "stop-loss")]
        stop_loss: Option<Decimal>,
    },
    /// Show market data for a symbol
    Market { symbol: String },
}

#[derive(Args, Debug)]
struct OrderArgs {
    /// Trading symbol, e.g. GBP/USD
    symbol: String,
    amount: Decimal,
    /// Take profit level, 0 for none
    #[arg(long = "take-profit", default_value = "0")]
    take_profit: Decimal,
    /// Stop loss level, 0 for none
    #[arg(long = "stop-loss", default_value = "0")]
    stop_loss: Decimal,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    let config = CliConfig::load(args.config_path.as_deref()).context("load config")?;
    let api_key = resolve_api_key(args.api_key.as_deref(), &config)?;
    let demo_mode = config.demo_mode && !args.live;

    let client = AllcashClient::with_config(api_key, demo_mode, config.client_config())
        .context("create AllCash client")?;
    info!(demo_mode, base_url = client.base_url(), "client ready");

    let output = run(&client, args.command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn run(client: &AllcashClient, command: Command) -> Result<serde_json::Value> {
    let output = match command {
        Command::Account => json!(client.get_account_info().await?),
        Command::Positions => json!(client.get_open_positions().await?),
        Command::Buy(order) => {
            let order_id = client
                .place_buy_order(&order.symbol, order.amount, order.take_profit, order.stop_loss)
                .await;
            json!({ "orderId": placed(order_id)? })
        }
        Command::Sell(order) => {
            let order_id = client
                .place_sell_order(&order.symbol, order.amount, order.take_profit, order.stop_loss)
                .await;
            json!({ "orderId": placed(order_id)? })
        }
        Command::Close { order_id } => {
            if !client.close_order(&order_id).await {
                bail!("order {order_id} was not closed");
            }
            json!({ "orderId": order_id, "success": true })
        }
        Command::Status { order_id } => json!(client.get_order_status(&order_id).await?),
        Command::Modify {
            order_id,
            take_profit,
            stop_loss,
        } => {
            if !client.modify_order(&order_id, take_profit, stop_loss).await? {
                bail!("order {order_id} was not modified");
            }
            json!({ "orderId": order_id, "success": true })
        }
        Command::Market { symbol } => json!(client.get_market_data(&symbol).await?),
    };
    Ok(output)
}

fn placed(order_id: String) -> Result<String> {
    if order_id.is_empty() {
        bail!("order was not placed; see log output for the broker response");
    }
    Ok(order_id)
}

fn resolve_api_key(flag: Option<&str>, config: &CliConfig) -> Result<String> {
    flag.or(config.api_key.as_deref())
        .filter(|key| !key.trim().is_empty())
        .map(str::to_string)
        .context("API key not found; pass --api-key, set ALLCASH_API_KEY or add api_key to the config file")
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_buy_with_levels() {
        let cli = Cli::try_parse_from([
            "allcash",
            "--api-key",
            "k",
            "buy",
            "GBP/USD",
            "100",
            "--take-profit",
            "1.5",
        ])
        .expect("parse");

        match cli.command {
            Command::Buy(order) => {
                assert_eq!(order.symbol, "GBP/USD");
                assert_eq!(order.amount, Decimal::from(100));
                assert_eq!(order.take_profit, Decimal::new(15, 1));
                assert_eq!(order.stop_loss, Decimal::ZERO);
            }
            other => panic!("Expected Buy, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_modify_and_live_flag() {
        let cli = Cli::try_parse_from(["allcash", "--live", "modify", "ord-1", "--stop-loss", "1.25"])
            .expect("parse");
        assert!(cli.live);
        match cli.command {
            Command::Modify {
                order_id,
                take_profit,
                stop_loss,
            } => {
                assert_eq!(order_id, "ord-1");
                assert_eq!(take_profit, None);
                assert_eq!(stop_loss, Some(Decimal::new(125, 2)));
            }
            other => panic!("Expected Modify, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_api_key_precedence() {
        let config = CliConfig {
            api_key: Some("from-file".to_string()),
            ..CliConfig::default()
        };
        assert_eq!(resolve_api_key(Some("from-flag"), &config).unwrap(), "from-flag");
        assert_eq!(resolve_api_key(None, &config).unwrap(), "from-file");
        assert!(resolve_api_key(None, &CliConfig::default()).is_err());
        assert!(resolve_api_key(Some("  "), &CliConfig::default()).is_err());
    }

    #[test]
    fn test_placed_rejects_empty_sentinel() {
        assert!(placed(String::new()).is_err());
        assert_eq!(placed("ord-1".to_string()).unwrap(), "ord-1");
    }
}
