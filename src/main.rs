use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod constants;
mod error;
mod integrations;
mod models;
mod services;
mod ui;
mod utils;

use config::Config;
use integrations::{RpcWallet, WalletProvider};
use models::Deployment;
use services::FundMeContract;
use ui::terminal::{parse_command, render, Command, HELP};
use ui::{countdown_ticker, App, UiEvent, WalletWatcher};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; stdout is reserved for the UI
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fundme_dapp=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!("Starting FundMe dApp");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!(
        "Target network: {} (chain {})",
        config.target_network,
        config.target_network.chain().chain_id
    );

    let wallet: Option<Arc<dyn WalletProvider>> = match RpcWallet::from_config(&config)? {
        Some(wallet) => Some(Arc::new(wallet) as Arc<dyn WalletProvider>),
        None => {
            tracing::warn!("WALLET_RPC_URL not set; running without a wallet");
            None
        }
    };

    if let Some(wallet) = &wallet {
        log_contract_info(wallet.as_ref(), config.target_network.deployment()).await;
    }

    let mut app = App::new(
        wallet.clone(),
        config.target_network,
        config.tx_confirmations,
    );
    // Pick up an already-authorized wallet, as on page load
    if wallet.is_some() {
        app.sync_from_wallet().await;
    }
    println!("{}", HELP);
    println!("{}", render(app.view()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = countdown_ticker();
    let mut chain_poll =
        tokio::time::interval(Duration::from_secs(config.chain_poll_interval_secs));
    let mut watcher = WalletWatcher::new();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_command(&line) {
                    Command::Dispatch(events) => {
                        if events.is_empty() {
                            continue;
                        }
                        for event in events {
                            app.dispatch(event).await;
                        }
                        ticker.reset();
                        println!("{}", render(app.view()));
                    }
                    Command::Status => println!("{}", render(app.view())),
                    Command::Help => println!("{}", HELP),
                    Command::Quit => break,
                    Command::Unknown(input) => println!("unknown command: {} ({})", input, HELP),
                }
            }
            _ = ticker.tick() => {
                let before = (app.view().withdraw_enabled(), app.view().banner().is_some());
                app.dispatch(UiEvent::Tick).await;
                let after = (app.view().withdraw_enabled(), app.view().banner().is_some());
                if before != after {
                    println!("{}", render(app.view()));
                }
            }
            _ = chain_poll.tick(), if wallet.is_some() => {
                let Some(wallet) = wallet.as_ref() else {
                    continue;
                };
                let events = watcher.poll(wallet.as_ref()).await;
                if events.is_empty() {
                    continue;
                }
                for event in events {
                    app.dispatch(event).await;
                }
                ticker.reset();
                println!("{}", render(app.view()));
            }
        }
    }

    tracing::info!("Shutting down");
    Ok(())
}

// Best-effort startup diagnostics; failures are only logged.
async fn log_contract_info(wallet: &dyn WalletProvider, deployment: &Deployment) {
    let contract = match deployment.fund_me() {
        Ok(address) => FundMeContract::new(address),
        Err(e) => {
            tracing::warn!("{}", e);
            return;
        }
    };
    match contract.version(wallet).await {
        Ok(version) => tracing::info!("FundMe at {:?}, feed version {}", contract.address(), version),
        Err(e) => tracing::warn!("Failed to read FundMe version: {}", e),
    }
    match contract.lock_duration(wallet).await {
        Ok(seconds) => tracing::info!("Withdrawal lock duration: {}s", seconds),
        Err(e) => tracing::warn!("Failed to read withdrawal lock duration: {}", e),
    }
}
