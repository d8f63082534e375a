use std::{str::FromStr, sync::Arc, time::Duration};

use alloy::{
    primitives::{Address, Bytes, U256},
    signers::local::PrivateKeySigner,
};
use anyhow::Context;
use tracing::*;
use traverse_common::{
    logging::{self, LoggerConfig},
    shutdown::ShutdownSignal,
};
use traverse_ethio::{
    rpc::{traits::Reader, types::TransferSpec},
    EvmClient,
};
use traverse_indexer_client::IndexClient;
use traverse_reconciler::Reconciler;

use crate::{
    args::{BalanceArgs, Command, TopLevel, TransferArgs},
    config::Config,
};

mod args;
mod config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args: TopLevel = argh::from_env();
    if let Err(e) = main_inner(args).await {
        eprintln!("FATAL ERROR: {e:#}");
        return Err(e);
    }

    Ok(())
}

async fn main_inner(args: TopLevel) -> anyhow::Result<()> {
    // Init the logging before we do anything else.
    let mut lconfig = LoggerConfig::with_base_name("traverse-cli");
    if let Some(url) = logging::get_otlp_url_from_env() {
        lconfig.set_otlp_url(url);
    }
    logging::init(lconfig);

    let config = Config::load(&args.config)?;

    let signer = PrivateKeySigner::from_str(config.wallet.private_key.trim())
        .context("invalid wallet private key")?;

    let origin = Arc::new(EvmClient::new(
        &config.origin.http_url,
        config.origin.bridge_address,
        signer.clone(),
    )?);
    let dest = Arc::new(EvmClient::new(
        &config.destination.http_url,
        config.destination.bridge_address,
        signer,
    )?);
    let index = Arc::new(IndexClient::new(
        &config.indexer.url,
        Duration::from_secs(config.indexer.http_timeout_secs),
    )?);

    let res = match args.cmd {
        Command::Transfer(cmd) => transfer(cmd, &config, origin, dest, index).await,
        Command::Balance(cmd) => balance(cmd, origin, dest).await,
    };

    logging::finalize();
    res
}

async fn transfer(
    args: TransferArgs,
    config: &Config,
    origin: Arc<EvmClient>,
    dest: Arc<EvmClient>,
    index: Arc<IndexClient>,
) -> anyhow::Result<()> {
    let token = match &args.token {
        Some(t) => Address::from_str(t).context("invalid token address")?,
        None => Address::ZERO,
    };
    let amount = U256::from_str_radix(&args.amount, 10).context("invalid amount")?;
    let dest_address = match &args.dest {
        Some(a) => Address::from_str(a).context("invalid destination address")?,
        None => origin.sender(),
    };

    let spec = TransferSpec {
        token,
        amount,
        dest_network: config.destination.network_id,
        dest_address,
        metadata: Bytes::new(),
    };

    // Ctrl-c unwinds any in-progress wait instead of killing the process.
    let signal = ShutdownSignal::new();
    let ctrlc_signal = signal.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        warn!("got INT, initiating shutdown");
        ctrlc_signal.send();
    });

    let engine = Reconciler::new(origin, dest, index, config.reconciler.clone());
    let claim_txid = engine
        .submit_and_reconcile(&spec, &signal.subscribe())
        .await?;

    println!("claim confirmed: {claim_txid}");
    Ok(())
}

async fn balance(
    args: BalanceArgs,
    origin: Arc<EvmClient>,
    dest: Arc<EvmClient>,
) -> anyhow::Result<()> {
    let address = match &args.address {
        Some(a) => Address::from_str(a).context("invalid address")?,
        None => origin.sender(),
    };

    let origin_balance = origin.balance(address).await?;
    let dest_balance = dest.balance(address).await?;

    println!("{address}");
    println!("  origin:      {origin_balance}");
    println!("  destination: {dest_balance}");
    Ok(())
}
