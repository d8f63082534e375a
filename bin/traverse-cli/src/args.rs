use std::path::PathBuf;

use argh::FromArgs;

#[derive(Debug, FromArgs)]
#[argh(description = "traverse: cross-chain deposit-claim reconciliation")]
pub struct TopLevel {
    #[argh(option, short = 'c', description = "path to configuration")]
    pub config: PathBuf,

    #[argh(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, FromArgs)]
#[argh(subcommand)]
pub enum Command {
    Transfer(TransferArgs),
    Balance(BalanceArgs),
}

/// Bridge an asset to the destination chain and reconcile it to a
/// confirmed claim.
#[derive(Debug, FromArgs)]
#[argh(subcommand, name = "transfer")]
pub struct TransferArgs {
    #[argh(
        option,
        description = "token contract address; defaults to the native asset"
    )]
    pub token: Option<String>,

    #[argh(option, description = "amount to bridge, in base units")]
    pub amount: String,

    #[argh(option, description = "destination address; defaults to the sender")]
    pub dest: Option<String>,
}

/// Print the sender's balance on both chains.
#[derive(Debug, FromArgs)]
#[argh(subcommand, name = "balance")]
pub struct BalanceArgs {
    #[argh(option, description = "address to query; defaults to the sender")]
    pub address: Option<String>,
}
