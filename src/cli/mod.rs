//! Command line interface

mod nft;
pub mod table;
mod token;

use crate::client::Context;
use crate::config::Config;
use crate::core::bulk::RunOptions;
use crate::utils::logging::LogFormat;
use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Solana token and NFT toolkit
#[derive(Parser, Debug)]
#[command(name = "solen", version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/solen/config.ini)
    #[arg(long, global = true, env = "SOLEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Debug level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Installed version
    Version,

    /// Token balance of a wallet (default: the configured keypair)
    Balance {
        #[command(flatten)]
        env: EnvArgs,
        #[arg(short, long)]
        wallet: Option<String>,
        /// Show the SOL balance instead of the token balance
        #[arg(long)]
        sol: bool,
    },

    /// Transfer tokens to a wallet or token account
    Transfer {
        wallet: String,
        amount: f64,
        #[command(flatten)]
        env: EnvArgs,
        #[arg(short, long)]
        dry_run: bool,
        #[arg(long)]
        skip_confirm: bool,
    },

    /// Transfer tokens to every `dest,amount` row of a CSV file
    BulkTransfer {
        #[command(subcommand)]
        step: BulkStep,
    },

    /// NFT queries and updates
    Nft {
        #[command(subcommand)]
        command: NftCommand,
    },

    /// Update the metadata of every `mint_address` row of a CSV file
    BulkUpdate {
        #[command(subcommand)]
        step: BulkStep,
    },
}

#[derive(Debug, Subcommand)]
pub enum NftCommand {
    /// Token accounts owned by a wallet
    Accounts {
        #[command(flatten)]
        env: EnvArgs,
        #[arg(short, long)]
        owner: Option<String>,
    },
    /// On-chain metadata of a mint
    Data {
        mint: String,
        #[command(flatten)]
        env: EnvArgs,
    },
    /// Signatures that touched a mint, newest first
    Transactions {
        mint: String,
        #[command(flatten)]
        env: EnvArgs,
    },
    /// Every owner that held a mint
    Holders {
        mint: String,
        #[command(flatten)]
        env: EnvArgs,
    },
    /// Update the metadata of one mint
    Update {
        mint: String,
        #[command(flatten)]
        env: EnvArgs,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long)]
        uri: Option<String>,
        /// Seller fee in basis points (450 = 4.5%)
        #[arg(long)]
        fee: Option<u16>,
        #[arg(short, long)]
        dry_run: bool,
        #[arg(long)]
        skip_confirm: bool,
    },
}

/// The four steps of a bulk job
#[derive(Debug, Subcommand)]
pub enum BulkStep {
    /// Create the ledger from the CSV file
    Init(BulkArgs),
    /// Submit every row that has no signature yet
    Run {
        #[command(flatten)]
        args: BulkArgs,
        /// Build and log transactions without sending them
        #[arg(short, long)]
        dry_run: bool,
        /// Do not wait for each transaction to be confirmed
        #[arg(long)]
        skip_confirm: bool,
        /// Also retry rows whose signature never finalized
        #[arg(long)]
        ignore_unfinalized_signature: bool,
    },
    /// Poll the signatures of unfinalized rows
    Confirm(BulkArgs),
    /// Summarize the ledger
    Status(BulkArgs),
}

impl BulkStep {
    pub fn args(&self) -> &BulkArgs {
        match self {
            BulkStep::Init(args) | BulkStep::Confirm(args) | BulkStep::Status(args) => args,
            BulkStep::Run { args, .. } => args,
        }
    }
}

#[derive(Debug, Args)]
pub struct BulkArgs {
    pub csv: PathBuf,
    #[command(flatten)]
    pub env: EnvArgs,
}

#[derive(Debug, Args)]
pub struct EnvArgs {
    /// Cluster name as configured (default: `default_env`)
    #[arg(short, long, env = "SOLEN_ENV")]
    pub env: Option<String>,
    /// Token mint (default: `<env>_token`)
    #[arg(long)]
    pub token: Option<String>,
}

/// Options of a `run` step; `None` for the other steps
pub(crate) fn run_options(step: &BulkStep) -> Option<RunOptions> {
    match step {
        BulkStep::Run {
            dry_run,
            skip_confirm,
            ignore_unfinalized_signature,
            ..
        } => Some(RunOptions {
            dry_run: *dry_run,
            skip_confirm: *skip_confirm,
            ignore_unfinalized_signature: *ignore_unfinalized_signature,
        }),
        _ => None,
    }
}

/// Execute the parsed command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Commands::Version = cli.command {
        println!("{}", crate::build_info());
        return Ok(());
    }

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    match cli.command {
        Commands::Version => Ok(()),
        Commands::Balance { env, wallet, sol } => {
            token::balance(&connect(&config, &env)?, &env, wallet.as_deref(), sol).await
        }
        Commands::Transfer {
            wallet,
            amount,
            env,
            dry_run,
            skip_confirm,
        } => {
            token::transfer(&connect(&config, &env)?, &env, &wallet, amount, dry_run, skip_confirm)
                .await
        }
        Commands::BulkTransfer { step } => {
            let env = &step.args().env;
            token::bulk_transfer(connect(&config, env)?, env, &step).await
        }
        Commands::Nft { command } => nft::run(&config, command).await,
        Commands::BulkUpdate { step } => {
            let env = &step.args().env;
            nft::bulk_update(connect(&config, env)?, &step).await
        }
    }
}

pub(crate) fn connect(config: &Config, env: &EnvArgs) -> anyhow::Result<Context> {
    let context = Context::from_config(config, env.env.as_deref())
        .context("Failed to set up the Solana client")?;
    Ok(match &env.token {
        Some(token) => context.with_token(token),
        None => context,
    })
}
