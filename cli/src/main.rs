//! ballot: command-line client for the on-chain ballot contract.

mod render;

use std::cell::RefCell;
use std::path::PathBuf;

use anyhow::Context;
use ballot_core::{driver, Action, ClientConfig, Reconciler, SessionIdentity, Settlement};
use ballot_rpc::BallotRpc;
use ballot_types::{parse_address, Address, SupportedChain};
use ballot_utils::{init_logging, LogFormat};
use clap::Parser;

#[derive(Parser)]
#[command(name = "ballot", about = "Vote on the on-chain ballot from the command line")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "BALLOT_CONFIG")]
    config: Option<PathBuf>,

    /// Chain to use: "base", "celo", or a numeric chain id.
    #[arg(long, default_value = "base", env = "BALLOT_CHAIN")]
    chain: SupportedChain,

    /// Acting account. Defaults to the first account the node signs for.
    #[arg(long, env = "BALLOT_ACCOUNT")]
    account: Option<String>,

    /// Ballot contract address on the selected chain.
    #[arg(long, env = "BALLOT_CONTRACT")]
    contract: Option<String>,

    /// JSON-RPC endpoint for the selected chain.
    #[arg(long, env = "BALLOT_RPC_URL")]
    rpc_url: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "BALLOT_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "BALLOT_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Show proposals, the leader, and your voting status.
    Status,
    /// Vote for the proposal at INDEX.
    Vote { index: u64 },
    /// Delegate your vote to ADDRESS.
    Delegate { address: String },
    /// Give ADDRESS the right to vote (chairperson only).
    GrantRight { address: String },
}

fn load_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::from_toml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ClientConfig::default(),
    };
    if let Some(contract) = &cli.contract {
        let address = parse_address(contract).context("invalid --contract address")?;
        config.contracts.set(cli.chain, address);
    }
    if let Some(url) = &cli.rpc_url {
        config.rpc.set(cli.chain, url.clone());
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = cli.log_format {
        config.log_format = match format {
            LogFormat::Human => "human".into(),
            LogFormat::Json => "json".into(),
        };
    }
    Ok(config)
}

async fn resolve_account(cli: &Cli, rpc: &BallotRpc) -> anyhow::Result<Option<Address>> {
    if let Some(account) = &cli.account {
        return Ok(Some(
            parse_address(account).context("invalid --account address")?,
        ));
    }
    match rpc.default_account(cli.chain).await {
        Ok(account) => Ok(account),
        Err(e) => {
            tracing::debug!(error = %e, "node exposes no signing accounts");
            Ok(None)
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let format = config.log_format.parse::<LogFormat>().unwrap_or_default();
    init_logging(format, &config.log_level);

    let rpc = BallotRpc::from_config(&config).context("creating RPC client")?;
    let chain_id = match rpc.chain_id(cli.chain).await {
        Ok(id) => Some(id),
        Err(e) => {
            tracing::warn!(error = %e, chain = %cli.chain, "could not reach the chain");
            None
        }
    };
    let account = resolve_account(&cli, &rpc).await?;

    let reconciler = RefCell::new(Reconciler::new(config.contracts.clone()));
    reconciler
        .borrow_mut()
        .set_identity(SessionIdentity::new(account, chain_id));

    if chain_id.is_some() && !reconciler.borrow().reads_enabled() {
        if reconciler.borrow().view().is_degraded() {
            tracing::info!("unsupported chain, reads disabled");
        } else {
            eprintln!("No ballot contract configured for {}.", cli.chain);
        }
    }

    driver::refresh(&reconciler, &rpc).await;

    let action = match cli.command {
        Command::Status => None,
        Command::Vote { index } => Some(Action::Vote(index)),
        Command::Delegate { address } => Some(Action::Delegate(address)),
        Command::GrantRight { address } => Some(Action::GrantRight(address)),
    };

    if let Some(action) = action {
        if account.is_none() {
            reconciler.borrow_mut().open_connect_prompt();
            print!("{}", render::render(&reconciler.borrow()));
            anyhow::bail!("no wallet connected");
        }
        let kind = action.kind();
        match driver::perform(&reconciler, &rpc, action).await {
            Some(Settlement::Success { tx_hash, .. }) => {
                println!("{}", kind.success_label());
                tracing::info!(%tx_hash, "settled");
            }
            Some(settlement @ Settlement::Failure { .. }) => {
                let status = reconciler
                    .borrow()
                    .coordinator()
                    .status(settlement.kind())
                    .unwrap_or_default();
                println!("{status}");
            }
            None => println!("Action not available for this account."),
        }
    }

    print!("{}", render::render(&reconciler.borrow()));
    Ok(())
}
