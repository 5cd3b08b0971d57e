//! elect: command-line client for the on-chain election contract.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use elect_gateway::JsonRpcGateway;
use elect_provider::{CachedProviderStore, ProviderConnector, WalletConnector};
use elect_session::{ClientConfig, ElectionSession, SessionSettings, SessionState, TxOutcome};
use elect_types::{network_for, Address, ChainId, Party};
use elect_utils::LogFormat;

#[derive(Parser)]
#[command(name = "elect", about = "Report state results to the election contract")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "ELECT_CONFIG")]
    config: Option<PathBuf>,

    /// Wallet provider to connect, by name (overrides the cached choice).
    #[arg(long, env = "ELECT_PROVIDER")]
    provider: Option<String>,

    /// Address of the election contract.
    #[arg(long, env = "ELECT_CONTRACT")]
    contract: Option<Address>,

    /// Directory holding the cached-provider marker.
    #[arg(long, env = "ELECT_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "ELECT_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "ELECT_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Connect and print the current election view.
    Status {
        /// Print the full session state as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Submit one state's result.
    Submit {
        /// State name, e.g. "OH".
        #[arg(long)]
        state: String,
        /// Votes for the first party.
        #[arg(long)]
        votes_a: u64,
        /// Votes for the second party.
        #[arg(long)]
        votes_b: u64,
        /// Seats the state awards.
        #[arg(long)]
        seats: u64,
    },
    /// Close the election. No results are accepted afterwards.
    EndElection,
    /// Forget the cached wallet provider.
    Disconnect,
}

fn load_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let path_str = path.to_string_lossy();
            ClientConfig::from_toml_file(&path_str)
                .with_context(|| format!("failed to load config {}", path.display()))?
        }
        None => ClientConfig::default(),
    };

    if let Some(contract) = cli.contract {
        config.contract_address = Some(contract);
    }
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = cli.log_format {
        config.log_format = format.to_string();
    }
    Ok(config)
}

fn print_view(state: &SessionState) {
    let leader = state
        .view
        .current_leader
        .map(|leader| leader.as_str())
        .unwrap_or("-");
    println!("account:  {}", state.address.map_or_else(|| "-".to_string(), |a| a.to_string()));
    println!("chain:    {}", state.chain_id);
    println!("leader:   {leader}");
    for party in Party::ALL {
        println!("{}", seat_line(party, state.view.seats.get(party)));
    }
    println!("ended:    {}", state.view.election_ended);
    if let Some(error) = &state.last_error {
        println!("error:    {error}");
    }
}

/// Network label for the wallet connector. Chains missing from the registry
/// are still connectable.
fn connector_network(chain_id: ChainId) -> &'static str {
    network_for(chain_id).unwrap_or("unknown")
}

fn seat_line(party: Party, seats: Option<u64>) -> String {
    let label = format!("{}:", party.candidate());
    let seats = seats.map_or_else(|| "-".to_string(), |s| s.to_string());
    format!("seats {label:<7} {seats}")
}

fn report(outcome: &TxOutcome) -> anyhow::Result<()> {
    match outcome {
        TxOutcome::Confirmed(hash) => {
            println!("confirmed {hash}");
            Ok(())
        }
        TxOutcome::Reverted { hash, error } => anyhow::bail!("transaction {hash} reverted: {error}"),
        TxOutcome::Failed(error) => anyhow::bail!("transaction failed: {error}"),
        TxOutcome::Rejected(error) => anyhow::bail!("transaction not sent: {error}"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let format: LogFormat = config.log_format.parse()?;
    elect_utils::init_logging(format, &config.log_level);

    let network = connector_network(config.default_chain_id);
    let mut connector = WalletConnector::new(network, config.providers.clone())
        .with_preferred(cli.provider.clone())
        .with_poll_interval(config.receipt_poll_interval());
    if config.cache_provider {
        connector = connector.with_cache(CachedProviderStore::new(&config.data_dir));
    }
    let connector = Arc::new(connector);

    if let Command::Disconnect = cli.command {
        // Disconnecting needs no contract binding.
        connector.clear_cached_provider()?;
        println!("cached provider cleared");
        return Ok(());
    }

    let settings = SessionSettings::from_config(&config)?;
    let gateway = Arc::new(JsonRpcGateway::new());
    let mut session = ElectionSession::new(settings, connector, gateway);

    if !session.resume().await? {
        session.on_connect().await?;
    }

    let mut updates = session.subscribe();
    let printer = tokio::spawn(async move {
        let mut shown = None;
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            if state.transaction_hash.is_some() && state.transaction_hash != shown {
                shown = state.transaction_hash;
                match state.transaction_url() {
                    Some(url) => println!("pending: {url}"),
                    None => println!("pending: {}", shown.map(|h| h.to_string()).unwrap_or_default()),
                }
            }
        }
    });

    let result = match cli.command {
        Command::Status { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(session.state())?);
            } else {
                print_view(session.state());
            }
            Ok(())
        }
        Command::Submit {
            state,
            votes_a,
            votes_b,
            seats,
        } => {
            session.handle_field_change("state-name", &state);
            session.handle_field_change("votes-party-a", &votes_a.to_string());
            session.handle_field_change("votes-party-b", &votes_b.to_string());
            session.handle_field_change("state-seats", &seats.to_string());
            let outcome = session.submit_election_result().await;
            print_view(session.state());
            report(&outcome)
        }
        Command::EndElection => {
            let outcome = session.end_election().await;
            print_view(session.state());
            report(&outcome)
        }
        Command::Disconnect => Ok(()),
    };

    drop(session);
    if let Err(e) = printer.await {
        tracing::warn!(error = %e, "state printer stopped abnormally");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "elect",
            "--contract",
            "0x3333333333333333333333333333333333333333",
            "--log-format",
            "json",
            "submit",
            "--state",
            "OH",
            "--votes-a",
            "100",
            "--votes-b",
            "90",
            "--seats",
            "18",
        ])
        .unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(
            config.contract_address,
            Some(Address::new([0x33; 20]))
        );
        assert_eq!(config.log_format, "json");
        assert_eq!(config.log_level, "info");
        assert!(matches!(cli.command, Command::Submit { seats: 18, .. }));
    }

    #[test]
    fn bad_contract_address_is_rejected() {
        assert!(Cli::try_parse_from(["elect", "--contract", "0x12", "status"]).is_err());
    }

    #[test]
    fn unregistered_default_chain_is_labelled_unknown() {
        assert_eq!(connector_network(ChainId::new(999_999)), "unknown");
        assert_eq!(connector_network(ChainId::new(42)), "kovan");
    }

    #[test]
    fn seat_lines_name_the_candidate() {
        assert_eq!(seat_line(Party::A, Some(270)), "seats Biden:  270");
        assert_eq!(seat_line(Party::B, None), "seats Trump:  -");
    }

    #[test]
    fn not_confirmed_outcomes_are_errors() {
        assert!(report(&TxOutcome::Rejected("ended".into())).is_err());
        assert!(report(&TxOutcome::Failed("timeout".into())).is_err());
    }
}
