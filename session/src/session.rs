//! The election session state machine.

use std::sync::Arc;

use elect_gateway::{ContractGateway, ElectionContract};
use elect_provider::{ProviderConnector, ProviderSession, SessionUpdate};
use elect_types::{Leader, Party, ProviderEvent, StateResult};
use tokio::sync::watch;

use crate::state::{ConnectionStatus, FieldKey, SessionState, TxOutcome};
use crate::{SessionError, SessionSettings};

/// A mutating contract call.
enum WriteCall {
    SubmitStateResult(StateResult),
    EndElection,
}

impl WriteCall {
    fn name(&self) -> &'static str {
        match self {
            Self::SubmitStateResult(_) => "submitStateResult",
            Self::EndElection => "endElection",
        }
    }
}

/// Owns one wallet connection, one contract handle and the state the
/// presentation layer renders.
///
/// Mutating operations take `&mut self`, so at most one write is ever in
/// flight per session. Every state change is published on a watch channel;
/// see [`ElectionSession::subscribe`].
pub struct ElectionSession {
    settings: SessionSettings,
    provider: ProviderSession,
    gateway: Arc<dyn ContractGateway>,
    contract: Option<Arc<dyn ElectionContract>>,
    state: SessionState,
    publisher: watch::Sender<SessionState>,
}

impl ElectionSession {
    pub fn new(
        settings: SessionSettings,
        connector: Arc<dyn ProviderConnector>,
        gateway: Arc<dyn ContractGateway>,
    ) -> Self {
        let state = SessionState::initial(settings.default_chain_id);
        let (publisher, _) = watch::channel(state.clone());
        let provider = ProviderSession::new(connector, settings.connect_timeout);
        Self {
            settings,
            provider,
            gateway,
            contract: None,
            state,
            publisher,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Receive a snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.publisher.subscribe()
    }

    /// Whether the connected provider pushes lifecycle events.
    pub fn has_event_stream(&self) -> bool {
        self.provider.has_event_stream()
    }

    fn update(&mut self, apply: impl FnOnce(&mut SessionState)) {
        apply(&mut self.state);
        self.publisher.send_replace(self.state.clone());
    }

    fn contract(&self) -> Result<Arc<dyn ElectionContract>, SessionError> {
        self.contract.clone().ok_or(SessionError::NotConnected)
    }

    // ── Connection lifecycle ───────────────────────────────────────────

    /// Reconnect on startup when an earlier run left a cached provider.
    /// Returns whether a connection was attempted.
    pub async fn resume(&mut self) -> Result<bool, SessionError> {
        if !self.provider.has_cached_provider() {
            tracing::debug!("no cached provider; waiting for an explicit connect");
            return Ok(false);
        }
        self.on_connect().await?;
        Ok(true)
    }

    /// Connect a wallet, bind the contract and load the election view.
    ///
    /// A cancelled or failed connect leaves the session disconnected. A
    /// failure after the wallet connected closes the connection again but
    /// keeps the cached provider, so a transient read failure does not cost
    /// the next resume. Either way the error is returned to the caller.
    pub async fn on_connect(&mut self) -> Result<(), SessionError> {
        if self.state.is_connected() {
            tracing::debug!("already connected");
            return Ok(());
        }

        self.update(|s| s.status = ConnectionStatus::Connecting);
        let connection = match self.provider.connect().await {
            Ok(connection) => connection,
            Err(e) => {
                tracing::warn!(error = %e, "wallet connection failed");
                self.update(|s| s.status = ConnectionStatus::Disconnected);
                return Err(e.into());
            }
        };

        let contract = match self.gateway.bind(
            self.settings.contract_address,
            &self.settings.abi,
            &connection.library,
            connection.account,
        ) {
            Ok(contract) => contract,
            Err(e) => return Err(self.abort_bootstrap(e.into())),
        };
        self.contract = Some(contract);
        self.update(|s| {
            s.chain_id = connection.chain_id;
            s.address = Some(connection.account);
            s.fetching = true;
        });

        if let Err(e) = self.bootstrap_reads().await {
            return Err(self.abort_bootstrap(e));
        }

        self.update(|s| {
            s.fetching = false;
            s.status = ConnectionStatus::Connected;
        });
        tracing::info!(
            contract = %self.settings.contract_address,
            account = %connection.account,
            chain_id = %connection.chain_id,
            "election session connected"
        );
        Ok(())
    }

    async fn bootstrap_reads(&mut self) -> Result<(), SessionError> {
        self.refresh_leader().await?;
        self.refresh_seats().await?;
        self.refresh_election_status().await
    }

    fn abort_bootstrap(&mut self, error: SessionError) -> SessionError {
        tracing::warn!(error = %error, "session bootstrap failed; closing connection");
        self.provider.close();
        self.contract = None;
        let chain_id = self.settings.default_chain_id;
        self.update(|s| {
            let initial = SessionState::initial(chain_id);
            s.status = initial.status;
            s.chain_id = initial.chain_id;
            s.address = initial.address;
            s.fetching = initial.fetching;
            s.transaction_hash = initial.transaction_hash;
            s.view = initial.view;
        });
        error
    }

    /// Tear down the wallet connection and return every field to its initial
    /// value. Safe to call at any time, any number of times.
    pub fn reset_app(&mut self) {
        self.provider.disconnect();
        self.contract = None;
        let initial = SessionState::initial(self.settings.default_chain_id);
        self.update(|s| *s = initial);
        tracing::info!("session reset");
    }

    // ── Reads ──────────────────────────────────────────────────────────

    pub async fn refresh_leader(&mut self) -> Result<(), SessionError> {
        let contract = self.contract()?;
        let id = contract.current_leader_id().await?;
        let leader = Leader::from_id(id);
        tracing::debug!(id, leader = %leader, "leader refreshed");
        self.update(|s| s.view.current_leader = Some(leader));
        Ok(())
    }

    pub async fn refresh_seats(&mut self) -> Result<(), SessionError> {
        let contract = self.contract()?;
        let (party_a, party_b) =
            tokio::try_join!(contract.seats_for(Party::A), contract.seats_for(Party::B))?;
        tracing::debug!(party_a, party_b, "seats refreshed");
        self.update(|s| {
            s.view.seats.party_a = Some(party_a);
            s.view.seats.party_b = Some(party_b);
        });
        Ok(())
    }

    pub async fn refresh_election_status(&mut self) -> Result<(), SessionError> {
        let contract = self.contract()?;
        let ended = contract.has_ended().await?;
        tracing::debug!(ended, "election status refreshed");
        self.update(|s| s.view.election_ended = ended);
        Ok(())
    }

    // ── Writes ─────────────────────────────────────────────────────────

    /// Submit the pending state result.
    ///
    /// On confirmation the draft is cleared and leader and seats are
    /// re-read. On any other outcome the draft is kept for a retry.
    pub async fn submit_election_result(&mut self) -> TxOutcome {
        let contract = match self.writable_contract() {
            Ok(contract) => contract,
            Err(e) => return self.reject(e),
        };
        let result = match self.state.pending.to_state_result() {
            Ok(result) => result,
            Err(e) => return self.reject(e),
        };
        self.submit_and_confirm(contract, WriteCall::SubmitStateResult(result))
            .await
    }

    /// Close the election. On confirmation leader, seats and the ended flag
    /// are re-read.
    pub async fn end_election(&mut self) -> TxOutcome {
        let contract = match self.writable_contract() {
            Ok(contract) => contract,
            Err(e) => return self.reject(e),
        };
        self.submit_and_confirm(contract, WriteCall::EndElection).await
    }

    fn writable_contract(&self) -> Result<Arc<dyn ElectionContract>, SessionError> {
        if !self.state.is_connected() {
            return Err(SessionError::NotConnected);
        }
        if self.state.view.election_ended {
            return Err(SessionError::ElectionEnded);
        }
        self.contract()
    }

    async fn submit_and_confirm(
        &mut self,
        contract: Arc<dyn ElectionContract>,
        call: WriteCall,
    ) -> TxOutcome {
        self.update(|s| s.fetching = true);

        let sent = match &call {
            WriteCall::SubmitStateResult(result) => contract.submit_state_result(result).await,
            WriteCall::EndElection => contract.end_election().await,
        };
        let pending = match sent {
            Ok(pending) => pending,
            Err(e) => return self.fail(&call, e.into()),
        };

        let hash = pending.hash();
        tracing::info!(call = call.name(), hash = %hash, "transaction submitted");
        self.update(|s| s.transaction_hash = Some(hash));

        let timeout = self.settings.receipt_timeout;
        let receipt = match tokio::time::timeout(timeout, pending.wait()).await {
            Ok(Ok(receipt)) => receipt,
            Ok(Err(e)) => return self.fail(&call, e.into()),
            Err(_) => return self.fail(&call, SessionError::ReceiptTimeout { hash, timeout }),
        };

        if !receipt.status.is_success() {
            let error = pending.error().or(receipt.error).unwrap_or_else(|| {
                format!(
                    "transaction {hash} reverted with status {}",
                    receipt.status.code()
                )
            });
            tracing::warn!(call = call.name(), hash = %hash, error = %error, "transaction reverted");
            self.update(|s| {
                s.fetching = false;
                s.transaction_hash = None;
                s.last_error = Some(error.clone());
            });
            return TxOutcome::Reverted { hash, error };
        }

        tracing::info!(
            call = call.name(),
            hash = %hash,
            block = ?receipt.block_number,
            "transaction confirmed"
        );
        let clear_draft = matches!(call, WriteCall::SubmitStateResult(_));
        self.update(|s| {
            s.fetching = false;
            s.transaction_hash = None;
            s.last_error = None;
            if clear_draft {
                s.pending = Default::default();
            }
        });

        if let Err(e) = self.refresh_after(&call).await {
            tracing::warn!(call = call.name(), error = %e, "refresh after write failed");
            self.update(|s| s.last_error = Some(e.to_string()));
        }
        TxOutcome::Confirmed(hash)
    }

    async fn refresh_after(&mut self, call: &WriteCall) -> Result<(), SessionError> {
        self.refresh_leader().await?;
        self.refresh_seats().await?;
        if let WriteCall::EndElection = call {
            self.refresh_election_status().await?;
        }
        Ok(())
    }

    fn fail(&mut self, call: &WriteCall, error: SessionError) -> TxOutcome {
        let message = error.to_string();
        tracing::warn!(call = call.name(), error = %message, "transaction failed");
        self.update(|s| {
            s.fetching = false;
            s.transaction_hash = None;
            s.last_error = Some(message.clone());
        });
        TxOutcome::Failed(message)
    }

    fn reject(&mut self, error: SessionError) -> TxOutcome {
        let message = error.to_string();
        tracing::warn!(error = %message, "write rejected");
        self.update(|s| s.last_error = Some(message.clone()));
        TxOutcome::Rejected(message)
    }

    // ── Form input ─────────────────────────────────────────────────────

    /// Update one field of the pending submission. Unrecognised keys are
    /// ignored.
    pub fn handle_field_change(&mut self, key: &str, value: &str) {
        match FieldKey::parse(key) {
            Some(field) => self.update(|s| s.pending.set(field, value)),
            None => tracing::debug!(key, "ignoring unknown form field"),
        }
    }

    // ── Provider events ────────────────────────────────────────────────

    /// Apply one provider lifecycle event.
    pub async fn apply_event(&mut self, event: ProviderEvent) -> Result<(), SessionError> {
        tracing::debug!(?event, "applying provider event");
        match self.provider.handle_event(event).await? {
            None => {}
            Some(SessionUpdate::Reset) => self.reset_app(),
            Some(SessionUpdate::Account(address)) => {
                tracing::info!(address = ?address, "active account changed");
                self.update(|s| s.address = address);
            }
            Some(SessionUpdate::Chain(chain_id)) => {
                tracing::info!(chain_id = %chain_id, "network changed");
                self.update(|s| s.chain_id = chain_id);
            }
        }
        Ok(())
    }

    /// Apply every queued provider event without waiting. Returns how many
    /// were applied.
    pub async fn pump_events(&mut self) -> Result<usize, SessionError> {
        let mut applied = 0;
        while let Some(event) = self.provider.try_next_event() {
            self.apply_event(event).await?;
            applied += 1;
        }
        Ok(applied)
    }

    /// Wait for the next provider event and apply it. Never resolves while
    /// the provider has no event stream.
    pub async fn next_event(&mut self) -> Result<(), SessionError> {
        let event = self.provider.next_event().await;
        self.apply_event(event).await
    }
}
