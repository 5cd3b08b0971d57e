//! Nullable contract: an in-memory election with scripted write outcomes.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use elect_gateway::{
    ensure_election_interface, ContractGateway, ElectionContract, GatewayError, JsonAbi,
    PendingTransaction,
};
use elect_provider::{Library, ProviderError};
use elect_types::{Address, Party, Receipt, StateResult, TxHash, TxStatus};

/// How the next write behaves. Writes with nothing scripted confirm.
#[derive(Clone, Debug)]
pub enum ScriptedWrite {
    /// Mined with status 1 and applied.
    Confirm,
    /// Mined with status 0; `error` is attached to the transaction.
    Revert { error: Option<String> },
    /// Refused before reaching the pending pool (e.g. rejected in the wallet).
    RejectOnSend(String),
    /// Accepted, then waiting for the receipt fails.
    FailOnWait(String),
    /// Accepted, and the receipt never arrives.
    Hang,
}

enum Mined {
    Confirm,
    Revert(Option<String>),
    Fail(String),
    Never,
}

#[derive(Clone, Debug)]
enum Effect {
    Submit(StateResult),
    End,
}

#[derive(Default)]
struct ContractState {
    leader_id: u64,
    seats: [u64; 2],
    ended: bool,
    script: VecDeque<ScriptedWrite>,
    failing_reads: Option<String>,
    submissions: Vec<StateResult>,
    end_calls: usize,
    leader_reads: usize,
    seat_reads: usize,
    ended_reads: usize,
    sent: u64,
}

impl ContractState {
    fn check_reads(&self) -> Result<(), GatewayError> {
        match &self.failing_reads {
            Some(message) => Err(GatewayError::Provider(ProviderError::Transport(message.clone()))),
            None => Ok(()),
        }
    }

    fn apply(&mut self, effect: &Effect) {
        match effect {
            Effect::Submit(result) => {
                if result.votes_a > result.votes_b {
                    self.seats[0] += result.seats;
                } else if result.votes_b > result.votes_a {
                    self.seats[1] += result.seats;
                }
                self.leader_id = match self.seats[0].cmp(&self.seats[1]) {
                    std::cmp::Ordering::Greater => 1,
                    std::cmp::Ordering::Less => 2,
                    std::cmp::Ordering::Equal => 0,
                };
            }
            Effect::End => self.ended = true,
        }
    }
}

/// An election contract living in memory.
#[derive(Default)]
pub struct NullContract {
    state: Arc<Mutex<ContractState>>,
}

impl NullContract {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ContractState::default())),
        }
    }

    /// Queue the behaviour of the next write.
    pub fn script(&self, write: ScriptedWrite) {
        self.state.lock().unwrap().script.push_back(write);
    }

    /// Make every read fail with a transport error (`None` restores reads).
    pub fn fail_reads(&self, message: Option<&str>) {
        self.state.lock().unwrap().failing_reads = message.map(str::to_string);
    }

    pub fn set_leader_id(&self, id: u64) {
        self.state.lock().unwrap().leader_id = id;
    }

    pub fn set_seats(&self, party: Party, seats: u64) {
        self.state.lock().unwrap().seats[party_index(party)] = seats;
    }

    pub fn set_ended(&self, ended: bool) {
        self.state.lock().unwrap().ended = ended;
    }

    pub fn submissions(&self) -> Vec<StateResult> {
        self.state.lock().unwrap().submissions.clone()
    }

    pub fn end_calls(&self) -> usize {
        self.state.lock().unwrap().end_calls
    }

    pub fn leader_reads(&self) -> usize {
        self.state.lock().unwrap().leader_reads
    }

    /// Per-party seat reads (two per seats refresh).
    pub fn seat_reads(&self) -> usize {
        self.state.lock().unwrap().seat_reads
    }

    pub fn ended_reads(&self) -> usize {
        self.state.lock().unwrap().ended_reads
    }

    fn send(&self, effect: Effect) -> Result<Box<dyn PendingTransaction>, GatewayError> {
        let mut state = self.state.lock().unwrap();
        match &effect {
            Effect::Submit(result) => state.submissions.push(result.clone()),
            Effect::End => state.end_calls += 1,
        }
        let outcome = match state.script.pop_front().unwrap_or(ScriptedWrite::Confirm) {
            ScriptedWrite::Confirm => Mined::Confirm,
            ScriptedWrite::Revert { error } => Mined::Revert(error),
            ScriptedWrite::FailOnWait(message) => Mined::Fail(message),
            ScriptedWrite::Hang => Mined::Never,
            ScriptedWrite::RejectOnSend(message) => {
                return Err(GatewayError::Provider(ProviderError::Rpc {
                    code: 4001,
                    message,
                }))
            }
        };
        state.sent += 1;
        Ok(Box::new(NullPendingTransaction {
            hash: TxHash::left_padding_from(&state.sent.to_be_bytes()),
            outcome,
            effect,
            state: Arc::clone(&self.state),
        }))
    }
}

fn party_index(party: Party) -> usize {
    match party {
        Party::A => 0,
        Party::B => 1,
    }
}

#[async_trait]
impl ElectionContract for NullContract {
    async fn current_leader_id(&self) -> Result<u64, GatewayError> {
        let mut state = self.state.lock().unwrap();
        state.check_reads()?;
        state.leader_reads += 1;
        Ok(state.leader_id)
    }

    async fn seats_for(&self, party: Party) -> Result<u64, GatewayError> {
        let mut state = self.state.lock().unwrap();
        state.check_reads()?;
        state.seat_reads += 1;
        Ok(state.seats[party_index(party)])
    }

    async fn has_ended(&self) -> Result<bool, GatewayError> {
        let mut state = self.state.lock().unwrap();
        state.check_reads()?;
        state.ended_reads += 1;
        Ok(state.ended)
    }

    async fn submit_state_result(
        &self,
        result: &StateResult,
    ) -> Result<Box<dyn PendingTransaction>, GatewayError> {
        self.send(Effect::Submit(result.clone()))
    }

    async fn end_election(&self) -> Result<Box<dyn PendingTransaction>, GatewayError> {
        self.send(Effect::End)
    }
}

/// A write accepted by [`NullContract`].
pub struct NullPendingTransaction {
    hash: TxHash,
    outcome: Mined,
    effect: Effect,
    state: Arc<Mutex<ContractState>>,
}

impl NullPendingTransaction {
    fn receipt(&self, status: TxStatus) -> Receipt {
        Receipt {
            transaction_hash: self.hash,
            status,
            block_number: Some(1),
            error: None,
        }
    }
}

#[async_trait]
impl PendingTransaction for NullPendingTransaction {
    fn hash(&self) -> TxHash {
        self.hash
    }

    fn error(&self) -> Option<String> {
        match &self.outcome {
            Mined::Revert(error) => error.clone(),
            _ => None,
        }
    }

    async fn wait(&self) -> Result<Receipt, GatewayError> {
        match &self.outcome {
            Mined::Confirm => {
                self.state.lock().unwrap().apply(&self.effect);
                Ok(self.receipt(TxStatus::Success))
            }
            Mined::Revert(_) => Ok(self.receipt(TxStatus::Reverted(0))),
            Mined::Fail(message) => Err(GatewayError::Provider(ProviderError::Transport(
                message.clone(),
            ))),
            Mined::Never => std::future::pending().await,
        }
    }
}

/// Binds every request to one shared [`NullContract`].
pub struct NullGateway {
    contract: Arc<NullContract>,
    binds: Mutex<Vec<(Address, Address)>>,
}

impl NullGateway {
    pub fn new(contract: Arc<NullContract>) -> Self {
        Self {
            contract,
            binds: Mutex::new(Vec::new()),
        }
    }

    /// `(contract address, signing account)` of every bind so far.
    pub fn binds(&self) -> Vec<(Address, Address)> {
        self.binds.lock().unwrap().clone()
    }
}

impl ContractGateway for NullGateway {
    fn bind(
        &self,
        address: Address,
        abi: &JsonAbi,
        _library: &Library,
        account: Address,
    ) -> Result<Arc<dyn ElectionContract>, GatewayError> {
        ensure_election_interface(abi)?;
        self.binds.lock().unwrap().push((address, account));
        Ok(Arc::clone(&self.contract) as Arc<dyn ElectionContract>)
    }
}
