//! Observable session state.

use serde::Serialize;

use elect_types::{explorer_tx_url, Address, ChainId, Leader, Party, StateResult, TxHash};

use crate::SessionError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// Seat counts per party; `None` until first read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Seats {
    pub party_a: Option<u64>,
    pub party_b: Option<u64>,
}

impl Seats {
    pub fn get(&self, party: Party) -> Option<u64> {
        match party {
            Party::A => self.party_a,
            Party::B => self.party_b,
        }
    }
}

/// Projection of the contract's state, refreshed after every write.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ElectionView {
    pub current_leader: Option<Leader>,
    pub seats: Seats,
    pub election_ended: bool,
}

/// A field of the state-result form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKey {
    StateName,
    VotesPartyA,
    VotesPartyB,
    StateSeats,
}

impl FieldKey {
    /// Recognise a form input name. The candidate-named inputs
    /// (`name-of-state`, `votes-biden`, `votes-trump`) are accepted as
    /// aliases.
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "state-name" | "name-of-state" => Some(Self::StateName),
            "votes-party-a" | "votes-biden" => Some(Self::VotesPartyA),
            "votes-party-b" | "votes-trump" => Some(Self::VotesPartyB),
            "state-seats" => Some(Self::StateSeats),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StateName => "state-name",
            Self::VotesPartyA => "votes-party-a",
            Self::VotesPartyB => "votes-party-b",
            Self::StateSeats => "state-seats",
        }
    }
}

/// The state-result draft being entered in the form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PendingSubmission {
    pub state_name: Option<String>,
    pub votes_a: Option<u64>,
    pub votes_b: Option<u64>,
    pub state_seats: Option<u64>,
}

impl PendingSubmission {
    /// Set one field from raw input. Blank input clears the field; numeric
    /// fields that do not parse as a non-negative integer are cleared too,
    /// as a number input reports an empty value for invalid text.
    pub fn set(&mut self, key: FieldKey, value: &str) {
        let value = value.trim();
        match key {
            FieldKey::StateName => {
                self.state_name = (!value.is_empty()).then(|| value.to_string());
            }
            FieldKey::VotesPartyA => self.votes_a = value.parse().ok(),
            FieldKey::VotesPartyB => self.votes_b = value.parse().ok(),
            FieldKey::StateSeats => self.state_seats = value.parse().ok(),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Package the draft positionally for `submitStateResult`.
    pub fn to_state_result(&self) -> Result<StateResult, SessionError> {
        let mut missing = Vec::new();
        if self.state_name.is_none() {
            missing.push(FieldKey::StateName.as_str());
        }
        if self.votes_a.is_none() {
            missing.push(FieldKey::VotesPartyA.as_str());
        }
        if self.votes_b.is_none() {
            missing.push(FieldKey::VotesPartyB.as_str());
        }
        if self.state_seats.is_none() {
            missing.push(FieldKey::StateSeats.as_str());
        }

        match (&self.state_name, self.votes_a, self.votes_b, self.state_seats) {
            (Some(name), Some(votes_a), Some(votes_b), Some(seats)) => Ok(StateResult {
                name: name.clone(),
                votes_a,
                votes_b,
                seats,
            }),
            _ => Err(SessionError::IncompleteSubmission(missing)),
        }
    }
}

/// Everything the presentation layer renders.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionState {
    pub status: ConnectionStatus,
    /// Meaningful only while connected; the configured default otherwise.
    pub chain_id: ChainId,
    pub address: Option<Address>,
    /// True from the start of a bootstrap or write until it settles.
    pub fetching: bool,
    pub transaction_hash: Option<TxHash>,
    pub view: ElectionView,
    pub pending: PendingSubmission,
    pub last_error: Option<String>,
}

impl SessionState {
    pub fn initial(chain_id: ChainId) -> Self {
        Self {
            status: ConnectionStatus::Disconnected,
            chain_id,
            address: None,
            fetching: false,
            transaction_hash: None,
            view: ElectionView::default(),
            pending: PendingSubmission::default(),
            last_error: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Connected
    }

    /// Explorer link for the in-flight transaction.
    pub fn transaction_url(&self) -> Option<String> {
        self.transaction_hash
            .as_ref()
            .and_then(|hash| explorer_tx_url(self.chain_id, hash))
    }
}

/// How a write settled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TxOutcome {
    /// Mined with status 1.
    Confirmed(TxHash),
    /// Mined, but the contract did not apply the change.
    Reverted { hash: TxHash, error: String },
    /// Issuing the call or awaiting its receipt failed.
    Failed(String),
    /// Refused by the client before anything was sent.
    Rejected(String),
}

impl TxOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_keys_and_aliases() {
        assert_eq!(FieldKey::parse("state-name"), Some(FieldKey::StateName));
        assert_eq!(FieldKey::parse("name-of-state"), Some(FieldKey::StateName));
        assert_eq!(FieldKey::parse("votes-biden"), Some(FieldKey::VotesPartyA));
        assert_eq!(FieldKey::parse("votes-party-b"), Some(FieldKey::VotesPartyB));
        assert_eq!(FieldKey::parse("state-seats"), Some(FieldKey::StateSeats));
        assert_eq!(FieldKey::parse("favourite-colour"), None);
    }

    #[test]
    fn blank_and_invalid_input_clear_fields() {
        let mut draft = PendingSubmission::default();
        draft.set(FieldKey::StateName, "  OH ");
        draft.set(FieldKey::VotesPartyA, "100");
        assert_eq!(draft.state_name.as_deref(), Some("OH"));
        assert_eq!(draft.votes_a, Some(100));

        draft.set(FieldKey::StateName, "");
        draft.set(FieldKey::VotesPartyA, "-3");
        assert_eq!(draft.state_name, None);
        assert_eq!(draft.votes_a, None);
        assert!(draft.is_empty());
    }

    #[test]
    fn incomplete_draft_names_missing_fields() {
        let mut draft = PendingSubmission::default();
        draft.set(FieldKey::StateName, "OH");
        draft.set(FieldKey::StateSeats, "18");
        match draft.to_state_result() {
            Err(SessionError::IncompleteSubmission(missing)) => {
                assert_eq!(missing, vec!["votes-party-a", "votes-party-b"]);
            }
            other => panic!("expected incomplete submission, got {other:?}"),
        }
    }

    #[test]
    fn complete_draft_packages_positionally() {
        let mut draft = PendingSubmission::default();
        draft.set(FieldKey::StateName, "OH");
        draft.set(FieldKey::VotesPartyA, "100");
        draft.set(FieldKey::VotesPartyB, "90");
        draft.set(FieldKey::StateSeats, "18");
        assert_eq!(
            draft.to_state_result().unwrap(),
            StateResult {
                name: "OH".into(),
                votes_a: 100,
                votes_b: 90,
                seats: 18,
            }
        );
    }

    #[test]
    fn transaction_url_uses_chain_explorer() {
        let mut state = SessionState::initial(ChainId::new(42));
        assert_eq!(state.transaction_url(), None);
        state.transaction_hash = Some(TxHash::new([1; 32]));
        assert!(state
            .transaction_url()
            .unwrap()
            .starts_with("https://kovan.etherscan.io/tx/0x0101"));
    }
}
