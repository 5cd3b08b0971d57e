//! Parties, leaders and per-state results of the on-chain election.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A party the contract tracks seats for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Party {
    /// Contract id 1 (Biden).
    A,
    /// Contract id 2 (Trump).
    B,
}

impl Party {
    pub const ALL: [Party; 2] = [Party::A, Party::B];

    /// The identifier the contract uses for this party.
    pub fn id(&self) -> u8 {
        match self {
            Self::A => 1,
            Self::B => 2,
        }
    }

    /// The candidate standing for this party.
    pub fn candidate(&self) -> &'static str {
        match self {
            Self::A => "Biden",
            Self::B => "Trump",
        }
    }
}

/// The current leader as reported by the contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Leader {
    Nobody,
    PartyA,
    PartyB,
}

impl Leader {
    /// Map a contract-returned leader id to a label.
    ///
    /// Anything other than 1 or 2 (a tie reported as 0, or a malformed value)
    /// is `Nobody`.
    pub fn from_id(id: u64) -> Self {
        match id {
            1 => Self::PartyA,
            2 => Self::PartyB,
            _ => Self::Nobody,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nobody => "NOBODY",
            Self::PartyA => "PARTY_A",
            Self::PartyB => "PARTY_B",
        }
    }

    pub fn party(&self) -> Option<Party> {
        match self {
            Self::Nobody => None,
            Self::PartyA => Some(Party::A),
            Self::PartyB => Some(Party::B),
        }
    }
}

impl fmt::Display for Leader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One state's result, as submitted to `submitStateResult`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateResult {
    pub name: String,
    pub votes_a: u64,
    pub votes_b: u64,
    pub seats: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leader_labels() {
        assert_eq!(Leader::from_id(1).as_str(), "PARTY_A");
        assert_eq!(Leader::from_id(2).as_str(), "PARTY_B");
        assert_eq!(Leader::from_id(0).as_str(), "NOBODY");
        assert_eq!(Leader::from_id(5).as_str(), "NOBODY");
    }

    #[test]
    fn party_ids_match_leader_ids() {
        for party in Party::ALL {
            assert_eq!(Leader::from_id(party.id() as u64).party(), Some(party));
        }
        assert_eq!(Leader::Nobody.party(), None);
    }
}
