//! The `USElection` contract binding and its interface check.

use alloy::json_abi::JsonAbi;
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::GatewayError;

sol!(
    #[sol(rpc)]
    #[derive(Debug)]
    USElection,
    "abi/USElection.json"
);

const US_ELECTION_ABI: &str = include_str!("../abi/USElection.json");

/// Functions the election client calls, with the selectors of the generated
/// binding. [`ContractGateway::bind`](crate::ContractGateway::bind) refuses an
/// ABI that lacks any of them.
pub const ELECTION_FUNCTIONS: [(&str, [u8; 4]); 5] = [
    ("currentLeader", USElection::currentLeaderCall::SELECTOR),
    ("seats", USElection::seatsCall::SELECTOR),
    ("electionEnded", USElection::electionEndedCall::SELECTOR),
    ("submitStateResult", USElection::submitStateResultCall::SELECTOR),
    ("endElection", USElection::endElectionCall::SELECTOR),
];

/// The bundled `USElection` interface.
pub fn us_election_abi() -> JsonAbi {
    serde_json::from_str(US_ELECTION_ABI).expect("bundled USElection ABI is valid JSON")
}

/// Check every function the election client calls is present with the
/// signature the binding encodes.
pub fn ensure_election_interface(abi: &JsonAbi) -> Result<(), GatewayError> {
    for (name, selector) in ELECTION_FUNCTIONS {
        let overloads = abi
            .function(name)
            .ok_or_else(|| GatewayError::MissingFunction(name.to_string()))?;
        if !overloads.iter().any(|f| f.selector().0 == selector) {
            return Err(GatewayError::InvalidAbi(format!(
                "{name} does not match the election contract signature"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ERC20_FRAGMENT: &str = r#"[
        {"type":"function","name":"transfer","stateMutability":"nonpayable",
         "inputs":[{"name":"to","type":"address"},{"name":"amount","type":"uint256"}],
         "outputs":[{"name":"","type":"bool"}]}
    ]"#;

    #[test]
    fn tuple_signature_is_expanded() {
        let abi = us_election_abi();
        assert_eq!(
            abi.function("submitStateResult").unwrap()[0].signature(),
            "submitStateResult((string,uint256,uint256,uint8))"
        );
        assert_eq!(abi.function("seats").unwrap()[0].signature(), "seats(uint8)");
    }

    #[test]
    fn bundled_abi_has_election_interface() {
        ensure_election_interface(&us_election_abi()).unwrap();
    }

    #[test]
    fn events_are_not_functions() {
        let abi = us_election_abi();
        assert!(abi.function("LogStateResult").is_none());
        assert!(abi.event("LogStateResult").is_some());
    }

    #[test]
    fn missing_function_fails_interface_check() {
        let abi: JsonAbi = serde_json::from_str(ERC20_FRAGMENT).unwrap();
        assert!(matches!(
            ensure_election_interface(&abi),
            Err(GatewayError::MissingFunction(name)) if name == "currentLeader"
        ));
    }

    #[test]
    fn mismatched_signature_fails_interface_check() {
        let mut abi = us_election_abi();
        let seats = abi.functions.get_mut("seats").unwrap();
        seats[0].inputs[0].ty = "uint256".into();
        assert!(matches!(
            ensure_election_interface(&abi),
            Err(GatewayError::InvalidAbi(message)) if message.starts_with("seats")
        ));
    }
}
