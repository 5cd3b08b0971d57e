//! Election contract calls over Ethereum JSON-RPC.

use std::sync::Arc;

use alloy::json_abi::JsonAbi;
use alloy::network::{Ethereum, ReceiptResponse};
use alloy::primitives::U256;
use alloy::providers::{DynProvider, PendingTransactionBuilder, RootProvider};
use async_trait::async_trait;
use elect_provider::Library;
use elect_types::{Address, Party, Receipt, StateResult, TxHash, TxStatus};

use crate::abi::USElection::{self, USElectionInstance};
use crate::{
    ensure_election_interface, ContractGateway, ElectionContract, GatewayError, PendingTransaction,
};

/// Gateway producing [`JsonRpcElectionContract`] handles.
#[derive(Clone, Debug, Default)]
pub struct JsonRpcGateway;

impl JsonRpcGateway {
    pub fn new() -> Self {
        Self
    }
}

impl ContractGateway for JsonRpcGateway {
    fn bind(
        &self,
        address: Address,
        abi: &JsonAbi,
        library: &Library,
        account: Address,
    ) -> Result<Arc<dyn ElectionContract>, GatewayError> {
        ensure_election_interface(abi)?;
        let rpc = library.rpc()?;
        Ok(Arc::new(JsonRpcElectionContract {
            contract: USElection::new(address, rpc),
            account,
        }))
    }
}

/// The generated `USElection` binding, sending writes from one account.
pub struct JsonRpcElectionContract {
    contract: USElectionInstance<DynProvider>,
    account: Address,
}

impl JsonRpcElectionContract {
    fn pending(
        &self,
        function: &str,
        pending: PendingTransactionBuilder<Ethereum>,
    ) -> Box<dyn PendingTransaction> {
        let hash = *pending.tx_hash();
        tracing::debug!(function, hash = %hash, "transaction pending");
        Box::new(JsonRpcPendingTransaction {
            hash,
            root: pending.provider().clone(),
        })
    }
}

#[async_trait]
impl ElectionContract for JsonRpcElectionContract {
    async fn current_leader_id(&self) -> Result<u64, GatewayError> {
        let leader = self.contract.currentLeader().call().await?;
        Ok(u64::from(leader))
    }

    async fn seats_for(&self, party: Party) -> Result<u64, GatewayError> {
        let seats = self.contract.seats(party.id()).call().await?;
        Ok(u64::from(seats))
    }

    async fn has_ended(&self) -> Result<bool, GatewayError> {
        Ok(self.contract.electionEnded().call().await?)
    }

    async fn submit_state_result(
        &self,
        result: &StateResult,
    ) -> Result<Box<dyn PendingTransaction>, GatewayError> {
        let seats = u8::try_from(result.seats).map_err(|_| {
            GatewayError::InvalidArgument(format!("{} seats do not fit in uint8", result.seats))
        })?;
        let record = USElection::StateResult {
            name: result.name.clone(),
            votesBiden: U256::from(result.votes_a),
            votesTrump: U256::from(result.votes_b),
            stateSeats: seats,
        };
        let pending = self
            .contract
            .submitStateResult(record)
            .from(self.account)
            .send()
            .await?;
        Ok(self.pending("submitStateResult", pending))
    }

    async fn end_election(&self) -> Result<Box<dyn PendingTransaction>, GatewayError> {
        let pending = self.contract.endElection().from(self.account).send().await?;
        Ok(self.pending("endElection", pending))
    }
}

/// Waits on the node's receipt for a sent transaction.
pub struct JsonRpcPendingTransaction {
    hash: TxHash,
    root: RootProvider,
}

#[async_trait]
impl PendingTransaction for JsonRpcPendingTransaction {
    fn hash(&self) -> TxHash {
        self.hash
    }

    fn error(&self) -> Option<String> {
        None
    }

    async fn wait(&self) -> Result<Receipt, GatewayError> {
        let receipt = PendingTransactionBuilder::new(self.root.clone(), self.hash)
            .get_receipt()
            .await?;
        Ok(to_receipt(&receipt))
    }
}

/// Pre-Byzantium receipts carry no status; alloy reports those as failed.
fn to_receipt<R: ReceiptResponse>(receipt: &R) -> Receipt {
    Receipt {
        transaction_hash: receipt.transaction_hash(),
        status: TxStatus::from_code(u64::from(ReceiptResponse::status(receipt))),
        block_number: receipt.block_number(),
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::us_election_abi;
    use alloy::primitives::B256;
    use alloy::providers::{Provider, ProviderBuilder};
    use alloy::rpc::types::TransactionReceipt;
    use alloy::transports::mock::Asserter;
    use elect_provider::{EventReceiver, ProviderError, WalletProvider};
    use elect_types::ChainId;

    /// A wallet whose JSON-RPC endpoint answers from a queue of canned results.
    struct MockedWallet {
        rpc: Option<DynProvider>,
    }

    #[async_trait]
    impl WalletProvider for MockedWallet {
        fn name(&self) -> &str {
            "mocked"
        }

        fn selected_address(&self) -> Option<Address> {
            None
        }

        async fn accounts(&self) -> Result<Vec<Address>, ProviderError> {
            Ok(Vec::new())
        }

        async fn chain_id(&self) -> Result<ChainId, ProviderError> {
            Ok(ChainId::new(1337))
        }

        fn rpc(&self) -> Option<DynProvider> {
            self.rpc.clone()
        }

        fn subscribe(&self) -> Option<EventReceiver> {
            None
        }
    }

    fn mocked_library(asserter: &Asserter) -> Library {
        let rpc = ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect_mocked_client(asserter.clone())
            .erased();
        Library::new(Arc::new(MockedWallet { rpc: Some(rpc) }))
    }

    fn bind(library: &Library) -> Arc<dyn ElectionContract> {
        JsonRpcGateway::new()
            .bind(
                Address::repeat_byte(0xc0),
                &us_election_abi(),
                library,
                Address::repeat_byte(0xa1),
            )
            .unwrap()
    }

    #[tokio::test]
    async fn reads_decode_contract_values() {
        let asserter = Asserter::new();
        let contract = bind(&mocked_library(&asserter));

        asserter.push_success(&B256::with_last_byte(2));
        assert_eq!(contract.current_leader_id().await.unwrap(), 2);
        asserter.push_success(&B256::with_last_byte(214));
        assert_eq!(contract.seats_for(Party::B).await.unwrap(), 214);
        asserter.push_success(&B256::ZERO);
        assert!(!contract.has_ended().await.unwrap());
    }

    #[tokio::test]
    async fn submit_returns_the_pending_hash() {
        let asserter = Asserter::new();
        let contract = bind(&mocked_library(&asserter));
        let result = StateResult {
            name: "OH".into(),
            votes_a: 100,
            votes_b: 90,
            seats: 18,
        };

        asserter.push_success(&TxHash::repeat_byte(0x77));
        let pending = contract.submit_state_result(&result).await.unwrap();
        assert_eq!(pending.hash(), TxHash::repeat_byte(0x77));
        assert_eq!(pending.error(), None);
    }

    #[tokio::test]
    async fn wallet_rejection_keeps_its_code() {
        let asserter = Asserter::new();
        let contract = bind(&mocked_library(&asserter));

        asserter.push_failure_msg("User denied transaction signature");
        let err = match contract.end_election().await {
            Err(err) => err,
            Ok(_) => panic!("rejected transaction produced a hash"),
        };
        assert!(matches!(err, GatewayError::Provider(ProviderError::Rpc { .. })));
    }

    #[tokio::test]
    async fn oversized_seat_count_is_rejected_before_sending() {
        let asserter = Asserter::new();
        let contract = bind(&mocked_library(&asserter));
        let result = StateResult {
            name: "CA".into(),
            votes_a: 1,
            votes_b: 2,
            seats: 300,
        };
        let err = match contract.submit_state_result(&result).await {
            Err(err) => err,
            Ok(_) => panic!("oversized seat count was sent"),
        };
        assert!(matches!(err, GatewayError::InvalidArgument(_)));
    }

    #[test]
    fn reverted_receipt_maps_to_reverted_status() {
        let hash = TxHash::repeat_byte(0x77);
        let json = serde_json::json!({
            "type": "0x2",
            "status": "0x0",
            "cumulativeGasUsed": "0x5208",
            "logs": [],
            "logsBloom": format!("0x{}", "0".repeat(512)),
            "transactionHash": hash,
            "transactionIndex": "0x0",
            "blockHash": B256::repeat_byte(0x01),
            "blockNumber": "0x10",
            "gasUsed": "0x5208",
            "effectiveGasPrice": "0x1",
            "from": Address::repeat_byte(0xa1),
            "to": Address::repeat_byte(0xc0),
            "contractAddress": null
        });
        let raw: TransactionReceipt = serde_json::from_value(json).unwrap();
        let receipt = to_receipt(&raw);
        assert_eq!(receipt.transaction_hash, hash);
        assert_eq!(receipt.status, TxStatus::Reverted(0));
        assert_eq!(receipt.block_number, Some(16));
    }

    #[test]
    fn bind_rejects_incomplete_abi() {
        let library = mocked_library(&Asserter::new());
        let abi: JsonAbi = serde_json::from_str(
            r#"[{"type":"function","name":"currentLeader","inputs":[],"outputs":[{"name":"","type":"uint8"}],"stateMutability":"view"}]"#,
        )
        .unwrap();
        let result = JsonRpcGateway::new().bind(Address::ZERO, &abi, &library, Address::ZERO);
        assert!(matches!(result, Err(GatewayError::MissingFunction(_))));
    }

    #[test]
    fn bind_needs_a_json_rpc_endpoint() {
        let library = Library::new(Arc::new(MockedWallet { rpc: None }));
        let result =
            JsonRpcGateway::new().bind(Address::ZERO, &us_election_abi(), &library, Address::ZERO);
        assert!(matches!(
            result,
            Err(GatewayError::Provider(ProviderError::Unsupported(_)))
        ));
    }
}
