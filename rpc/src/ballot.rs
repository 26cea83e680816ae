//! The ballot contract over JSON-RPC.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use ballot_core::{BallotReader, BallotWriter, ClientConfig, Confirmation, ContractTarget, RawError};
use ballot_types::{
    Address, ChainId, RawProposal, RawVoterRecord, SupportedChain, TxHash, B256, U256,
};

use crate::abi;
use crate::client::EthRpcClient;
use crate::error::RpcError;

/// One JSON-RPC client per supported chain, plus the confirmation policy.
pub struct BallotRpc {
    clients: HashMap<SupportedChain, EthRpcClient>,
    poll_interval: Duration,
    confirmation_timeout: Duration,
}

impl BallotRpc {
    pub fn from_config(config: &ClientConfig) -> Result<Self, RpcError> {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        let mut clients = HashMap::new();
        for chain in SupportedChain::ALL {
            clients.insert(chain, EthRpcClient::new(config.rpc.url(chain), timeout)?);
        }
        Ok(Self {
            clients,
            poll_interval: Duration::from_millis(config.receipt_poll_interval_ms),
            confirmation_timeout: Duration::from_secs(config.confirmation_timeout_secs),
        })
    }

    pub fn client(&self, chain: SupportedChain) -> Result<&EthRpcClient, RpcError> {
        self.clients
            .get(&chain)
            .ok_or_else(|| RpcError::NoEndpoint(chain.to_string()))
    }

    /// Chain id reported by the endpoint configured for `chain`.
    pub async fn chain_id(&self, chain: SupportedChain) -> Result<ChainId, RpcError> {
        self.client(chain)?.chain_id().await
    }

    /// First account the node can sign for on `chain`, if any.
    pub async fn default_account(&self, chain: SupportedChain) -> Result<Option<Address>, RpcError> {
        Ok(self.client(chain)?.accounts().await?.into_iter().next())
    }

    /// A read. A revert means the value does not exist.
    async fn view<T>(
        &self,
        target: &ContractTarget,
        signature: &str,
        args: &[B256],
        decode: fn(&[u8]) -> Result<Option<T>, RpcError>,
    ) -> Result<Option<T>, RawError> {
        let data = abi::encode_call(signature, args);
        match self.client(target.chain)?.call(target.address, &data).await {
            Ok(ret) => Ok(decode(&ret)?),
            Err(e) if e.is_revert() => {
                tracing::debug!(signature, error = %e, "read reverted, treating as absent");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn transact(
        &self,
        target: &ContractTarget,
        from: Address,
        signature: &str,
        arg: B256,
    ) -> Result<TxHash, RawError> {
        let data = abi::encode_call(signature, &[arg]);
        let tx_hash = self
            .client(target.chain)?
            .send_transaction(from, target.address, &data)
            .await?;
        tracing::info!(signature, %tx_hash, chain = %target.chain, "transaction sent");
        Ok(tx_hash)
    }

    /// Replay a failed transaction as a call to recover its revert reason.
    async fn revert_reason(&self, target: &ContractTarget, tx_hash: TxHash) -> RawError {
        let generic = RawError::new("Transaction reverted on chain.");
        let Ok(client) = self.client(target.chain) else {
            return generic;
        };
        let tx = match client
            .request("eth_getTransactionByHash", serde_json::json!([tx_hash]))
            .await
        {
            Ok(tx) => tx,
            Err(_) => return generic,
        };
        let (Some(from), Some(input)) = (tx.get("from").cloned(), tx.get("input").cloned()) else {
            return generic;
        };
        let params = serde_json::json!([
            { "from": from, "to": target.address, "data": input },
            tx.get("blockNumber").cloned().unwrap_or(serde_json::json!("latest")),
        ]);
        match client.request("eth_call", params).await {
            Err(e) if e.revert().is_some() => e.into(),
            _ => generic,
        }
    }
}

#[async_trait(?Send)]
impl BallotReader for BallotRpc {
    async fn read_proposal(
        &self,
        target: &ContractTarget,
        index: usize,
    ) -> Result<Option<RawProposal>, RawError> {
        self.view(
            target,
            abi::PROPOSALS,
            &[abi::uint_word(U256::from(index))],
            abi::decode_proposal,
        )
        .await
    }

    async fn read_voter_record(
        &self,
        target: &ContractTarget,
        voter: Address,
    ) -> Result<Option<RawVoterRecord>, RawError> {
        self.view(
            target,
            abi::VOTERS,
            &[abi::address_word(voter)],
            abi::decode_voter,
        )
        .await
    }

    async fn read_winner_name(&self, target: &ContractTarget) -> Result<Option<B256>, RawError> {
        self.view(target, abi::WINNER_NAME, &[], abi::decode_bytes32)
            .await
    }

    async fn read_chairperson(
        &self,
        target: &ContractTarget,
    ) -> Result<Option<Address>, RawError> {
        self.view(target, abi::CHAIRPERSON, &[], abi::decode_address)
            .await
    }
}

#[async_trait(?Send)]
impl BallotWriter for BallotRpc {
    async fn submit_vote(
        &self,
        target: &ContractTarget,
        from: Address,
        index: u64,
    ) -> Result<TxHash, RawError> {
        self.transact(target, from, abi::VOTE, abi::uint_word(U256::from(index)))
            .await
    }

    async fn submit_delegate(
        &self,
        target: &ContractTarget,
        from: Address,
        to: Address,
    ) -> Result<TxHash, RawError> {
        self.transact(target, from, abi::DELEGATE, abi::address_word(to))
            .await
    }

    async fn submit_grant_right(
        &self,
        target: &ContractTarget,
        from: Address,
        voter: Address,
    ) -> Result<TxHash, RawError> {
        self.transact(
            target,
            from,
            abi::GIVE_RIGHT_TO_VOTE,
            abi::address_word(voter),
        )
        .await
    }

    /// Poll for the receipt until it appears or the timeout elapses.
    ///
    /// Transport failures during the wait are retried. A node error ends it.
    async fn await_confirmation(
        &self,
        target: &ContractTarget,
        tx_hash: TxHash,
    ) -> Result<Confirmation, RawError> {
        let client = self.client(target.chain)?;
        let poll = async {
            loop {
                match client.transaction_receipt(tx_hash).await {
                    Ok(Some(receipt)) => return Ok::<_, RpcError>(receipt),
                    Ok(None) => tracing::trace!(%tx_hash, "receipt not available yet"),
                    Err(e) if e.is_transient() => {
                        tracing::debug!(%tx_hash, error = %e, "receipt poll failed, retrying");
                    }
                    Err(e) => return Err(e),
                }
                tokio::time::sleep(self.poll_interval).await;
            }
        };
        let receipt = tokio::time::timeout(self.confirmation_timeout, poll)
            .await
            .map_err(|_| RpcError::Timeout(tx_hash))??;

        if receipt.success {
            tracing::info!(%tx_hash, "transaction confirmed");
            Ok(Confirmation::succeeded())
        } else {
            tracing::warn!(%tx_hash, "transaction reverted");
            Ok(Confirmation::failed(self.revert_reason(target, tx_hash).await))
        }
    }
}
