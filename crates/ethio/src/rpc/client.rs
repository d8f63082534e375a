use alloy::{
    network::{Ethereum, EthereumWallet},
    primitives::{Address, B256, U256},
    providers::{
        fillers::{
            BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller,
            WalletFiller,
        },
        Identity, Provider, ProviderBuilder, RootProvider,
    },
    signers::local::PrivateKeySigner,
    sol,
    transports::http::{Client, Http},
};
use async_trait::async_trait;
use tracing::*;

use super::{
    error::{ClientError, ClientResult},
    traits::{Bridger, Reader},
    types::{ClaimParams, TransferSpec, TxReceipt},
};

sol! {
    #[sol(rpc)]
    interface AssetBridge {
        function bridgeAsset(
            uint32 destinationNetwork,
            address destinationAddress,
            uint256 amount,
            address token,
            bool forceUpdateGlobalExitRoot,
            bytes calldata permitData
        ) external payable;

        function claimAsset(
            bytes32[32] calldata smtProofLocalExitRoot,
            bytes32[32] calldata smtProofRollupExitRoot,
            uint256 depositCount,
            bytes32 mainnetExitRoot,
            bytes32 rollupExitRoot,
            uint32 originNetwork,
            address originTokenAddress,
            uint32 destinationNetwork,
            address destinationAddress,
            uint256 amount,
            bytes calldata metadata
        ) external;
    }
}

// alloy moment 💀
type HttpProvider = FillProvider<
    JoinFill<
        JoinFill<
            Identity,
            JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
        >,
        WalletFiller<EthereumWallet>,
    >,
    RootProvider<Http<Client>>,
    Http<Client>,
    Ethereum,
>;

/// An `async` client for one EVM chain and the bridge contract deployed on
/// it. Transactions are signed locally and sent over HTTP.
#[derive(Debug, Clone)]
pub struct EvmClient {
    provider: HttpProvider,
    bridge_address: Address,
    sender: Address,
}

impl EvmClient {
    /// Creates a new [`EvmClient`] for the given endpoint, bridge contract
    /// address and signing key.
    pub fn new(
        http_url: &str,
        bridge_address: Address,
        signer: PrivateKeySigner,
    ) -> ClientResult<Self> {
        let sender = signer.address();
        let wallet = EthereumWallet::from(signer);

        let provider = ProviderBuilder::new()
            .with_recommended_fillers()
            .wallet(wallet)
            .on_http(
                http_url
                    .parse()
                    .map_err(|e| ClientError::Config(format!("invalid endpoint url: {e}")))?,
            );

        trace!(url = %http_url, bridge = %bridge_address, "created evm client");

        Ok(Self {
            provider,
            bridge_address,
            sender,
        })
    }

    /// The address transactions are sent from.
    pub fn sender(&self) -> Address {
        self.sender
    }
}

#[async_trait]
impl Reader for EvmClient {
    async fn transaction_receipt(&self, txid: B256) -> ClientResult<Option<TxReceipt>> {
        let receipt = self
            .provider
            .get_transaction_receipt(txid)
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(receipt.map(|r| TxReceipt {
            txid: r.transaction_hash,
            block_number: r.block_number,
            success: r.status(),
        }))
    }

    async fn balance(&self, address: Address) -> ClientResult<U256> {
        self.provider
            .get_balance(address)
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))
    }
}

#[async_trait]
impl Bridger for EvmClient {
    async fn bridge_asset(&self, spec: &TransferSpec) -> ClientResult<B256> {
        let bridge = AssetBridge::new(self.bridge_address, self.provider.clone());

        let mut call = bridge.bridgeAsset(
            spec.dest_network,
            spec.dest_address,
            spec.amount,
            spec.token,
            true,
            spec.metadata.clone(),
        );
        // Bridging the native asset carries the amount as call value.
        if spec.token == Address::ZERO {
            call = call.value(spec.amount);
        }

        let pending = call
            .send()
            .await
            .map_err(|e| ClientError::Rpc(format!("bridgeAsset: {e}")))?;
        let txid = *pending.tx_hash();
        debug!(%txid, "submitted bridge deposit");
        Ok(txid)
    }

    async fn claim_asset(&self, claim: &ClaimParams) -> ClientResult<B256> {
        let bridge = AssetBridge::new(self.bridge_address, self.provider.clone());

        let call = bridge.claimAsset(
            claim.proof.local_path,
            claim.proof.rollup_path,
            U256::from(claim.deposit_cnt),
            claim.proof.main_exit_root,
            claim.proof.rollup_exit_root,
            claim.origin_network,
            claim.origin_token,
            claim.dest_network,
            claim.dest_address,
            claim.amount,
            claim.metadata.clone(),
        );

        let pending = call
            .send()
            .await
            .map_err(|e| ClientError::Rpc(format!("claimAsset: {e}")))?;
        let txid = *pending.tx_hash();
        debug!(%txid, deposit_cnt = %claim.deposit_cnt, "submitted manual claim");
        Ok(txid)
    }
}
