use crate::ProviderError;

use alloy_primitives::Bytes;
use alloy_rpc_client::RpcClient;
use spectre_primitives::Proof;

/// The prover method generating a compressed sync step proof.
pub const STEP_PROOF_METHOD: &str = "genEvmProof_SyncStepCompressed";

/// The prover method generating a compressed committee update proof.
pub const ROTATE_PROOF_METHOD: &str = "genEvmProof_CommitteeUpdateCompressed";

/// An implementation of the trait can generate light client proofs anchored at an execution
/// block.
#[async_trait::async_trait]
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait Prover: Sync + Send {
    /// Returns the sync step proof for the provided block.
    async fn step_proof(&self, block_number: u64) -> Result<Proof, ProviderError>;
    /// Returns the sync committee rotation proof for the provided block.
    async fn rotate_proof(&self, block_number: u64) -> Result<Proof, ProviderError>;
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ProofRequest {
    block_number: u64,
}

#[derive(Debug, serde::Deserialize)]
struct ProofResponse {
    proof: Bytes,
}

/// A [`Prover`] delegating proof generation to a remote prover over JSON RPC.
#[derive(Debug, Clone)]
pub struct RpcProver {
    /// The RPC client to the prover.
    client: RpcClient,
    /// The method called for step proofs.
    step_method: String,
    /// The method called for rotation proofs.
    rotate_method: String,
}

impl RpcProver {
    /// Returns a new [`RpcProver`] calling the default prover methods.
    pub fn new(client: RpcClient) -> Self {
        Self::with_methods(client, STEP_PROOF_METHOD.to_string(), ROTATE_PROOF_METHOD.to_string())
    }

    /// Returns a new [`RpcProver`] calling the provided prover methods.
    pub const fn with_methods(client: RpcClient, step_method: String, rotate_method: String) -> Self {
        Self { client, step_method, rotate_method }
    }

    async fn prove(&self, method: &str, block_number: u64) -> Result<Proof, ProviderError> {
        tracing::debug!(target: "spectre::providers", method, block_number, "requesting proof");
        let response: ProofResponse =
            self.client.request(method.to_string(), ProofRequest { block_number }).await?;
        Ok(response.proof.into())
    }
}

#[async_trait::async_trait]
impl Prover for RpcProver {
    async fn step_proof(&self, block_number: u64) -> Result<Proof, ProviderError> {
        self.prove(&self.step_method, block_number).await
    }

    async fn rotate_proof(&self, block_number: u64) -> Result<Proof, ProviderError> {
        self.prove(&self.rotate_method, block_number).await
    }
}
