use alloy_primitives::Bytes;

/// An opaque proof artifact returned by the prover.
#[derive(
    Debug,
    Default,
    Clone,
    PartialEq,
    Eq,
    derive_more::Deref,
    derive_more::From,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct Proof(pub Bytes);

/// The payload of a sync committee rotation message.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotateData {
    /// The execution block the proofs are anchored at.
    pub block_number: u64,
    /// The proof for the light client step at the anchor block.
    pub step_proof: Proof,
    /// The proof for the sync committee rotation.
    pub rotate_proof: Proof,
}
