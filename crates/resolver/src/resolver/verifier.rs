use async_trait::async_trait;

/// Source-verification lookup for a contract address.
///
/// Implementations typically ask a block explorer. Lookups are best-effort:
/// an unreachable backend reports the contract as unverified.
#[async_trait]
pub trait ContractVerifier: Send + Sync {
    async fn is_verified(&self, address: &str) -> bool;
}

/// Verifier that reports every contract as unverified.
#[derive(Clone, Debug, Default)]
pub struct UnverifiedContracts;

#[async_trait]
impl ContractVerifier for UnverifiedContracts {
    async fn is_verified(&self, _address: &str) -> bool {
        false
    }
}
