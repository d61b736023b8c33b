//! Contract resolution orchestration.
//!
//! # Architecture
//!
//! A single resolution runs through a fixed pipeline:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     ContractResolver                          │
//! │                                                               │
//! │  1. RateLimiter::acquire        (shared token bucket)         │
//! │  2. ResultCache lookup          (fresh entry → return)        │
//! │  3. IndexService::query_domain  (no domain/resolver → None)   │
//! │  4. ChainService capabilities   (per-field fallback)          │
//! │  5. ChainService resolve_address (no address → None)          │
//! │  6. ChainService is_contract    (no bytecode → None)          │
//! │  7. metadata + verification     (per-field fallback)          │
//! │  8. cache write, metrics, resolution-complete event           │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Batches reuse the same pipeline per name, one chunk at a time.

mod batch;
mod contract_resolver;
mod verifier;

#[cfg(test)]
pub(crate) mod testing;

pub use contract_resolver::ContractResolver;
pub use verifier::{ContractVerifier, UnverifiedContracts};
