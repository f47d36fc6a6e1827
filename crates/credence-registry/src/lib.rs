//! # credence-registry: Revocation State
//!
//! The process-wide revocation registry and the per-credential lookup the
//! presentation verifier consults. The registry is injected as an
//! `Arc<dyn RevocationStore>`, so tests build isolated instances and a
//! persistent backend can replace [`InMemoryRevocationRegistry`].

pub mod lookup;
pub mod revocation;

pub use lookup::{IssuerRevocationLookup, RegistryRevocationLookup, RevocationLookup};
pub use revocation::{
    InMemoryRevocationRegistry, RevocationError, RevocationRecord, RevocationRequest,
    RevocationStatus, RevocationStore, DEFAULT_REASON, DEFAULT_REVOKED_BY,
};
