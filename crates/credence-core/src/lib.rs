//! # credence-core: Foundational Types
//!
//! Shared primitives for every other crate in the workspace.
//!
//! - [`CanonicalBytes`]: the sole construction path for bytes that are hashed
//!   or signed. Keys sorted at every level, arrays in order, compact output.
//! - [`ContentDigest`] and [`sha256_hex`]: SHA-256 over canonical bytes only.
//! - [`Timestamp`]: UTC instants with second precision and lenient ISO-8601
//!   ingestion for document date fields.
//! - Leaf error types used by the crates above.
//!
//! ## Crate Policy
//!
//! - No internal dependencies. Everything else depends on this crate.
//! - No I/O and no shared state.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod temporal;

pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, sha256_hex, ContentDigest};
pub use error::{CanonicalizationError, CryptoError, TimestampError};
pub use temporal::{parse_optional_date, Timestamp};
