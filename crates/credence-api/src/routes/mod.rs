//! # API Route Modules
//!
//! - `credentials`: issuance with the service key, selective-disclosure
//!   derivation.
//! - `disclosure`: field name to JSON pointer resolution.
//! - `presentations`: presentation building and verification.
//! - `revocations`: the revocation registry.
//! - `verifications`: the verification history.

pub mod credentials;
pub mod disclosure;
pub mod presentations;
pub mod revocations;
pub mod verifications;
