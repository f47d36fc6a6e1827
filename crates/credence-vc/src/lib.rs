//! # credence-vc: Verifiable Credentials and Presentations
//!
//! The document layer of credence. Everything here operates on typed
//! documents and is free of shared state.
//!
//! - [`Credential`], [`DerivedCredential`], [`Presentation`] and [`Proof`]:
//!   the W3C data model, with unknown members preserved.
//! - [`IntegrityHasher`]: the `dataHash` content tag.
//! - [`SelectivePointerMap`] and [`SelectiveDisclosureDeriver`]: claim
//!   removal for selective disclosure.
//! - [`SigningSuite`] and [`Ed25519Suite`]: the signature scheme, with
//!   verification methods resolved through [`KeyResolver`].
//! - [`Issuer`] and [`Holder`]: issuance and presentation building.

pub mod credential;
pub mod did;
pub mod disclosure;
pub mod error;
pub mod holder;
pub mod integrity;
pub mod issuer;
pub mod presentation;
pub mod proof;
pub mod suite;

pub use credential::{
    Credential, DerivedCredential, TypeValue, BASE_CREDENTIAL_TYPE,
    SELECTIVE_DISCLOSURE_DERIVATION, W3C_CREDENTIALS_CONTEXT,
};
pub use did::{
    did_for_key, verification_method_for_key, DidKeyResolver, KeyResolver, StaticKeyResolver,
};
pub use disclosure::{
    SelectiveDisclosureDeriver, SelectivePointerMap, DERIVED_PROOF_VALUE_PREFIX, SUBJECT_POINTER_PREFIX,
};
pub use error::{DisclosureError, SuiteError, VcError};
pub use holder::{Holder, PresentOptions};
pub use integrity::{Document, IntegrityCheck, IntegrityHasher};
pub use issuer::Issuer;
pub use presentation::{Presentation, PRESENTATION_TYPE};
pub use proof::{Proof, ProofPurpose, ProofType};
pub use suite::{signing_input, Ed25519Suite, ProofOptions, SigningSuite, SuiteVerification};
