//! # Application State
//!
//! Configuration read from the environment and the shared state every
//! handler receives: the revocation registry, the service signing identity
//! (used both as issuer and as holder), and the presentation verifier with
//! its history.

use std::sync::Arc;

use thiserror::Error;

use credence_core::CryptoError;
use credence_crypto::Ed25519KeyPair;
use credence_registry::{InMemoryRevocationRegistry, RegistryRevocationLookup};
use credence_vc::{did_for_key, Ed25519Suite, Holder, Issuer, SelectivePointerMap};
use credence_verify::{
    PipelineConfig, PipelineConfigError, PresentationVerifier, VerificationPipeline, DEFAULT_EXPIRY_WARNING_DAYS,
    DEFAULT_PROOF_SKEW_SECS,
};

use crate::auth::SecretToken;

/// Environment variable holding the hex-encoded 32-byte service key seed.
pub const SIGNING_KEY_ENV: &str = "SERVICE_SIGNING_KEY_HEX";

/// Application configuration.
///
/// `Debug` redacts the auth token and the signing seed.
#[derive(Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Static bearer token. `None` disables authentication.
    pub auth_token: Option<SecretToken>,
    /// Seed for the service key; an ephemeral key is generated when absent.
    pub signing_key_hex: Option<SecretToken>,
    pub proof_skew_secs: i64,
    pub expiry_warning_days: i64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .field(
                "signing_key_hex",
                &self.signing_key_hex.as_ref().map(|_| "[REDACTED]"),
            )
            .field("proof_skew_secs", &self.proof_skew_secs)
            .field("expiry_warning_days", &self.expiry_warning_days)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            auth_token: None,
            signing_key_hex: None,
            proof_skew_secs: DEFAULT_PROOF_SKEW_SECS,
            expiry_warning_days: DEFAULT_EXPIRY_WARNING_DAYS,
        }
    }
}

/// Configuration or key material that cannot be used.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got {value:?}")]
    InvalidValue {
        var: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("SERVICE_SIGNING_KEY_HEX is not a valid Ed25519 seed: {0}")]
    SigningKey(#[source] CryptoError),
}

impl AppConfig {
    /// Read `PORT`, `AUTH_TOKEN`, `SERVICE_SIGNING_KEY_HEX`, `PROOF_SKEW_SECS`
    /// and `EXPIRY_WARNING_DAYS`. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let config = Self {
            port: parse_var::<u16>(&non_empty, "PORT", "a port number")?.unwrap_or(defaults.port),
            auth_token: non_empty("AUTH_TOKEN").map(SecretToken::new),
            signing_key_hex: non_empty(SIGNING_KEY_ENV).map(SecretToken::new),
            proof_skew_secs: parse_var::<i64>(&non_empty, "PROOF_SKEW_SECS", "a non-negative integer")?
                .unwrap_or(defaults.proof_skew_secs),
            expiry_warning_days: parse_var::<i64>(
                &non_empty,
                "EXPIRY_WARNING_DAYS",
                "a non-negative integer",
            )?
            .unwrap_or(defaults.expiry_warning_days),
        };
        config.pipeline_config()?;
        Ok(config)
    }

    /// Pipeline windows derived from the configured seconds and days.
    pub fn pipeline_config(&self) -> Result<PipelineConfig, ConfigError> {
        PipelineConfig::default()
            .with_proof_skew_secs(self.proof_skew_secs)
            .and_then(|c| c.with_expiry_warning_days(self.expiry_warning_days))
            .map_err(|e| match e {
                PipelineConfigError::ProofSkew(secs) => ConfigError::InvalidValue {
                    var: "PROOF_SKEW_SECS",
                    expected: "a non-negative number of seconds within range",
                    value: secs.to_string(),
                },
                PipelineConfigError::ExpiryWarning(days) => ConfigError::InvalidValue {
                    var: "EXPIRY_WARNING_DAYS",
                    expected: "a non-negative number of days within range",
                    value: days.to_string(),
                },
            })
    }
}

fn parse_var<T: std::str::FromStr + PartialOrd + Default>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    expected: &'static str,
) -> Result<Option<T>, ConfigError> {
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    match raw.trim().parse::<T>() {
        Ok(value) if value >= T::default() => Ok(Some(value)),
        _ => Err(ConfigError::InvalidValue {
            var,
            expected,
            value: raw,
        }),
    }
}

/// Load the service key from configuration, or generate an ephemeral one.
fn load_or_generate_signing_key(config: &AppConfig) -> Result<Ed25519KeyPair, ConfigError> {
    match &config.signing_key_hex {
        Some(hex) => Ed25519KeyPair::from_seed_hex(hex.expose().trim()).map_err(ConfigError::SigningKey),
        None => {
            tracing::warn!(
                "SERVICE_SIGNING_KEY_HEX not set, generating ephemeral key; \
                 credentials issued now will not verify against a restarted service"
            );
            Ok(Ed25519KeyPair::generate())
        }
    }
}

/// Shared application state. Cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    pub registry: Arc<InMemoryRevocationRegistry>,
    pub issuer: Arc<Issuer>,
    pub holder: Arc<Holder>,
    pub verifier: Arc<PresentationVerifier>,
    pub pointers: SelectivePointerMap,
    /// `did:credence:` identifier of the service key.
    pub service_did: String,
    pub config: AppConfig,
}

impl AppState {
    /// Default configuration with an ephemeral key.
    pub fn new() -> Self {
        Self::assemble(AppConfig::default(), PipelineConfig::default(), Ed25519KeyPair::generate())
    }

    /// Build state from `config`, loading or generating the service key.
    pub fn try_with_config(config: AppConfig) -> Result<Self, ConfigError> {
        let key = load_or_generate_signing_key(&config)?;
        Self::with_key(config, key)
    }

    pub fn with_key(config: AppConfig, key: Ed25519KeyPair) -> Result<Self, ConfigError> {
        let pipeline_config = config.pipeline_config()?;
        Ok(Self::assemble(config, pipeline_config, key))
    }

    fn assemble(config: AppConfig, pipeline_config: PipelineConfig, key: Ed25519KeyPair) -> Self {
        let service_did = did_for_key(&key.public_key());
        let signer = Arc::new(Ed25519Suite::new(key));
        let registry = Arc::new(InMemoryRevocationRegistry::new());
        let pointers = SelectivePointerMap::default();

        let pipeline = VerificationPipeline::new(registry.clone(), Arc::new(Ed25519Suite::verifier()))
            .with_config(pipeline_config);
        let verifier = PresentationVerifier::new(
            pipeline,
            Arc::new(RegistryRevocationLookup::new(registry.clone())),
        )
        .with_pointers(pointers.clone());

        tracing::info!(did = %service_did, "service identity ready");
        Self {
            registry,
            issuer: Arc::new(Issuer::new(signer.clone(), service_did.clone())),
            holder: Arc::new(Holder::new(signer, service_did.clone())),
            verifier: Arc::new(verifier),
            pointers,
            service_did,
            config,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
