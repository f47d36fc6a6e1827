//! # Selective Disclosure
//!
//! Produces a reduced-claim copy of a credential by removing named claims
//! from `credentialSubject`.
//!
//! ## Pointer Vocabulary
//!
//! Claim names are mapped to JSON pointers by a [`SelectivePointerMap`]. The
//! map is deployment vocabulary, not derived from data: the default
//! [`SelectivePointerMap::university`] table covers academic credentials.
//! Every pointer must start with `/credentialSubject/`. Compound claims are
//! addressed per property, so hiding `degree` removes only
//! `/credentialSubject/degree/name` and keeps `degree.type`.
//!
//! ## Limitations
//!
//! Derivation is field removal, not a cryptographic selective-disclosure
//! proof. The derived document carries a reference to the original proof
//! value rather than a new signature, and its `dataHash` is recomputed so
//! the integrity check holds for honest derivations only.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value};

use credence_core::Timestamp;

use crate::credential::{Credential, DerivedCredential, SELECTIVE_DISCLOSURE_DERIVATION};
use crate::error::DisclosureError;
use crate::integrity::IntegrityHasher;
use crate::proof::{Proof, ProofPurpose};

/// Prefix every disclosure pointer must carry.
pub const SUBJECT_POINTER_PREFIX: &str = "/credentialSubject/";

/// Prefix of the proof value reference written into derived proofs.
pub const DERIVED_PROOF_VALUE_PREFIX: &str = "derived:";

const PROOF_VALUE_REFERENCE_LEN: usize = 16;

/// Semantic claim name to JSON pointer table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectivePointerMap {
    entries: BTreeMap<String, String>,
}

impl SelectivePointerMap {
    /// Vocabulary for university degree credentials.
    pub fn university() -> Self {
        let entries = [
            ("name", "/credentialSubject/name"),
            ("gpa", "/credentialSubject/gpa"),
            ("university", "/credentialSubject/university"),
            ("degree", "/credentialSubject/degree/name"),
            ("degreeType", "/credentialSubject/degree/type"),
            ("graduationDate", "/credentialSubject/graduationDate"),
            ("studentId", "/credentialSubject/studentId"),
            ("email", "/credentialSubject/email"),
            ("dateOfBirth", "/credentialSubject/dateOfBirth"),
        ];
        Self {
            entries: entries
                .into_iter()
                .map(|(name, pointer)| (name.to_string(), pointer.to_string()))
                .collect(),
        }
    }

    /// A custom vocabulary. Fails if any pointer leaves `credentialSubject`.
    pub fn from_entries<I, K, V>(entries: I) -> Result<Self, DisclosureError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = BTreeMap::new();
        for (name, pointer) in entries {
            let (name, pointer) = (name.into(), pointer.into());
            let rest = pointer.strip_prefix(SUBJECT_POINTER_PREFIX).unwrap_or_default();
            if rest.is_empty() || rest.split('/').any(str::is_empty) {
                return Err(DisclosureError::InvalidPointer { name, pointer });
            }
            map.insert(name, pointer);
        }
        Ok(Self { entries: map })
    }

    /// The pointer for `name`, if the vocabulary knows it.
    pub fn pointer(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Known names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// `(name, pointer)` pairs in name order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Pointers for `names`, in input order. Unknown names are skipped with
    /// a warning.
    pub fn generate_pointers<S: AsRef<str>>(&self, names: &[S]) -> Vec<String> {
        names
            .iter()
            .filter_map(|name| {
                let name = name.as_ref();
                let pointer = self.pointer(name);
                if pointer.is_none() {
                    tracing::warn!(field = name, "unknown selective disclosure field, skipping");
                }
                pointer.map(str::to_string)
            })
            .collect()
    }

    /// The value `name` points to inside `subject`, if present.
    pub fn resolve<'a>(&self, name: &str, subject: &'a Map<String, Value>) -> Option<&'a Value> {
        let tokens = subject_tokens(self.pointer(name)?)?;
        let (first, rest) = tokens.split_first()?;
        rest.iter()
            .try_fold(subject.get(first)?, |node, token| step(node, token))
    }
}

impl Default for SelectivePointerMap {
    fn default() -> Self {
        Self::university()
    }
}

/// Derives reduced-claim credentials.
#[derive(Debug, Clone, Default)]
pub struct SelectiveDisclosureDeriver {
    pointers: SelectivePointerMap,
}

impl SelectiveDisclosureDeriver {
    pub fn new(pointers: SelectivePointerMap) -> Self {
        Self { pointers }
    }

    pub fn pointers(&self) -> &SelectivePointerMap {
        &self.pointers
    }

    /// Derive a copy of `credential` without the claims named in `hide`.
    pub fn derive<I, S>(&self, credential: &Credential, hide: I) -> Result<DerivedCredential, DisclosureError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.derive_at(credential, hide, Timestamp::now())
    }

    /// As [`derive`](Self::derive), with the derivation time supplied.
    ///
    /// Unknown names in `hide` are ignored. `_hiddenFields` lists the names
    /// whose claim was actually removed, merged with those hidden by any
    /// earlier derivation.
    pub fn derive_at<I, S>(
        &self,
        credential: &Credential,
        hide: I,
        now: Timestamp,
    ) -> Result<DerivedCredential, DisclosureError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if credential.credential_subject.is_none() {
            return Err(DisclosureError::MissingSubject {
                credential_id: credential.display_id().to_string(),
            });
        }
        let source_id = credential
            .id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(DisclosureError::MissingId)?;
        let origin = credential.derived_from.as_deref().unwrap_or(source_id).to_string();

        let requested: BTreeSet<String> = hide.into_iter().map(|s| s.as_ref().to_string()).collect();

        let mut derived = credential.clone();
        let mut hidden: BTreeSet<String> =
            credential.hidden_fields.iter().flatten().cloned().collect();
        if let Some(subject) = derived.credential_subject.as_mut() {
            for name in &requested {
                let Some(pointer) = self.pointers.pointer(name) else {
                    tracing::warn!(field = %name, "unknown selective disclosure field, ignoring");
                    continue;
                };
                if remove_claim(subject, pointer) {
                    hidden.insert(name.clone());
                } else {
                    tracing::debug!(field = %name, pointer, "claim not present, nothing to hide");
                }
            }
        }

        derived.id = Some(format!(
            "{origin}#derived-{}",
            now.as_datetime().timestamp_millis()
        ));
        derived.derived_from = Some(origin);
        derived.hidden_fields = Some(hidden.into_iter().collect());
        derived.derivation_type = Some(SELECTIVE_DISCLOSURE_DERIVATION.to_string());
        derived.proof = Some(derived_proof(credential.proof.as_ref(), now));

        let hash = IntegrityHasher::hash(&derived)?;
        if let Some(proof) = derived.proof.as_mut() {
            proof.data_hash = Some(hash);
        }

        tracing::debug!(
            source = source_id,
            derived = derived.display_id(),
            hidden = ?derived.hidden_fields,
            "derived selective disclosure credential"
        );
        Ok(DerivedCredential::new_unchecked(derived))
    }
}

fn derived_proof(original: Option<&Proof>, now: Timestamp) -> Proof {
    let mut proof = original.cloned().unwrap_or_default();
    proof.proof_purpose = Some(ProofPurpose::SelectiveDisclosure.to_string());
    proof.created = Some(now.to_iso8601());
    proof.proof_value = proof.proof_value.map(|value| {
        if value.starts_with(DERIVED_PROOF_VALUE_PREFIX) {
            value
        } else {
            let head: String = value.chars().take(PROOF_VALUE_REFERENCE_LEN).collect();
            format!("{DERIVED_PROOF_VALUE_PREFIX}{head}")
        }
    });
    proof.data_hash = None;
    proof
}

/// Unescaped reference tokens below `/credentialSubject/`.
fn subject_tokens(pointer: &str) -> Option<Vec<String>> {
    let rest = pointer.strip_prefix(SUBJECT_POINTER_PREFIX)?;
    Some(
        rest.split('/')
            .map(|t| t.replace("~1", "/").replace("~0", "~"))
            .collect(),
    )
}

fn step<'a>(node: &'a Value, token: &str) -> Option<&'a Value> {
    match node {
        Value::Object(map) => map.get(token),
        Value::Array(items) => items.get(token.parse::<usize>().ok()?),
        _ => None,
    }
}

fn step_mut<'a>(node: &'a mut Value, token: &str) -> Option<&'a mut Value> {
    match node {
        Value::Object(map) => map.get_mut(token),
        Value::Array(items) => items.get_mut(token.parse::<usize>().ok()?),
        _ => None,
    }
}

/// Remove the claim at `pointer`; `false` when nothing was there.
fn remove_claim(subject: &mut Map<String, Value>, pointer: &str) -> bool {
    let Some(tokens) = subject_tokens(pointer) else {
        return false;
    };
    let Some((last, parents)) = tokens.split_last() else {
        return false;
    };
    let Some((first, middle)) = parents.split_first() else {
        return subject.remove(last).is_some();
    };
    let parent = subject
        .get_mut(first)
        .and_then(|node| middle.iter().try_fold(node, |node, token| step_mut(node, token)));
    match parent {
        Some(Value::Object(map)) => map.remove(last).is_some(),
        Some(Value::Array(items)) => match last.parse::<usize>() {
            Ok(index) if index < items.len() => {
                items.remove(index);
                true
            }
            _ => false,
        },
        _ => false,
    }
}
