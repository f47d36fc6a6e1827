//! # Disclosure Analysis
//!
//! Informational report of which claims a presentation reveals and which
//! were hidden by selective disclosure. Never affects `verified`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use credence_vc::{Credential, SelectivePointerMap, SUBJECT_POINTER_PREFIX};

/// How much of the origin claims a presentation withholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyLevel {
    /// At least one claim is hidden.
    High,
    /// Nothing is hidden.
    Low,
}

/// Disclosure of one embedded credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialDisclosure {
    pub credential_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub derived_from: Option<String>,
    pub revealed_fields: Vec<String>,
    pub hidden_fields: Vec<String>,
    pub privacy_level: PrivacyLevel,
}

/// Disclosure of a whole presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisclosureReport {
    /// Union over all credentials, sorted.
    pub revealed_fields: Vec<String>,
    /// Union over all credentials, sorted.
    pub hidden_fields: Vec<String>,
    pub privacy_level: PrivacyLevel,
    pub credentials: Vec<CredentialDisclosure>,
}

/// Analyse the embedded credentials against a pointer vocabulary.
pub fn analyze_disclosure(credentials: &[Credential], pointers: &SelectivePointerMap) -> DisclosureReport {
    let per_credential: Vec<CredentialDisclosure> = credentials
        .iter()
        .map(|credential| analyze_credential(credential, pointers))
        .collect();

    let revealed: BTreeSet<&String> = per_credential.iter().flat_map(|c| &c.revealed_fields).collect();
    let hidden: BTreeSet<&String> = per_credential.iter().flat_map(|c| &c.hidden_fields).collect();
    DisclosureReport {
        revealed_fields: revealed.into_iter().cloned().collect(),
        privacy_level: level(!hidden.is_empty()),
        hidden_fields: hidden.into_iter().cloned().collect(),
        credentials: per_credential,
    }
}

fn analyze_credential(credential: &Credential, pointers: &SelectivePointerMap) -> CredentialDisclosure {
    let empty = serde_json::Map::new();
    let subject = credential.credential_subject.as_ref().unwrap_or(&empty);

    // Top-level claims owned by some vocabulary entry.
    let covered: BTreeSet<&str> = pointers
        .entries()
        .filter_map(|(_, pointer)| pointer.strip_prefix(SUBJECT_POINTER_PREFIX))
        .filter_map(|rest| rest.split('/').next())
        .collect();

    let mut revealed: BTreeSet<String> = pointers
        .names()
        .filter(|name| pointers.resolve(name, subject).is_some())
        .map(str::to_string)
        .collect();
    revealed.extend(
        subject
            .keys()
            .filter(|key| key.as_str() != "id" && !covered.contains(key.as_str()))
            .cloned(),
    );

    let hidden: Vec<String> = match &credential.hidden_fields {
        Some(fields) => {
            let set: BTreeSet<&String> = fields.iter().collect();
            set.into_iter().cloned().collect()
        }
        None if credential.is_derived() => pointers
            .names()
            .filter(|name| pointers.resolve(name, subject).is_none())
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    };

    CredentialDisclosure {
        credential_id: credential.id.clone(),
        derived_from: credential.derived_from.clone(),
        revealed_fields: revealed.into_iter().collect(),
        privacy_level: level(!hidden.is_empty()),
        hidden_fields: hidden,
    }
}

fn level(any_hidden: bool) -> PrivacyLevel {
    if any_hidden {
        PrivacyLevel::High
    } else {
        PrivacyLevel::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credence_vc::SelectiveDisclosureDeriver;
    use serde_json::json;

    fn degree() -> Credential {
        Credential::from_value(json!({
            "id": "deg-1",
            "credentialSubject": {
                "id": "sub-1",
                "name": "Bo",
                "gpa": "3.9",
                "degree": {"name": "BSc", "type": "BachelorDegree"},
                "favouriteColour": "green"
            }
        }))
        .unwrap()
    }

    #[test]
    fn full_credential_is_low_privacy() {
        let report = analyze_disclosure(&[degree()], &SelectivePointerMap::university());
        assert_eq!(report.privacy_level, PrivacyLevel::Low);
        assert_eq!(
            report.revealed_fields,
            ["degree", "degreeType", "favouriteColour", "gpa", "name"]
        );
        assert!(report.hidden_fields.is_empty());
    }

    #[test]
    fn derived_credential_reports_hidden_fields() {
        let derived = SelectiveDisclosureDeriver::default()
            .derive(&degree(), ["gpa", "degree"])
            .unwrap()
            .into_credential();
        let report = analyze_disclosure(&[derived], &SelectivePointerMap::university());
        assert_eq!(report.privacy_level, PrivacyLevel::High);
        assert_eq!(report.hidden_fields, ["degree", "gpa"]);
        assert_eq!(report.revealed_fields, ["degreeType", "favouriteColour", "name"]);
        assert_eq!(report.credentials[0].derived_from.as_deref(), Some("deg-1"));
    }

    #[test]
    fn derived_without_hidden_list_falls_back_to_vocabulary() {
        let mut cred = degree();
        cred.derived_from = Some("deg-0".to_string());
        let report = analyze_disclosure(&[cred], &SelectivePointerMap::university());
        assert!(report.hidden_fields.contains(&"email".to_string()));
        assert!(!report.hidden_fields.contains(&"gpa".to_string()));
        assert_eq!(report.privacy_level, PrivacyLevel::High);
    }

    #[test]
    fn privacy_level_serializes_lowercase() {
        assert_eq!(serde_json::to_value(PrivacyLevel::High).unwrap(), "high");
    }
}
