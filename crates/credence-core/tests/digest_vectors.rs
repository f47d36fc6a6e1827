//! # Digest Test Vectors
//!
//! Fixed inputs with digests computed independently (`printf ... | sha256sum`
//! over the expected canonical text). If these drift, every `dataHash`
//! embedded in previously issued credentials stops matching.

use credence_core::{sha256_hex, CanonicalBytes};

fn digest_of(text: &str) -> (String, String) {
    let value: serde_json::Value = serde_json::from_str(text).expect("vector must be JSON");
    let cb = CanonicalBytes::from_value(&value).expect("canonicalization should succeed");
    (cb.as_str().to_string(), sha256_hex(&cb))
}

#[test]
fn nested_document_vector() {
    let (canonical, hex) = digest_of(r#"{ "c": {"d": "e"}, "b": [2, 3], "a": 1 }"#);
    assert_eq!(canonical, r#"{"a":1,"b":[2,3],"c":{"d":"e"}}"#);
    assert_eq!(
        hex,
        "4dca5a8a351af87a554c4c336e344488839c2ce58b7bd3d808b78b64e8810ffc"
    );
}

#[test]
fn credential_body_vector() {
    let (canonical, hex) = digest_of(
        r#"{
            "type": ["VerifiableCredential", "X"],
            "issuer": "iss",
            "id": "cred-1",
            "issuanceDate": "2024-01-01T00:00:00Z",
            "credentialSubject": {"name": "Ann", "id": "sub-1", "gpa": "18"}
        }"#,
    );
    assert_eq!(
        canonical,
        r#"{"credentialSubject":{"gpa":"18","id":"sub-1","name":"Ann"},"id":"cred-1","issuanceDate":"2024-01-01T00:00:00Z","issuer":"iss","type":["VerifiableCredential","X"]}"#
    );
    assert_eq!(
        hex,
        "f461d4223138c90a333cee75319bc5ced728323eb74895d5a969f91f8099355c"
    );
}

#[test]
fn empty_object_vector() {
    let (_, hex) = digest_of("{}");
    assert_eq!(
        hex,
        "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
    );
}
