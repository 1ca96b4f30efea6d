//! Payload hash derivation.
//!
//! The payload hash is the content identity of a request: what is being
//! asked, of whom, with which inputs. Volatile envelope fields
//! (`request_id`, `timestamp`, `idempotency_key`, `payload_hash` itself)
//! are excluded, so resubmitting the same work under a new request id keeps
//! the same hash. It doubles as the idempotency key upstream.

use serde_json::{Map, Value};

use crate::errors::EnvelopeError;
use crate::validation::{parse_json, require_root, Validator};
use esrp_canonical::{canonicalize_value, hash_bytes};

/// Top-level request fields that participate in the payload hash.
///
/// Together with [`TARGET_FIELDS`] and [`INPUT_FIELDS`] these constants are
/// the whole policy: auditing or changing the hashed subset means reading or
/// editing them, not the hashing code. Everything else is volatile.
pub const PAYLOAD_FIELDS: &[&str] = &["target", "inputs", "params"];

/// The `target` subfields that participate in the payload hash.
pub const TARGET_FIELDS: &[&str] = &["service", "operation", "variant"];

/// The per-input subfields that participate in the payload hash.
pub const INPUT_FIELDS: &[&str] = &["name", "content_type", "data", "encoding", "metadata"];

impl Validator {
    /// Validates `text` as a request, then hashes its payload view.
    ///
    /// Deterministic: two structurally different texts with identical
    /// payload-relevant content produce the same 64-hex digest.
    ///
    /// # Errors
    ///
    /// Invalid JSON and validation failures as in
    /// [`Validator::validate_request`]; a float anywhere under
    /// [`PAYLOAD_FIELDS`] surfaces as a canonicalization error.
    pub fn derive_payload_hash(&self, text: &str) -> Result<String, EnvelopeError> {
        let value = parse_json(text)?;
        self.check_request(&value)?;
        let root = require_root(&value)?;
        Ok(hash_bytes(&canonicalize_value(&payload_view(root))?))
    }

    /// Recomputes the payload hash and compares it against the envelope's
    /// `payload_hash` field, ignoring ASCII case.
    ///
    /// Vacuously `true` when the field is absent: there is nothing to
    /// contradict.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Validator::derive_payload_hash`]; a mismatch
    /// is `Ok(false)`, not an error.
    pub fn verify_payload_hash(&self, text: &str) -> Result<bool, EnvelopeError> {
        let value = parse_json(text)?;
        self.check_request(&value)?;
        let root = require_root(&value)?;

        let Some(claimed) = root.get("payload_hash").and_then(Value::as_str) else {
            return Ok(true);
        };
        let computed = hash_bytes(&canonicalize_value(&payload_view(root))?);
        Ok(computed.eq_ignore_ascii_case(claimed))
    }
}

/// Derives the payload hash with the process-default validator.
///
/// # Errors
///
/// See [`Validator::derive_payload_hash`].
pub fn derive_payload_hash(text: &str) -> Result<String, EnvelopeError> {
    Validator::default().derive_payload_hash(text)
}

/// Verifies a request's claimed payload hash with the process-default
/// validator.
///
/// # Errors
///
/// See [`Validator::verify_payload_hash`].
pub fn verify_payload_hash(text: &str) -> Result<bool, EnvelopeError> {
    Validator::default().verify_payload_hash(text)
}

/// Assembles the hashed subset in its normalized form.
///
/// `target` and each input are projected to exactly their listed subfields,
/// with absent optionals (`variant`, `metadata`) contributing JSON `null`.
/// Unknown extra fields therefore never reach the hash, and a request with
/// `"variant": null` hashes the same as one without the field. `params` may
/// legitimately be absent and contributes `{}`. The remaining shapes were
/// proven by validation before this runs.
fn payload_view(root: &Map<String, Value>) -> Value {
    let mut payload = Map::new();

    let target = root.get("target").and_then(Value::as_object);
    payload.insert("target".to_string(), project(target, TARGET_FIELDS));

    let inputs: Vec<Value> = root
        .get("inputs")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| project(item.as_object(), INPUT_FIELDS))
                .collect()
        })
        .unwrap_or_default();
    payload.insert("inputs".to_string(), Value::Array(inputs));

    let params = root
        .get("params")
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()));
    payload.insert("params".to_string(), params);

    Value::Object(payload)
}

fn project(map: Option<&Map<String, Value>>, fields: &[&str]) -> Value {
    let mut out = Map::new();
    for &field in fields {
        let value = map
            .and_then(|m| m.get(field))
            .cloned()
            .unwrap_or(Value::Null);
        out.insert(field.to_string(), value);
    }
    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(request_id: &str, timestamp: &str, params: Value) -> String {
        json!({
            "esrp_version": "1.0",
            "request_id": request_id,
            "timestamp": timestamp,
            "caller": {"system": "orchestrator"},
            "target": {"service": "tts", "operation": "synthesize"},
            "inputs": [{
                "name": "text",
                "content_type": "text/plain",
                "data": "Hello",
                "encoding": "utf-8"
            }],
            "params": params
        })
        .to_string()
    }

    #[test]
    fn deterministic() {
        let text = request(
            "3e0170b8-7b36-4de3-b196-8ad5d7c5f8d4",
            "2026-01-01T00:00:00Z",
            json!({"voice": "en-US"}),
        );
        assert_eq!(
            derive_payload_hash(&text).unwrap(),
            derive_payload_hash(&text).unwrap()
        );
    }

    #[test]
    fn volatile_fields_do_not_affect_the_hash() {
        let a = request(
            "3e0170b8-7b36-4de3-b196-8ad5d7c5f8d4",
            "2026-01-01T00:00:00Z",
            json!({"voice": "en-US"}),
        );
        let b = request(
            "f3b9c0ac-9e54-44f3-9f3a-0d8f3f9a7c11",
            "2026-06-30T12:34:56Z",
            json!({"voice": "en-US"}),
        );
        assert_eq!(
            derive_payload_hash(&a).unwrap(),
            derive_payload_hash(&b).unwrap()
        );
    }

    #[test]
    fn params_change_changes_the_hash() {
        let a = request(
            "3e0170b8-7b36-4de3-b196-8ad5d7c5f8d4",
            "2026-01-01T00:00:00Z",
            json!({"voice": "en-US"}),
        );
        let b = request(
            "3e0170b8-7b36-4de3-b196-8ad5d7c5f8d4",
            "2026-01-01T00:00:00Z",
            json!({"voice": "en-GB"}),
        );
        assert_ne!(
            derive_payload_hash(&a).unwrap(),
            derive_payload_hash(&b).unwrap()
        );
    }

    #[test]
    fn params_key_order_is_irrelevant() {
        let a = request(
            "3e0170b8-7b36-4de3-b196-8ad5d7c5f8d4",
            "2026-01-01T00:00:00Z",
            json!({"a": 1, "z": 26}),
        );
        // Same params rendered in the opposite order via raw text.
        let b = a.replace(r#"{"a":1,"z":26}"#, r#"{"z":26,"a":1}"#);
        assert_ne!(a, b);
        assert_eq!(
            derive_payload_hash(&a).unwrap(),
            derive_payload_hash(&b).unwrap()
        );
    }

    #[test]
    fn float_in_params_is_a_canonicalization_error() {
        let text = request(
            "3e0170b8-7b36-4de3-b196-8ad5d7c5f8d4",
            "2026-01-01T00:00:00Z",
            json!({"temperature": 0.7}),
        );
        assert!(matches!(
            derive_payload_hash(&text).unwrap_err(),
            EnvelopeError::Canonical(_)
        ));
    }

    #[test]
    fn golden_digest_for_minimal_request() {
        // sha256 of the normalized payload view:
        // {"inputs":[{"content_type":"text/plain","data":"Hello","encoding":"utf-8",
        //  "metadata":null,"name":"text"}],"params":{"voice":"en-US"},
        //  "target":{"operation":"synthesize","service":"tts","variant":null}}
        let text = request(
            "3e0170b8-7b36-4de3-b196-8ad5d7c5f8d4",
            "2026-01-01T00:00:00Z",
            json!({"voice": "en-US"}),
        );
        assert_eq!(
            derive_payload_hash(&text).unwrap(),
            "dce042af749dbe3a4dfd643b6e01ab97d44a55aa0c804a9ed93486783e15b6c2"
        );
    }

    #[test]
    fn unknown_fields_inside_target_and_inputs_do_not_affect_the_hash() {
        let base = request(
            "3e0170b8-7b36-4de3-b196-8ad5d7c5f8d4",
            "2026-01-01T00:00:00Z",
            json!({"voice": "en-US"}),
        );
        let base_digest = derive_payload_hash(&base).unwrap();

        let mut value: Value = serde_json::from_str(&base).unwrap();
        value["target"]["x_future"] = json!(1);
        value["inputs"][0]["x_note"] = json!("ignored");
        assert_eq!(derive_payload_hash(&value.to_string()).unwrap(), base_digest);
    }

    #[test]
    fn absent_and_null_optionals_hash_identically() {
        let base = request(
            "3e0170b8-7b36-4de3-b196-8ad5d7c5f8d4",
            "2026-01-01T00:00:00Z",
            json!({"voice": "en-US"}),
        );
        let base_digest = derive_payload_hash(&base).unwrap();

        let mut value: Value = serde_json::from_str(&base).unwrap();
        value["target"]["variant"] = json!(null);
        value["inputs"][0]["metadata"] = json!(null);
        assert_eq!(derive_payload_hash(&value.to_string()).unwrap(), base_digest);

        // A present value still participates.
        value["target"]["variant"] = json!("fast");
        assert_ne!(derive_payload_hash(&value.to_string()).unwrap(), base_digest);
    }

    #[test]
    fn claimed_hash_round_trips() {
        let text = request(
            "3e0170b8-7b36-4de3-b196-8ad5d7c5f8d4",
            "2026-01-01T00:00:00Z",
            json!({"voice": "en-US"}),
        );
        let digest = derive_payload_hash(&text).unwrap();

        let mut value: Value = serde_json::from_str(&text).unwrap();
        value["payload_hash"] = json!(digest.to_uppercase());
        assert!(verify_payload_hash(&value.to_string()).unwrap());

        value["payload_hash"] = json!("0".repeat(64));
        assert!(!verify_payload_hash(&value.to_string()).unwrap());
    }

    #[test]
    fn absent_claim_is_vacuously_true() {
        let text = request(
            "3e0170b8-7b36-4de3-b196-8ad5d7c5f8d4",
            "2026-01-01T00:00:00Z",
            json!({}),
        );
        assert!(verify_payload_hash(&text).unwrap());
    }
}
