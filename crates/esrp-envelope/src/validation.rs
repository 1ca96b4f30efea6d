//! Structural validation of ESRP envelopes.
//!
//! Validation is all-or-nothing: the input either satisfies every rule or
//! exactly one error is surfaced, naming the first offending field path in a
//! fixed documented order. A syntax error is reported as a distinct
//! invalid-JSON failure before any rule runs. Unknown fields are accepted
//! and ignored. Nothing is mutated and nothing is retried.
//!
//! Request rule order: `esrp_version` (format, then compatibility),
//! `request_id`, `timestamp`, `caller`, `target`, `inputs` (per element, in
//! order), `params`, then the optional `idempotency_key` / `payload_hash`
//! fields. Response rule order: `esrp_version`, `request_id`, `status`,
//! status-conditional `error` / `job`, then `artifacts`.

use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::envelope::{RequestEnvelope, ResponseEnvelope};
use crate::errors::EnvelopeError;
use crate::version::ProtocolVersion;
use esrp_workspace::{WorkspaceUri, WORKSPACE_URI_PREFIX};

const ENCODINGS: &[&str] = &["utf-8", "base64", "path"];
const STATUSES: &[&str] = &["succeeded", "failed", "accepted"];
const JOB_STATES: &[&str] = &["queued", "started", "succeeded", "failed", "cancelled"];

/// A violated envelope rule, carrying the offending field path.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is absent.
    #[error("{path} is missing")]
    MissingField {
        /// Path of the absent field.
        path: String,
    },
    /// A field holds the wrong JSON type.
    #[error("{path} must be a {expected}")]
    WrongType {
        /// Path of the field.
        path: String,
        /// The JSON type the rule requires.
        expected: &'static str,
    },
    /// A required string is empty.
    #[error("{path} must not be empty")]
    Empty {
        /// Path of the empty field.
        path: String,
    },
    /// A field does not parse as a UUID.
    #[error("{path} must be a valid UUID")]
    InvalidUuid {
        /// Path of the field.
        path: String,
    },
    /// A field does not parse as an ISO-8601 instant.
    #[error("{path} must be an ISO-8601 timestamp")]
    InvalidTimestamp {
        /// Path of the field.
        path: String,
    },
    /// `esrp_version` does not parse as `major.minor`.
    #[error("esrp_version '{got}' is malformed: {reason}")]
    InvalidVersion {
        /// The version string as sent.
        got: String,
        /// Parser diagnostic.
        reason: String,
    },
    /// `esrp_version` parses but names an incompatible major version.
    #[error("esrp_version '{got}' is not compatible with '{expected}'")]
    IncompatibleVersion {
        /// The version string as sent.
        got: String,
        /// The version this validator speaks.
        expected: String,
    },
    /// `inputs` is present but has no entries.
    #[error("inputs must contain at least one entry")]
    EmptyInputs,
    /// A closed-enumeration field holds an unrecognized value.
    #[error("{path} must be one of: {allowed}")]
    UnknownVariant {
        /// Path of the field.
        path: String,
        /// The accepted values.
        allowed: &'static str,
    },
    /// A failed response carries no error details.
    #[error("error details are required when status is \"failed\"")]
    MissingError,
    /// An accepted response carries no job handle.
    #[error("job details are required when status is \"accepted\"")]
    MissingJob,
    /// Any other per-field rule violation.
    #[error("{path}: {reason}")]
    InvalidField {
        /// Path of the field.
        path: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Envelope validator bound to a current protocol version.
///
/// The version is injected at construction and immutable afterwards, so
/// tests can exercise alternate versions without process-wide state.
#[derive(Debug, Clone)]
pub struct Validator {
    current: ProtocolVersion,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ProtocolVersion::current())
    }
}

impl Validator {
    /// Builds a validator that treats `current` as the version it speaks.
    pub fn new(current: ProtocolVersion) -> Self {
        Self { current }
    }

    /// Parses and validates a request envelope.
    ///
    /// # Errors
    ///
    /// [`EnvelopeError::InvalidJson`] on a syntax error, otherwise
    /// [`EnvelopeError::Validation`] naming the first violated rule.
    pub fn validate_request(&self, text: &str) -> Result<RequestEnvelope, EnvelopeError> {
        let value = parse_json(text)?;
        self.check_request(&value)?;
        typed(value)
    }

    /// Parses and validates a response envelope.
    ///
    /// # Errors
    ///
    /// Same contract as [`Validator::validate_request`].
    pub fn validate_response(&self, text: &str) -> Result<ResponseEnvelope, EnvelopeError> {
        let value = parse_json(text)?;
        self.check_response(&value)?;
        typed(value)
    }

    pub(crate) fn check_request(&self, value: &Value) -> Result<(), ValidationError> {
        let root = require_root(value)?;

        self.check_version(root)?;
        require_uuid(root, "", "request_id")?;
        check_timestamp(root, "timestamp")?;

        let caller = require_object(root, "", "caller")?;
        require_nonempty_str(caller, "caller", "system")?;
        optional_str(caller, "caller", "agent_id")?;
        optional_str(caller, "caller", "run_id")?;

        let target = require_object(root, "", "target")?;
        require_nonempty_str(target, "target", "service")?;
        require_nonempty_str(target, "target", "operation")?;
        optional_str(target, "target", "variant")?;

        let inputs = require_array(root, "", "inputs")?;
        if inputs.is_empty() {
            return Err(ValidationError::EmptyInputs);
        }
        for (index, input) in inputs.iter().enumerate() {
            check_input(input, index)?;
        }

        if let Some(params) = root.get("params") {
            if !params.is_object() {
                return Err(ValidationError::WrongType {
                    path: "params".to_string(),
                    expected: "object",
                });
            }
        }

        optional_str(root, "", "idempotency_key")?;
        if let Some(claimed) = optional_str(root, "", "payload_hash")? {
            if !esrp_canonical::is_hex_digest(claimed) {
                return Err(ValidationError::InvalidField {
                    path: "payload_hash".to_string(),
                    reason: "must be 64 hex characters".to_string(),
                });
            }
        }

        Ok(())
    }

    pub(crate) fn check_response(&self, value: &Value) -> Result<(), ValidationError> {
        let root = require_root(value)?;

        self.check_version(root)?;
        require_uuid(root, "", "request_id")?;

        let status = require_nonempty_str(root, "", "status")?;
        if !STATUSES.contains(&status) {
            return Err(ValidationError::UnknownVariant {
                path: "status".to_string(),
                allowed: "succeeded, failed, accepted",
            });
        }

        match status {
            "failed" => {
                if root.get("error").is_none() {
                    return Err(ValidationError::MissingError);
                }
                let error = require_object(root, "", "error")?;
                require_nonempty_str(error, "error", "message")?;
            }
            "accepted" => {
                if root.get("job").is_none() {
                    return Err(ValidationError::MissingJob);
                }
                let job = require_object(root, "", "job")?;
                require_uuid(job, "job", "job_id")?;
                let state = require_nonempty_str(job, "job", "state")?;
                if !JOB_STATES.contains(&state) {
                    return Err(ValidationError::UnknownVariant {
                        path: "job.state".to_string(),
                        allowed: "queued, started, succeeded, failed, cancelled",
                    });
                }
            }
            _ => {}
        }

        if let Some(artifacts) = root.get("artifacts") {
            let artifacts = artifacts.as_array().ok_or(ValidationError::WrongType {
                path: "artifacts".to_string(),
                expected: "array",
            })?;
            for (index, artifact) in artifacts.iter().enumerate() {
                check_artifact(artifact, index)?;
            }
        }

        Ok(())
    }

    fn check_version(&self, root: &Map<String, Value>) -> Result<(), ValidationError> {
        let text = require_str(root, "", "esrp_version")?;
        let version =
            ProtocolVersion::parse(text).map_err(|e| ValidationError::InvalidVersion {
                got: text.to_string(),
                reason: e.to_string(),
            })?;
        if !version.is_compatible_with(&self.current) {
            return Err(ValidationError::IncompatibleVersion {
                got: text.to_string(),
                expected: self.current.to_string(),
            });
        }
        Ok(())
    }
}

/// Parses and validates a request with the process-default validator.
///
/// # Errors
///
/// See [`Validator::validate_request`].
pub fn validate_request(text: &str) -> Result<RequestEnvelope, EnvelopeError> {
    Validator::default().validate_request(text)
}

/// Parses and validates a response with the process-default validator.
///
/// # Errors
///
/// See [`Validator::validate_response`].
pub fn validate_response(text: &str) -> Result<ResponseEnvelope, EnvelopeError> {
    Validator::default().validate_response(text)
}

pub(crate) fn parse_json(text: &str) -> Result<Value, EnvelopeError> {
    serde_json::from_str(text).map_err(|e| EnvelopeError::InvalidJson(e.to_string()))
}

pub(crate) fn require_root(value: &Value) -> Result<&Map<String, Value>, ValidationError> {
    value.as_object().ok_or(ValidationError::WrongType {
        path: "envelope".to_string(),
        expected: "object",
    })
}

/// Deserializes into the typed model after all checks passed. Residual
/// failures here mean a rule gap, surfaced rather than swallowed.
fn typed<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, EnvelopeError> {
    serde_json::from_value(value).map_err(|e| {
        ValidationError::InvalidField {
            path: "envelope".to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

fn check_input(value: &Value, index: usize) -> Result<(), ValidationError> {
    let path = format!("inputs[{index}]");
    let input = value.as_object().ok_or(ValidationError::WrongType {
        path: path.clone(),
        expected: "object",
    })?;

    require_nonempty_str(input, &path, "name")?;
    require_nonempty_str(input, &path, "content_type")?;
    require_nonempty_str(input, &path, "data")?;
    let encoding = require_nonempty_str(input, &path, "encoding")?;
    if !ENCODINGS.contains(&encoding) {
        return Err(ValidationError::UnknownVariant {
            path: join(&path, "encoding"),
            allowed: "utf-8, base64, path",
        });
    }
    Ok(())
}

fn check_artifact(value: &Value, index: usize) -> Result<(), ValidationError> {
    let path = format!("artifacts[{index}]");
    let artifact = value.as_object().ok_or(ValidationError::WrongType {
        path: path.clone(),
        expected: "object",
    })?;

    require_uuid(artifact, &path, "artifact_id")?;

    let uri = require_nonempty_str(artifact, &path, "uri")?;
    if uri.starts_with(WORKSPACE_URI_PREFIX) {
        WorkspaceUri::parse(uri).map_err(|e| ValidationError::InvalidField {
            path: join(&path, "uri"),
            reason: e.to_string(),
        })?;
    }

    let sha256 = require_str(artifact, &path, "sha256")?;
    if !esrp_canonical::is_hex_digest(sha256) {
        return Err(ValidationError::InvalidField {
            path: join(&path, "sha256"),
            reason: "must be 64 hex characters".to_string(),
        });
    }

    let size_path = join(&path, "size_bytes");
    let size = require(artifact, &path, "size_bytes")?
        .as_u64()
        .ok_or(ValidationError::WrongType {
            path: size_path.clone(),
            expected: "non-negative integer",
        })?;
    if size == 0 {
        return Err(ValidationError::InvalidField {
            path: size_path,
            reason: "must not be zero".to_string(),
        });
    }

    Ok(())
}

fn check_timestamp(map: &Map<String, Value>, name: &str) -> Result<(), ValidationError> {
    let text = require_str(map, "", name)?;
    chrono::DateTime::parse_from_rfc3339(text).map_err(|_| ValidationError::InvalidTimestamp {
        path: name.to_string(),
    })?;
    Ok(())
}

fn join(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}

fn require<'a>(
    map: &'a Map<String, Value>,
    parent: &str,
    name: &str,
) -> Result<&'a Value, ValidationError> {
    map.get(name).ok_or_else(|| ValidationError::MissingField {
        path: join(parent, name),
    })
}

fn require_str<'a>(
    map: &'a Map<String, Value>,
    parent: &str,
    name: &str,
) -> Result<&'a str, ValidationError> {
    require(map, parent, name)?
        .as_str()
        .ok_or(ValidationError::WrongType {
            path: join(parent, name),
            expected: "string",
        })
}

fn require_nonempty_str<'a>(
    map: &'a Map<String, Value>,
    parent: &str,
    name: &str,
) -> Result<&'a str, ValidationError> {
    let s = require_str(map, parent, name)?;
    if s.is_empty() {
        return Err(ValidationError::Empty {
            path: join(parent, name),
        });
    }
    Ok(s)
}

fn require_object<'a>(
    map: &'a Map<String, Value>,
    parent: &str,
    name: &str,
) -> Result<&'a Map<String, Value>, ValidationError> {
    require(map, parent, name)?
        .as_object()
        .ok_or(ValidationError::WrongType {
            path: join(parent, name),
            expected: "object",
        })
}

fn require_array<'a>(
    map: &'a Map<String, Value>,
    parent: &str,
    name: &str,
) -> Result<&'a Vec<Value>, ValidationError> {
    require(map, parent, name)?
        .as_array()
        .ok_or(ValidationError::WrongType {
            path: join(parent, name),
            expected: "array",
        })
}

fn require_uuid(
    map: &Map<String, Value>,
    parent: &str,
    name: &str,
) -> Result<Uuid, ValidationError> {
    let s = require_str(map, parent, name)?;
    Uuid::parse_str(s).map_err(|_| ValidationError::InvalidUuid {
        path: join(parent, name),
    })
}

/// Explicit `null` is the same as leaving the field out.
fn optional_str<'a>(
    map: &'a Map<String, Value>,
    parent: &str,
    name: &str,
) -> Result<Option<&'a str>, ValidationError> {
    match map.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_str()
            .map(Some)
            .ok_or(ValidationError::WrongType {
                path: join(parent, name),
                expected: "string",
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request_json() -> Value {
        json!({
            "esrp_version": "1.0",
            "request_id": "3e0170b8-7b36-4de3-b196-8ad5d7c5f8d4",
            "timestamp": "2026-01-01T00:00:00Z",
            "caller": {"system": "orchestrator"},
            "target": {"service": "tts", "operation": "synthesize"},
            "inputs": [{
                "name": "text",
                "content_type": "text/plain",
                "data": "Hello",
                "encoding": "utf-8"
            }],
            "params": {"voice": "en-US"}
        })
    }

    fn validate(value: &Value) -> Result<RequestEnvelope, EnvelopeError> {
        validate_request(&value.to_string())
    }

    #[test]
    fn minimal_request_passes() {
        let envelope = validate(&request_json()).unwrap();
        assert_eq!(envelope.target.service, "tts");
        assert_eq!(envelope.inputs.len(), 1);
    }

    #[test]
    fn syntax_error_is_distinct_from_validation() {
        let err = validate_request("{not json").unwrap_err();
        assert!(matches!(err, EnvelopeError::InvalidJson(_)));
    }

    #[test]
    fn empty_service_names_the_path() {
        let mut value = request_json();
        value["target"]["service"] = json!("");
        let err = validate(&value).unwrap_err();
        assert_eq!(err.to_string(), "validation error: target.service must not be empty");
    }

    #[test]
    fn first_violation_wins() {
        // Both caller.system and target.service are broken; caller is
        // checked first in the documented order.
        let mut value = request_json();
        value["caller"]["system"] = json!("");
        value["target"]["service"] = json!("");
        let err = validate(&value).unwrap_err();
        assert!(matches!(
            err,
            EnvelopeError::Validation(ValidationError::Empty { ref path }) if path == "caller.system"
        ));
    }

    #[test]
    fn missing_field_reported() {
        let mut value = request_json();
        value.as_object_mut().unwrap().remove("caller");
        let err = validate(&value).unwrap_err();
        assert!(matches!(
            err,
            EnvelopeError::Validation(ValidationError::MissingField { ref path }) if path == "caller"
        ));
    }

    #[test]
    fn bad_uuid_rejected() {
        let mut value = request_json();
        value["request_id"] = json!("not-a-uuid");
        assert!(matches!(
            validate(&value).unwrap_err(),
            EnvelopeError::Validation(ValidationError::InvalidUuid { .. })
        ));
    }

    #[test]
    fn bad_timestamp_rejected() {
        let mut value = request_json();
        value["timestamp"] = json!("yesterday");
        assert!(matches!(
            validate(&value).unwrap_err(),
            EnvelopeError::Validation(ValidationError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn empty_inputs_rejected() {
        let mut value = request_json();
        value["inputs"] = json!([]);
        assert!(matches!(
            validate(&value).unwrap_err(),
            EnvelopeError::Validation(ValidationError::EmptyInputs)
        ));
    }

    #[test]
    fn input_field_paths_carry_the_index() {
        let mut value = request_json();
        value["inputs"][0]["content_type"] = json!("");
        let err = validate(&value).unwrap_err();
        assert!(matches!(
            err,
            EnvelopeError::Validation(ValidationError::Empty { ref path })
                if path == "inputs[0].content_type"
        ));
    }

    #[test]
    fn unknown_encoding_rejected() {
        let mut value = request_json();
        value["inputs"][0]["encoding"] = json!("rot13");
        assert!(matches!(
            validate(&value).unwrap_err(),
            EnvelopeError::Validation(ValidationError::UnknownVariant { .. })
        ));
    }

    #[test]
    fn incompatible_major_rejected() {
        let mut value = request_json();
        value["esrp_version"] = json!("2.0");
        assert!(matches!(
            validate(&value).unwrap_err(),
            EnvelopeError::Validation(ValidationError::IncompatibleVersion { .. })
        ));
    }

    #[test]
    fn higher_minor_accepted() {
        let mut value = request_json();
        value["esrp_version"] = json!("1.7");
        assert!(validate(&value).is_ok());
    }

    #[test]
    fn injected_version_changes_the_rule() {
        let validator = Validator::new(ProtocolVersion::new(2, 0));
        let mut value = request_json();
        value["esrp_version"] = json!("2.3");
        assert!(validator.validate_request(&value.to_string()).is_ok());
    }

    #[test]
    fn null_optional_fields_accepted() {
        let mut value = request_json();
        value["target"]["variant"] = json!(null);
        value["caller"]["agent_id"] = json!(null);
        value["caller"]["run_id"] = json!(null);
        value["idempotency_key"] = json!(null);
        let envelope = validate(&value).unwrap();
        assert_eq!(envelope.target.variant, None);
        assert_eq!(envelope.idempotency_key, None);
    }

    #[test]
    fn non_string_optional_field_still_rejected() {
        let mut value = request_json();
        value["target"]["variant"] = json!(7);
        assert!(matches!(
            validate(&value).unwrap_err(),
            EnvelopeError::Validation(ValidationError::WrongType { ref path, .. })
                if path == "target.variant"
        ));
    }

    #[test]
    fn extra_fields_ignored() {
        let mut value = request_json();
        value["x_future"] = json!({"anything": [1, 2, 3]});
        assert!(validate(&value).is_ok());
    }

    #[test]
    fn wrong_params_type_rejected() {
        let mut value = request_json();
        value["params"] = json!([1, 2]);
        assert!(matches!(
            validate(&value).unwrap_err(),
            EnvelopeError::Validation(ValidationError::WrongType { ref path, .. }) if path == "params"
        ));
    }

    mod responses {
        use super::*;

        fn response_json() -> Value {
            json!({
                "esrp_version": "1.0",
                "request_id": "3e0170b8-7b36-4de3-b196-8ad5d7c5f8d4",
                "status": "succeeded"
            })
        }

        fn validate(value: &Value) -> Result<ResponseEnvelope, EnvelopeError> {
            validate_response(&value.to_string())
        }

        #[test]
        fn minimal_response_passes() {
            assert!(validate(&response_json()).is_ok());
        }

        #[test]
        fn unknown_status_rejected() {
            let mut value = response_json();
            value["status"] = json!("maybe");
            assert!(matches!(
                validate(&value).unwrap_err(),
                EnvelopeError::Validation(ValidationError::UnknownVariant { .. })
            ));
        }

        #[test]
        fn failed_requires_error() {
            let mut value = response_json();
            value["status"] = json!("failed");
            assert!(matches!(
                validate(&value).unwrap_err(),
                EnvelopeError::Validation(ValidationError::MissingError)
            ));

            value["error"] = json!({"message": "backend unavailable"});
            assert!(validate(&value).is_ok());
        }

        #[test]
        fn accepted_requires_job() {
            let mut value = response_json();
            value["status"] = json!("accepted");
            assert!(matches!(
                validate(&value).unwrap_err(),
                EnvelopeError::Validation(ValidationError::MissingJob)
            ));

            value["job"] = json!({
                "job_id": "f3b9c0ac-9e54-44f3-9f3a-0d8f3f9a7c11",
                "state": "queued"
            });
            assert!(validate(&value).is_ok());
        }

        #[test]
        fn artifact_rules_enforced() {
            let mut value = response_json();
            value["artifacts"] = json!([{
                "artifact_id": "f3b9c0ac-9e54-44f3-9f3a-0d8f3f9a7c11",
                "uri": "workspace://artifacts/output.wav",
                "sha256": "a".repeat(64),
                "size_bytes": 1024
            }]);
            assert!(validate(&value).is_ok());

            value["artifacts"][0]["uri"] = json!("workspace://artifacts/../secret");
            let err = validate(&value).unwrap_err();
            assert!(matches!(
                err,
                EnvelopeError::Validation(ValidationError::InvalidField { ref path, .. })
                    if path == "artifacts[0].uri"
            ));
        }

        #[test]
        fn artifact_zero_size_rejected() {
            let mut value = response_json();
            value["artifacts"] = json!([{
                "artifact_id": "f3b9c0ac-9e54-44f3-9f3a-0d8f3f9a7c11",
                "uri": "workspace://artifacts/output.wav",
                "sha256": "a".repeat(64),
                "size_bytes": 0
            }]);
            assert!(matches!(
                validate(&value).unwrap_err(),
                EnvelopeError::Validation(ValidationError::InvalidField { ref path, .. })
                    if path == "artifacts[0].size_bytes"
            ));
        }
    }
}
