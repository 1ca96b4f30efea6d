//! Typed request/response envelope model.
//!
//! These structs are the post-validation view of an ESRP message: transient,
//! constructed from parsed JSON, and discarded after use. They carry no
//! identity beyond a single call. Unknown fields in the source JSON are
//! accepted and dropped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A validated ESRP request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequestEnvelope {
    /// Protocol version the sender speaks (`major.minor`).
    pub esrp_version: String,
    /// Unique identifier for this request.
    pub request_id: Uuid,
    /// When the request was issued.
    pub timestamp: DateTime<Utc>,
    /// Caller-supplied deduplication key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<String>,
    /// Sender's claim of the payload hash; checked against the derived value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_hash: Option<String>,
    /// Who is calling.
    pub caller: Caller,
    /// What is being called.
    pub target: Target,
    /// Input data; order is significant.
    pub inputs: Vec<Input>,
    /// Operation parameters, arbitrary contents.
    #[serde(default = "empty_object")]
    pub params: Value,
}

/// A validated ESRP response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseEnvelope {
    /// Protocol version the responder speaks.
    pub esrp_version: String,
    /// The request this responds to.
    pub request_id: Uuid,
    /// Outcome of the request.
    pub status: Status,
    /// Failure details; required when `status` is `failed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
    /// Deferred-work handle; required when `status` is `accepted`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<Job>,
    /// Artifacts produced by the operation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<Artifact>,
}

/// The calling system.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Caller {
    /// Originating system name; must not be empty.
    pub system: String,
    /// Optional agent within the system.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    /// Optional run correlation identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
}

/// The called service and operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Target {
    /// Service name; must not be empty.
    pub service: String,
    /// Operation name; must not be empty.
    pub operation: String,
    /// Optional operation variant (e.g. a model or quality tier).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
}

/// One piece of request input data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Input {
    /// Input name; must not be empty.
    pub name: String,
    /// MIME content type of `data`.
    pub content_type: String,
    /// The data itself, or a locator when `encoding` is `path`.
    pub data: String,
    /// How `data` is encoded.
    pub encoding: Encoding,
    /// Free-form per-input metadata; participates in payload hashing.
    #[serde(default)]
    pub metadata: Value,
}

/// How input data is encoded.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Literal UTF-8 text.
    #[default]
    #[serde(rename = "utf-8")]
    Utf8,
    /// Base64-encoded bytes.
    Base64,
    /// A path or workspace URI locating the data.
    Path,
}

/// Response outcome.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// The operation completed.
    Succeeded,
    /// The operation failed; `error` carries details.
    Failed,
    /// The operation was queued; `job` carries the handle.
    Accepted,
}

/// Failure details attached to a failed response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorInfo {
    /// Human-readable failure description; must not be empty.
    pub message: String,
    /// Whether retrying the identical request may succeed.
    #[serde(default)]
    pub retryable: bool,
    /// Machine-readable failure context.
    #[serde(default)]
    pub details: Value,
}

/// Handle for deferred work attached to an accepted response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Job {
    /// Identifier for polling the job.
    pub job_id: Uuid,
    /// Current job state.
    pub state: JobState,
}

/// Lifecycle state of a deferred job.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    /// Waiting to start.
    Queued,
    /// Running.
    Started,
    /// Finished successfully.
    Succeeded,
    /// Finished with an error.
    Failed,
    /// Cancelled before completion.
    Cancelled,
}

/// Reference to an artifact produced by an operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Artifact {
    /// Identifier of the artifact.
    pub artifact_id: Uuid,
    /// Where the artifact lives; `workspace://` URIs are validated.
    pub uri: String,
    /// SHA-256 of the artifact bytes, 64 hex characters.
    pub sha256: String,
    /// Size of the artifact; must not be zero.
    pub size_bytes: u64,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}
