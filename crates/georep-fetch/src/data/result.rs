use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use super::TransferState;
use crate::core::retry_delay;

/// Diagnostic key/value pairs attached to a failed transfer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ExtraDetails(BTreeMap<String, Value>);

impl ExtraDetails {
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> { self.0.get(key) }

    pub fn get_str(&self, key: &str) -> Option<&str> { self.0.get(key).and_then(Value::as_str) }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> { self.0.iter() }
}

/// Why a transfer failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Node role, missing primary, or an unusable destination path.
    Precondition,
    /// The staging file could not be created.
    TempFile,
    /// Non-success HTTP status or a network/stream error.
    Transport,
    /// The primary answered that it does not hold the blob.
    PrimaryMissingFile,
    /// The downloaded bytes do not hash to the declared checksum.
    ChecksumMismatch,
    /// The verified download could not be promoted to the destination.
    Storage,
}

impl FailureKind {
    /// Whether re-running the transfer unchanged can succeed.
    pub fn is_retryable(&self) -> bool { !matches!(self, Self::Precondition | Self::PrimaryMissingFile) }

    pub fn terminal_state(&self) -> TransferState {
        match self {
            Self::Precondition | Self::TempFile => TransferState::PreconditionFailed,
            Self::Transport | Self::PrimaryMissingFile | Self::Storage => TransferState::TransportFailed,
            Self::ChecksumMismatch => TransferState::ChecksumFailed,
        }
    }
}

/// Outcome of one transfer attempt.
///
/// A successful result never carries a reason, a failure kind, or the
/// primary-missing flag; the constructors are the only way to build one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferResult {
    success:              bool,
    bytes_downloaded:     u64,
    primary_missing_file: bool,
    reason:               Option<String>,
    extra_details:        Option<ExtraDetails>,
    failure_kind:         Option<FailureKind>,
}

impl TransferResult {
    pub fn success(bytes_downloaded: u64) -> Self {
        Self {
            success: true,
            bytes_downloaded,
            primary_missing_file: false,
            reason: None,
            extra_details: None,
            failure_kind: None,
        }
    }

    pub fn failure(kind: FailureKind, reason: impl Into<String>) -> Self {
        Self {
            success:              false,
            bytes_downloaded:     0,
            primary_missing_file: kind == FailureKind::PrimaryMissingFile,
            reason:               Some(reason.into()),
            extra_details:        None,
            failure_kind:         Some(kind),
        }
    }

    #[must_use]
    pub fn with_bytes_downloaded(mut self, bytes: u64) -> Self {
        self.bytes_downloaded = bytes;
        self
    }

    #[must_use]
    pub fn with_extra_details(mut self, details: ExtraDetails) -> Self {
        if !self.success && !details.is_empty() {
            self.extra_details = Some(details);
        }
        self
    }

    pub fn is_success(&self) -> bool { self.success }

    pub fn bytes_downloaded(&self) -> u64 { self.bytes_downloaded }

    pub fn primary_missing_file(&self) -> bool { self.primary_missing_file }

    pub fn reason(&self) -> Option<&str> { self.reason.as_deref() }

    pub fn extra_details(&self) -> Option<&ExtraDetails> { self.extra_details.as_ref() }

    pub fn failure_kind(&self) -> Option<FailureKind> { self.failure_kind }

    pub fn state(&self) -> TransferState {
        self.failure_kind
            .map_or(TransferState::Success, |kind| kind.terminal_state())
    }

    /// Backoff an external scheduler should wait before attempt `attempt`
    /// (0-indexed), or `None` when the outcome should not be retried.
    pub fn retry_delay(&self, attempt: u32, base: Duration) -> Option<Duration> {
        self.failure_kind
            .filter(FailureKind::is_retryable)
            .map(|_| retry_delay(attempt, base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_has_no_failure_fields() {
        let result = TransferResult::success(42).with_extra_details(ExtraDetails::new().with("k", "v"));

        assert!(result.is_success());
        assert_eq!(result.bytes_downloaded(), 42);
        assert!(result.reason().is_none());
        assert!(!result.primary_missing_file());
        assert!(result.extra_details().is_none());
        assert_eq!(result.state(), TransferState::Success);
    }

    #[test]
    fn test_primary_missing_flag_follows_kind() {
        let result = TransferResult::failure(FailureKind::PrimaryMissingFile, "gone");
        assert!(result.primary_missing_file());
        assert!(!TransferResult::failure(FailureKind::Transport, "down").primary_missing_file());
    }

    #[test]
    fn test_retry_guidance() {
        let base = Duration::from_millis(100);

        assert_eq!(TransferResult::success(1).retry_delay(0, base), None);
        assert_eq!(
            TransferResult::failure(FailureKind::Precondition, "no").retry_delay(0, base),
            None
        );
        assert_eq!(
            TransferResult::failure(FailureKind::PrimaryMissingFile, "gone").retry_delay(3, base),
            None
        );
        assert_eq!(
            TransferResult::failure(FailureKind::ChecksumMismatch, "bad").retry_delay(2, base),
            Some(Duration::from_millis(400))
        );
    }

    #[test]
    fn test_serializes_for_job_layer() {
        let result = TransferResult::failure(FailureKind::Transport, "Error downloading file")
            .with_bytes_downloaded(7)
            .with_extra_details(ExtraDetails::new().with("url", "http://primary/x"));

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["bytes_downloaded"], 7);
        assert_eq!(json["failure_kind"], "transport");
        assert_eq!(json["extra_details"]["url"], "http://primary/x");
    }
}
