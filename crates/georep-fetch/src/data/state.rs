/// Lifecycle of a single transfer attempt.
///
/// `Idle → RequestSent → Streaming → Verifying → Success`, with
/// `TransportFailed`, `ChecksumFailed` and `PreconditionFailed` as the other
/// terminal states. There is no transition out of a terminal state; a retry
/// is a new attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferState {
    #[default]
    Idle,
    RequestSent,
    Streaming,
    Verifying,
    Success,
    TransportFailed,
    ChecksumFailed,
    PreconditionFailed,
}

impl TransferState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Success | Self::TransportFailed | Self::ChecksumFailed | Self::PreconditionFailed
        )
    }
}

impl std::fmt::Display for TransferState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransferState::Idle => write!(f, "Idle"),
            TransferState::RequestSent => write!(f, "RequestSent"),
            TransferState::Streaming => write!(f, "Streaming"),
            TransferState::Verifying => write!(f, "Verifying"),
            TransferState::Success => write!(f, "Success"),
            TransferState::TransportFailed => write!(f, "TransportFailed"),
            TransferState::ChecksumFailed => write!(f, "ChecksumFailed"),
            TransferState::PreconditionFailed => write!(f, "PreconditionFailed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(TransferState::Success.is_terminal());
        assert!(TransferState::ChecksumFailed.is_terminal());
        assert!(TransferState::PreconditionFailed.is_terminal());
        assert!(TransferState::TransportFailed.is_terminal());
        assert!(!TransferState::Idle.is_terminal());
        assert!(!TransferState::Streaming.is_terminal());
    }
}
