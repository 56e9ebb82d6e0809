use serde::Serialize;

/// Where a dispatch is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchPhase {
    Idle,
    Validating,
    EncodingAttachment,
    AcquiringToken,
    Sending,
    Succeeded,
    Failed,
}

impl std::fmt::Display for DispatchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchPhase::Idle => write!(f, "Idle"),
            DispatchPhase::Validating => write!(f, "Validating parameters"),
            DispatchPhase::EncodingAttachment => write!(f, "Encoding attachment"),
            DispatchPhase::AcquiringToken => write!(f, "Acquiring access token"),
            DispatchPhase::Sending => write!(f, "Sending"),
            DispatchPhase::Succeeded => write!(f, "Succeeded"),
            DispatchPhase::Failed => write!(f, "Failed"),
        }
    }
}

/// Final result of one send attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchOutcome {
    pub succeeded: bool,
    pub message: String,
}

impl DispatchOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            succeeded: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            message: message.into(),
        }
    }

    pub fn phase(&self) -> DispatchPhase {
        if self.succeeded {
            DispatchPhase::Succeeded
        } else {
            DispatchPhase::Failed
        }
    }
}
