//! Step error taxonomy

/// Why a step did not succeed. Never propagates past the driver.
#[derive(Debug, thiserror::Error)]
pub enum StepError {
    /// The service processed the request and declined it.
    #[error("remote rejection ({status}): {body}")]
    RemoteRejection { status: u16, body: String },

    /// No structured response: connect, timeout or decode failure.
    #[error("transport failure: {0}")]
    TransportFailure(String),

    /// A value an earlier step should have produced is missing.
    #[error("precondition unmet: {0}")]
    PreconditionUnmet(String),
}

impl StepError {
    pub fn precondition(reason: impl Into<String>) -> Self {
        StepError::PreconditionUnmet(reason.into())
    }

    pub fn is_precondition(&self) -> bool {
        matches!(self, StepError::PreconditionUnmet(_))
    }
}

impl From<esp_client::Error> for StepError {
    fn from(err: esp_client::Error) -> Self {
        match err {
            esp_client::Error::Remote { status, body } => {
                StepError::RemoteRejection { status, body }
            }
            other => StepError::TransportFailure(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_client_errors_become_rejections() {
        let err: StepError = esp_client::Error::Remote {
            status: 401,
            body: "invalid api key".into(),
        }
        .into();
        match err {
            StepError::RemoteRejection { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "invalid api key");
            }
            other => panic!("expected RemoteRejection, got {other:?}"),
        }
    }

    #[test]
    fn transport_and_decode_errors_become_transport_failures() {
        let err: StepError = esp_client::Error::Transport("connection refused".into()).into();
        assert!(err.to_string().contains("connection refused"), "got: {err}");

        let err: StepError = esp_client::Error::Decode("missing field `id`".into()).into();
        assert!(matches!(err, StepError::TransportFailure(_)), "got: {err:?}");
    }

    #[test]
    fn precondition_helper() {
        let err = StepError::precondition("no message id");
        assert!(err.is_precondition());
        assert_eq!(err.to_string(), "precondition unmet: no message id");
    }
}
