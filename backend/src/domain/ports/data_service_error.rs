//! Failure categories shared by ports backed by the data service.

use crate::domain::Error;

/// Errors raised by data-service adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataServiceError {
    /// The service could not be reached or timed out.
    #[error("data service unavailable: {message}")]
    Unavailable { message: String },
    /// The service answered with a non-success status.
    #[error("data service rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
    /// The response body did not match the expected shape.
    #[error("data service returned an unexpected payload: {message}")]
    Decode { message: String },
}

impl DataServiceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn rejected(status: impl Into<u16>, message: impl Into<String>) -> Self {
        Self::Rejected {
            status: status.into(),
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

impl From<DataServiceError> for Error {
    fn from(value: DataServiceError) -> Self {
        match &value {
            DataServiceError::Unavailable { .. } => Self::service_unavailable(value.to_string()),
            DataServiceError::Rejected {
                status: 409 | 422,
                message,
            } if !message.trim().is_empty() => Self::invalid_request(message.clone()),
            DataServiceError::Rejected {
                status: 409 | 422, ..
            } => Self::invalid_request(value.to_string()),
            DataServiceError::Rejected { .. } | DataServiceError::Decode { .. } => {
                Self::internal(value.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(DataServiceError::unavailable("timeout"), ErrorCode::ServiceUnavailable)]
    #[case(DataServiceError::rejected(422_u16, "email taken"), ErrorCode::InvalidRequest)]
    #[case(DataServiceError::rejected(500_u16, "boom"), ErrorCode::InternalError)]
    #[case(DataServiceError::decode("missing id"), ErrorCode::InternalError)]
    fn maps_to_domain_codes(#[case] error: DataServiceError, #[case] expected: ErrorCode) {
        assert_eq!(Error::from(error).code(), expected);
    }

    #[rstest]
    fn conflict_message_is_preserved() {
        let error = Error::from(DataServiceError::rejected(409_u16, "already registered"));
        assert_eq!(error.message(), "already registered");
    }
}
