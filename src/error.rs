//! Error types for the HealthHub profile pipeline.

use crate::profile::validate::{PersonalInfoErrors, Section};

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Submission error: {0}")]
    Submission(#[from] SubmissionError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Errors talking to the profile backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Network failure: {reason}")]
    NetworkFailure { reason: String },

    #[error("Server rejected request ({status}): {message}")]
    ServerRejected { status: u16, message: String },

    #[error("Malformed response: {reason}")]
    MalformedResponse { reason: String },
}

impl ApiError {
    /// Message suitable for showing to the patient.
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthenticated => "Your session has expired. Please sign in again.".to_string(),
            Self::NetworkFailure { .. } => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            Self::ServerRejected { message, .. } => message.clone(),
            Self::MalformedResponse { .. } => {
                "The server sent an unexpected response. Please try again later.".to_string()
            }
        }
    }

    /// Whether the backend reported that no profile exists yet.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ServerRejected { status: 404, .. })
    }
}

/// Errors returned by the submission coordinator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Profile is incomplete: {}", format_sections(.sections))]
    Incomplete { sections: Vec<Section> },

    #[error("Personal information is invalid")]
    InvalidPersonalInfo(PersonalInfoErrors),
}

impl SubmissionError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(e) => e.user_message(),
            Self::Incomplete { sections } => format!(
                "Please complete the following sections before saving: {}",
                format_sections(sections)
            ),
            Self::InvalidPersonalInfo(errors) => errors.to_string(),
        }
    }
}

fn format_sections(sections: &[Section]) -> String {
    sections
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Local persistence errors (credential store, profile cache file).
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Wizard navigation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("Step index {index} out of range (0..{len})")]
    StepOutOfRange { index: usize, len: usize },
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_is_surfaced_verbatim() {
        let err = ApiError::ServerRejected {
            status: 422,
            message: "Blood type is invalid".into(),
        };
        assert_eq!(err.user_message(), "Blood type is invalid");
        assert!(!err.is_not_found());
    }

    #[test]
    fn not_found_detection() {
        let err = ApiError::ServerRejected {
            status: 404,
            message: "Profile not found".into(),
        };
        assert!(err.is_not_found());
        assert!(!ApiError::Unauthenticated.is_not_found());
    }

    #[test]
    fn incomplete_lists_section_ids() {
        let err = SubmissionError::Incomplete {
            sections: vec![Section::Contact, Section::Emergency],
        };
        assert_eq!(err.to_string(), "Profile is incomplete: contact, emergency");
        assert!(err.user_message().contains("contact, emergency"));
    }

    #[test]
    fn submission_wraps_api_error_transparently() {
        let err: SubmissionError = ApiError::Unauthenticated.into();
        assert_eq!(err.to_string(), "Not authenticated");
        assert_eq!(err, SubmissionError::Api(ApiError::Unauthenticated));
    }
}
