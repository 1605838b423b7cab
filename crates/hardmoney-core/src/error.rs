use thiserror::Error;

#[derive(Debug, Error)]
pub enum HardMoneyError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Upstream unavailable: {service} - {reason}")]
    UpstreamUnavailable { service: String, reason: String },

    #[error("{context} failed to parse: {reason}")]
    SchemaParseFailure { context: String, reason: String },

    #[error("Entitlement denied: {0}")]
    EntitlementDenied(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl HardMoneyError {
    /// Shorthand for the most common failure: a required deal field
    /// that is absent or does not parse as a number.
    pub fn missing(field: &str) -> Self {
        HardMoneyError::MissingField {
            field: field.to_string(),
        }
    }

    /// A field that parsed but carries a value the engine cannot price,
    /// such as a zero or negative valuation.
    pub fn invalid(field: &str, reason: &str) -> Self {
        HardMoneyError::InvalidInput {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<serde_json::Error> for HardMoneyError {
    fn from(e: serde_json::Error) -> Self {
        HardMoneyError::SerializationError(e.to_string())
    }
}
