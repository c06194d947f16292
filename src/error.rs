use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    #[error("invalid date format: {input}")]
    Format { input: String },
    #[error("unknown timezone: {timezone}")]
    Configuration { timezone: String },
    #[error("invalid preferences: {0}")]
    Preferences(String),
}

impl TimeError {
    pub fn format(input: impl Into<String>) -> Self {
        Self::Format {
            input: input.into(),
        }
    }

    pub fn configuration(timezone: impl Into<String>) -> Self {
        Self::Configuration {
            timezone: timezone.into(),
        }
    }
}
