//! Error types for the data model
//!
//! Only configuration-shape problems are errors. Bad per-item data is
//! normalized away in [`crate::WorkItem::from_raw`] instead.

/// Capacity configuration errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Fixed mode needs either a team total or a member list
    #[error("capacity config has no capacity source: set one of [{fields}]")]
    MissingCapacitySource {
        /// Names of the fields that could supply capacity
        fields: &'static str,
    },

    /// A field the selected mode requires is absent or empty
    #[error("capacity config is missing required field `{0}`")]
    MissingField(&'static str),

    /// Hour values must be finite and non-negative
    #[error("capacity config field `{field}` has invalid hours {value}")]
    InvalidHours {
        /// Path of the offending field
        field: String,
        /// The rejected value
        value: f64,
    },

    /// A member's active range ends before it starts
    #[error("team member `{name}` has an active range that ends before it starts")]
    InvalidMemberRange {
        /// Member name
        name: String,
    },
}

impl ConfigError {
    /// Name of the field the host should point the user at
    #[must_use]
    pub fn field(&self) -> String {
        match self {
            Self::MissingCapacitySource { fields } => (*fields).to_string(),
            Self::MissingField(field) => (*field).to_string(),
            Self::InvalidHours { field, .. } => field.clone(),
            Self::InvalidMemberRange { name } => format!("members[{name}]"),
        }
    }
}
