use thiserror::Error;

/// Failures while turning a raw observation field into a display value.
///
/// These are reported per presentation slot; one bad field never stops the
/// rest of the dashboard from rendering.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeriveError {
    #[error("{field} is not a finite number ({value})")]
    NotFinite { field: &'static str, value: f64 },

    #[error("{field} is not numeric: {raw:?}")]
    NotNumeric { field: &'static str, raw: String },

    #[error("Unrecognised timestamp {0:?}")]
    Timestamp(String),
}
