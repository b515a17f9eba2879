use thiserror::Error;

/// Caller input that cannot be laid out.
///
/// All variants are raised while a run is being set up; once a
/// [`crate::simulation::Simulation`] exists, ticking it cannot fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("building `{id}` has invalid dimensions {width}x{height}")]
    InvalidDimension { id: String, width: f64, height: f64 },

    #[error("building at index {index} has an empty id")]
    EmptyId { index: usize },

    #[error("link `{from}` -> `{to}` has invalid strength {strength}")]
    InvalidStrength {
        from: String,
        to: String,
        strength: f64,
    },

    #[error("invalid layout config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
