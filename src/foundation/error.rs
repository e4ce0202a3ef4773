/// Convenience result type used across epispin.
pub type EpiResult<T> = Result<T, EpiError>;

/// Top-level error taxonomy used by the library APIs.
#[derive(thiserror::Error, Debug)]
pub enum EpiError {
    /// Invalid user-provided configuration or construction arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// A run/pause/step request that the current run state forbids.
    ///
    /// These are reported, never fatal: the driver state is left unchanged.
    #[error("invalid transition: cannot {op} while {state}")]
    Transition {
        /// Requested operation (`run`, `pause`, `step`, `seek`).
        op: &'static str,
        /// Run state name at the time of the request.
        state: &'static str,
    },

    /// Failures reported by the renderable scene collaborator.
    #[error("scene error: {0}")]
    Scene(String),

    /// Errors while rasterizing or writing a rendered frame.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EpiError {
    /// Build a [`EpiError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`EpiError::Transition`] value.
    pub fn transition(op: &'static str, state: &'static str) -> Self {
        Self::Transition { op, state }
    }

    /// Build a [`EpiError::Scene`] value.
    pub fn scene(msg: impl Into<String>) -> Self {
        Self::Scene(msg.into())
    }

    /// Build a [`EpiError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`EpiError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// `true` for the non-fatal invalid-transition class.
    pub fn is_transition(&self) -> bool {
        matches!(self, Self::Transition { .. })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
