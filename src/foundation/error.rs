/// Convenience result type used across texcompute.
pub type ComputeResult<T> = Result<T, ComputeError>;

/// Top-level error taxonomy for device setup, allocation and kernel runs.
#[derive(thiserror::Error, Debug)]
pub enum ComputeError {
    /// No usable GPU context, or the fixed vertex stage failed to build.
    #[error("initialization error: {0}")]
    Initialization(String),

    /// Requested element count is outside `1..=max`.
    #[error("capacity error: requested {requested} elements, supported range is 1..={max}")]
    CapacityExceeded {
        /// Requested logical length.
        requested: usize,
        /// Largest supported logical length.
        max: usize,
    },

    /// More values were given than the buffer exposes.
    #[error("capacity error: {given} values do not fit a buffer of length {length}")]
    FillOverflow {
        /// Number of values passed in.
        given: usize,
        /// Logical length of the buffer.
        length: usize,
    },

    /// The kernel body did not parse or validate as a fragment stage.
    #[error("kernel compile error:\n{listing}\n--- diagnostics ---\n{diagnostics}")]
    KernelCompile {
        /// Kernel body, line-numbered as it appears in the assembled shader.
        listing: String,
        /// Compiler diagnostic text.
        diagnostics: String,
    },

    /// The fragment stage compiled but the program could not be linked.
    #[error("kernel link error:\n{listing}\n--- diagnostics ---\n{diagnostics}")]
    KernelLink {
        /// Kernel body, line-numbered as it appears in the assembled shader.
        listing: String,
        /// Pipeline creation diagnostic text.
        diagnostics: String,
    },

    /// The device cannot host the render target this run needs.
    #[error("device incompatible: {detail}")]
    DeviceIncompatible {
        /// What the device rejected.
        detail: String,
    },

    /// Failures after rendering started (submission, polling, mapping).
    #[error("execution error: {0}")]
    Execution(String),

    /// Invalid configuration values.
    #[error("config error: {0}")]
    Config(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ComputeError {
    /// Build a [`ComputeError::Initialization`] value.
    pub fn initialization(msg: impl Into<String>) -> Self {
        Self::Initialization(msg.into())
    }

    /// Build a [`ComputeError::DeviceIncompatible`] value.
    pub fn device_incompatible(detail: impl Into<String>) -> Self {
        Self::DeviceIncompatible {
            detail: detail.into(),
        }
    }

    /// Build a [`ComputeError::Execution`] value.
    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }

    /// Build a [`ComputeError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the caller can retry after changing its input or setup.
    ///
    /// Only initialization failures are fatal for the process.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Initialization(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
