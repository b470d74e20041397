use crate::cap::CapId;

pub type Result<T> = std::result::Result<T, CapError>;

#[derive(Debug, thiserror::Error)]
pub enum CapError {
    #[error("invalid params: {0}")]
    InvalidParams(&'static str),

    /// The capability table declares a dependency that has no resolved value.
    #[error("missing parent {parent} for cap {cap}, please correct database")]
    MissingParent { cap: CapId, parent: CapId },

    #[error("malformed descriptor for cap {cap}: {reason}")]
    MalformedDescriptor { cap: CapId, reason: String },

    /// Raised after activation; the session is in the error state afterwards.
    #[error("dynamic setting of cap {0} is not allowed")]
    NotDynamicallyAllowed(CapId),

    #[error("invalid value {value} for cap {cap}")]
    InvalidValue { cap: CapId, value: i32 },

    /// Non-fatal: the payload was still produced with `fallback`.
    #[error("invalid value {value} for cap {cap}, set default: {fallback:#x}")]
    InvalidEnumMapping { cap: CapId, value: i32, fallback: u32 },

    #[error("could not find cap for control {0:#x}")]
    UnknownControl(u32),

    #[error("unknown capability name: {0}")]
    UnknownName(String),

    #[error("set ctrl not allowed in error state")]
    SessionErrorState,

    #[error("transport error: {0:#}")]
    Transport(anyhow::Error),

    #[error("port settings update failed: {0:#}")]
    PortSettings(anyhow::Error),

    #[error("session handle closed")]
    HandleClosed,
}

impl CapError {
    pub(crate) fn malformed(cap: CapId, reason: impl Into<String>) -> Self {
        CapError::MalformedDescriptor {
            cap,
            reason: reason.into(),
        }
    }
}
