//! Encoder capability resolution: a per-codec dependency graph of encoder
//! parameters, the passes that keep it consistent and the packetizer that
//! turns resolved values into property packets for the codec engine.

pub mod adjust;
pub mod cap;
pub mod database;
pub mod error;
pub mod handle;
pub mod hfi;
pub mod packetizer;
pub mod queue;
pub mod registry;
pub mod resolver;
pub mod session;
pub mod state;
pub mod transport;
pub mod v4l2;

pub use cap::{CapFlags, CapId, CapabilityDescriptor, Codec};
pub use error::{CapError, Result};
pub use handle::SessionHandle;
pub use packetizer::DrainReport;
pub use registry::Registry;
pub use session::{PortSettings, Session, SessionConfig, SessionState};
pub use transport::{RecordingTransport, Transport, WirePayload};
