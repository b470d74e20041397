use std::fmt;

use bytes::Bytes;

use crate::hfi::{PayloadKind, Port};

/// One property packet ready for the remote engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WirePayload {
    pub wire_id: u32,
    pub host_flags: u32,
    pub port: Port,
    pub kind: PayloadKind,
    /// Always four little-endian bytes.
    pub bytes: Bytes,
}

impl WirePayload {
    pub fn new(wire_id: u32, port: Port, kind: PayloadKind, value: u32) -> Self {
        Self {
            wire_id,
            host_flags: crate::hfi::HOST_FLAGS_NONE,
            port,
            kind,
            bytes: Bytes::copy_from_slice(&value.to_le_bytes()),
        }
    }

    pub fn value(&self) -> u32 {
        let mut raw = [0u8; 4];
        let len = self.bytes.len().min(4);
        raw[..len].copy_from_slice(&self.bytes[..len]);
        u32::from_le_bytes(raw)
    }
}

impl fmt::Display for WirePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "prop {:#010x} port {} kind {:?} value {:#x}",
            self.wire_id,
            self.port,
            self.kind,
            self.value()
        )
    }
}

/// Outbound seam to whatever delivers property packets.
pub trait Transport {
    fn send_property(&mut self, payload: &WirePayload) -> anyhow::Result<()>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send_property(&mut self, payload: &WirePayload) -> anyhow::Result<()> {
        (**self).send_property(payload)
    }
}

/// Keeps every payload in memory. Can be told to fail after a number of sends.
#[derive(Debug, Default, Clone)]
pub struct RecordingTransport {
    pub sent: Vec<WirePayload>,
    fail_after: Option<usize>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fail_after(mut self, sends: usize) -> Self {
        self.fail_after = Some(sends);
        self
    }

    pub fn ids(&self) -> Vec<u32> {
        self.sent.iter().map(|p| p.wire_id).collect()
    }

    pub fn last_for(&self, wire_id: u32) -> Option<&WirePayload> {
        self.sent.iter().rev().find(|p| p.wire_id == wire_id)
    }

    pub fn clear(&mut self) {
        self.sent.clear();
    }
}

impl Transport for RecordingTransport {
    fn send_property(&mut self, payload: &WirePayload) -> anyhow::Result<()> {
        if self.fail_after.is_some_and(|n| self.sent.len() >= n) {
            anyhow::bail!("remote engine rejected {:#x}", payload.wire_id);
        }
        self.sent.push(payload.clone());
        Ok(())
    }
}
