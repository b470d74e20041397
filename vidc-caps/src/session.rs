//! One encoder session: the inbound control surface over the resolver.

use serde::Deserialize;

use crate::{
    cap::{CapId, Codec},
    error::{CapError, Result},
    packetizer::DrainReport,
    registry::Registry,
    resolver::Resolver,
    state::CapabilityState,
    transport::Transport,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SessionConfig {
    pub codec: Codec,
    /// Dynamic changes wait for [`Session::commit`] instead of being sent
    /// right away.
    #[serde(default)]
    pub request_batched: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            codec: Codec::H264,
            request_batched: false,
        }
    }
}

impl SessionConfig {
    pub fn new(codec: Codec) -> Self {
        Self {
            codec,
            ..Default::default()
        }
    }

    pub fn with_request_batched(mut self, request_batched: bool) -> Self {
        self.request_batched = request_batched;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Configuring,
    Streaming,
    /// Terminal. Every further call is refused.
    Error,
}

/// Buffer and port recomputation that pre-activation changes can require.
pub trait PortSettings {
    fn update_bitstream_buffer_size(&mut self, _state: &CapabilityState<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    fn update_meta_port_settings(&mut self, _state: &CapabilityState<'_>) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPortSettings;

impl PortSettings for NoopPortSettings {}

pub struct Session<'r, T> {
    config: SessionConfig,
    state: CapabilityState<'r>,
    resolver: Resolver,
    transport: T,
    port_settings: Box<dyn PortSettings + Send>,
    session_state: SessionState,
}

impl<T: Transport> Session<'static, T> {
    /// Session over the built-in table for `config.codec`.
    pub fn new(config: SessionConfig, transport: T) -> Result<Self> {
        let registry = Registry::builtin(config.codec)?;
        Session::with_registry(config, registry, transport)
    }
}

impl<'r, T: Transport> Session<'r, T> {
    pub fn with_registry(config: SessionConfig, registry: &'r Registry, transport: T) -> Result<Self> {
        if registry.codec() != config.codec {
            return Err(CapError::InvalidParams("registry codec does not match session codec"));
        }
        log::info!(
            "{} session created{}",
            config.codec,
            if config.request_batched { ", request batched" } else { "" }
        );
        Ok(Self {
            config,
            state: CapabilityState::new(registry),
            resolver: Resolver::new(),
            transport,
            port_settings: Box::new(NoopPortSettings),
            session_state: SessionState::Configuring,
        })
    }

    pub fn with_port_settings(mut self, port_settings: impl PortSettings + Send + 'static) -> Self {
        self.port_settings = Box::new(port_settings);
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn session_state(&self) -> SessionState {
        self.session_state
    }

    pub fn state(&self) -> &CapabilityState<'r> {
        &self.state
    }

    pub fn value(&self, id: CapId) -> i32 {
        self.state.value(id)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Caps waiting for the next drain, in send order.
    pub fn pending(&self) -> Vec<CapId> {
        self.resolver.firmware().iter().collect()
    }

    /// Sets a control by its front-end id.
    pub fn apply(&mut self, external_id: u32, value: i32) -> Result<DrainReport> {
        self.ensure_usable()?;
        let id = self.state.registry().lookup_by_external_id(external_id)?;
        self.apply_cap(id, value)
    }

    pub fn apply_named(&mut self, name: &str, value: i32) -> Result<DrainReport> {
        self.ensure_usable()?;
        let id = self.state.registry().lookup_by_name(name)?;
        self.apply_cap(id, value)
    }

    fn apply_cap(&mut self, id: CapId, value: i32) -> Result<DrainReport> {
        let desc = self
            .state
            .descriptor(id)
            .ok_or(CapError::InvalidParams("apply on an unregistered capability"))?;
        if !desc.accepts(value) {
            log::error!(
                "{}: value {} outside [{}, {}] (step/mask {:#x})",
                id,
                value,
                desc.min,
                desc.max,
                desc.step_or_mask
            );
            return Err(CapError::InvalidValue { cap: id, value });
        }
        log::debug!("{}: client set {:#x}", id, value);

        if self.session_state == SessionState::Configuring {
            self.state.mark_client_set(id);
            self.state.set_value(id, value);
            if id == CapId::MinBitstreamSizeOverwrite {
                self.port_settings
                    .update_bitstream_buffer_size(&self.state)
                    .map_err(CapError::PortSettings)?;
            }
            if id.is_meta() {
                self.port_settings
                    .update_meta_port_settings(&self.state)
                    .map_err(CapError::PortSettings)?;
            }
            return Ok(DrainReport::default());
        }

        if let Err(e) = self.resolver.dynamic_pass(&mut self.state, id, value) {
            if matches!(e, CapError::NotDynamicallyAllowed(_)) {
                log::error!("{}: session moved to error state", id);
                self.session_state = SessionState::Error;
            }
            return Err(e);
        }
        self.state.mark_client_set(id);
        if self.config.request_batched {
            log::debug!("{}: held for commit, {} pending", id, self.resolver.firmware().len());
            return Ok(DrainReport::default());
        }
        self.resolver.drain(&self.state, &mut self.transport)
    }

    /// Runs the static pass, sends everything it resolved and starts
    /// streaming.
    pub fn activate(&mut self) -> Result<DrainReport> {
        self.ensure_usable()?;
        if self.session_state == SessionState::Streaming {
            return Err(CapError::InvalidParams("session already streaming"));
        }
        self.resolver.static_pass(&mut self.state)?;
        let report = self.resolver.drain(&self.state, &mut self.transport)?;
        self.state.streaming = true;
        self.session_state = SessionState::Streaming;
        log::info!(
            "{} session streaming, {} properties sent, rc {:?}, layers {:?}",
            self.config.codec,
            report.sent.len(),
            self.state.rc_type,
            self.state.layer_type
        );
        Ok(report)
    }

    /// Sends whatever dynamic changes are pending.
    pub fn commit(&mut self) -> Result<DrainReport> {
        self.ensure_usable()?;
        self.resolver.drain(&self.state, &mut self.transport)
    }

    fn ensure_usable(&self) -> Result<()> {
        if self.session_state == SessionState::Error {
            log::error!("{} session in error state, call refused", self.config.codec);
            return Err(CapError::SessionErrorState);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;
