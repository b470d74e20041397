//! Per-session capability values.

use crate::{
    cap::{CapId, CapabilityDescriptor, Codec},
    error::{CapError, Result},
    hfi::{LayerType, RcType},
    registry::Registry,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CapValue {
    pub value: i32,
    /// Sticky: once the client touched the cap it stays set for the session.
    pub client_set: bool,
}

#[derive(Debug, Clone)]
pub struct CapabilityState<'r> {
    registry: &'r Registry,
    caps: Vec<CapValue>,
    pub rc_type: RcType,
    pub layer_type: LayerType,
    /// Layer count resolved at activation; dynamic requests are clamped to it.
    pub enh_layer_ceiling: i32,
    pub streaming: bool,
}

impl<'r> CapabilityState<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        let mut caps = vec![CapValue::default(); CapId::COUNT];
        for desc in registry.descriptors() {
            caps[desc.id.index()].value = desc.default;
        }
        Self {
            registry,
            caps,
            rc_type: RcType::default(),
            layer_type: LayerType::default(),
            enh_layer_ceiling: 0,
            streaming: false,
        }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub fn codec(&self) -> Codec {
        self.registry.codec()
    }

    pub fn descriptor(&self, id: CapId) -> Option<&'r CapabilityDescriptor> {
        self.registry.get(id)
    }

    /// Unregistered caps read as 0.
    pub fn value(&self, id: CapId) -> i32 {
        self.caps[id.index()].value
    }

    pub fn set_value(&mut self, id: CapId, value: i32) {
        let slot = &mut self.caps[id.index()];
        if slot.value != value {
            log::debug!("{}: updated database value from {:#x} to {:#x}", id, slot.value, value);
        }
        slot.value = value;
    }

    pub fn is_client_set(&self, id: CapId) -> bool {
        self.caps[id.index()].client_set
    }

    pub fn mark_client_set(&mut self, id: CapId) {
        self.caps[id.index()].client_set = true;
    }

    /// Value of `parent` as seen by `cap`. Rate-control and layer-type parents
    /// resolve to their derived wire kinds rather than the raw menu value.
    pub fn parent_value(&self, cap: CapId, parent: CapId) -> Result<i32> {
        let declared = self
            .descriptor(cap)
            .is_some_and(|desc| desc.has_parent(parent));
        if !declared || !self.registry.contains(parent) {
            log::error!("missing parent {} for {}, please correct database", parent, cap);
            return Err(CapError::MissingParent { cap, parent });
        }
        Ok(match parent {
            CapId::BitrateMode => self.rc_type.as_u32() as i32,
            CapId::LayerType => self.layer_type.as_u32() as i32,
            _ => self.value(parent),
        })
    }

    /// Same as [`Self::parent_value`] for a parent the table may omit.
    pub fn optional_parent_value(&self, cap: CapId, parent: CapId) -> Option<i32> {
        let declared = self
            .descriptor(cap)
            .is_some_and(|desc| desc.has_parent(parent));
        if declared && self.registry.contains(parent) {
            self.parent_value(cap, parent).ok()
        } else {
            None
        }
    }

    pub fn is_10bit(&self) -> bool {
        crate::v4l2::is_10bit_format(self.value(CapId::PixFmts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_starts_from_defaults() -> anyhow::Result<()> {
        let registry = Registry::builtin(Codec::H264)?;
        let state = CapabilityState::new(registry);
        for desc in registry.descriptors() {
            assert_eq!(state.value(desc.id), desc.default, "{}", desc.id);
            assert!(!state.is_client_set(desc.id));
        }
        assert_eq!(state.value(CapId::Tier), 0);
        assert!(!state.streaming);
        Ok(())
    }

    #[test]
    fn test_parent_value() -> anyhow::Result<()> {
        let registry = Registry::builtin(Codec::Hevc)?;
        let mut state = CapabilityState::new(registry);
        state.rc_type = RcType::CbrCfr;
        assert_eq!(
            state.parent_value(CapId::LtrCount, CapId::BitrateMode)?,
            RcType::CbrCfr as i32
        );
        assert!(matches!(
            state.parent_value(CapId::LtrCount, CapId::PixFmts),
            Err(CapError::MissingParent {
                cap: CapId::LtrCount,
                parent: CapId::PixFmts
            })
        ));
        assert_eq!(state.optional_parent_value(CapId::GopSize, CapId::BitrateMode), None);
        Ok(())
    }
}
