//! Per-codec capability tables.
//!
//! A registry is immutable once built. The built-in tables live in process-wide
//! statics and are shared by every session without locking; callers may also
//! build their own table with [`Registry::new`] and lend it to sessions.

use std::sync::LazyLock;

use crate::{
    cap::{CapFlags, CapId, CapabilityDescriptor, Codec},
    database,
    error::{CapError, Result},
};

#[derive(Debug)]
pub struct Registry {
    codec: Codec,
    caps: Vec<Option<CapabilityDescriptor>>,
}

static H264: LazyLock<Result<Registry>> =
    LazyLock::new(|| Registry::new(Codec::H264, database::table(Codec::H264)));
static HEVC: LazyLock<Result<Registry>> =
    LazyLock::new(|| Registry::new(Codec::Hevc, database::table(Codec::Hevc)));
static HEIC: LazyLock<Result<Registry>> =
    LazyLock::new(|| Registry::new(Codec::Heic, database::table(Codec::Heic)));

impl Registry {
    /// Builds and validates a table. Each capability may appear once.
    pub fn new(codec: Codec, descriptors: Vec<CapabilityDescriptor>) -> Result<Self> {
        let mut caps: Vec<Option<CapabilityDescriptor>> = vec![None; CapId::COUNT];
        for desc in descriptors {
            let slot = &mut caps[desc.id.index()];
            if slot.is_some() {
                return Err(CapError::malformed(desc.id, "registered twice"));
            }
            *slot = Some(desc);
        }
        let registry = Self { codec, caps };
        registry.validate()?;
        log::debug!(
            "{} capability table ready, {} caps registered",
            codec,
            registry.descriptors().count()
        );
        Ok(registry)
    }

    /// The shared built-in table for `codec`.
    pub fn builtin(codec: Codec) -> Result<&'static Registry> {
        let table = match codec {
            Codec::H264 => &*H264,
            Codec::Hevc => &*HEVC,
            Codec::Heic => &*HEIC,
        };
        table.as_ref().map_err(|e| match e {
            CapError::MalformedDescriptor { cap, reason } => CapError::malformed(*cap, reason.clone()),
            _ => CapError::InvalidParams("built-in capability table failed to build"),
        })
    }

    pub fn codec(&self) -> Codec {
        self.codec
    }

    /// `None` means the capability is not registered for this codec.
    pub fn get(&self, id: CapId) -> Option<&CapabilityDescriptor> {
        self.caps[id.index()].as_ref()
    }

    pub fn contains(&self, id: CapId) -> bool {
        self.get(id).is_some()
    }

    /// Registered descriptors in registry order.
    pub fn descriptors(&self) -> impl Iterator<Item = &CapabilityDescriptor> {
        self.caps.iter().flatten()
    }

    pub fn lookup_by_external_id(&self, external_id: u32) -> Result<CapId> {
        self.descriptors()
            .find(|d| d.external_id == external_id)
            .map(|d| d.id)
            .ok_or(CapError::UnknownControl(external_id))
    }

    pub fn lookup_by_name(&self, name: &str) -> Result<CapId> {
        CapId::from_name(name)
            .filter(|id| self.contains(*id))
            .ok_or_else(|| CapError::UnknownName(name.to_string()))
    }

    /// Checks the authoring rules every table must follow.
    pub fn validate(&self) -> Result<()> {
        for desc in self.descriptors() {
            if !desc.accepts(desc.default) {
                return Err(CapError::malformed(
                    desc.id,
                    format!(
                        "default {} outside [{}, {}] (step/mask {:#x})",
                        desc.default, desc.min, desc.max, desc.step_or_mask
                    ),
                ));
            }
            if desc.flags.contains(CapFlags::CLIENT_SET) {
                return Err(CapError::malformed(desc.id, "CLIENT_SET is instance state"));
            }
            if desc.external_id != 0
                && self
                    .descriptors()
                    .any(|other| other.id != desc.id && other.external_id == desc.external_id)
            {
                return Err(CapError::malformed(
                    desc.id,
                    format!("external id {:#x} is not unique", desc.external_id),
                ));
            }
            if desc.is_dynamic_allowed() && !desc.children.is_empty() && desc.adjust.is_none() {
                return Err(CapError::malformed(
                    desc.id,
                    "dynamic cap with children needs an adjust rule",
                ));
            }
            for child in &desc.children {
                let Some(child_desc) = self.get(*child) else {
                    return Err(CapError::malformed(
                        desc.id,
                        format!("child {} is not registered", child),
                    ));
                };
                if !child_desc.has_parent(desc.id) {
                    return Err(CapError::malformed(
                        *child,
                        format!("does not declare parent {}", desc.id),
                    ));
                }
                if desc.is_dynamic_allowed() && child_desc.adjust.is_none() {
                    return Err(CapError::malformed(
                        *child,
                        format!("child of dynamic cap {} needs an adjust rule", desc.id),
                    ));
                }
            }
            for parent in &desc.parents {
                let Some(parent_desc) = self.get(*parent) else {
                    return Err(CapError::malformed(
                        desc.id,
                        format!("parent {} is not registered", parent),
                    ));
                };
                if !parent_desc.children.contains(&desc.id) {
                    return Err(CapError::malformed(
                        *parent,
                        format!("does not list child {}", desc.id),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cap::{AdjustRule, SetRule};

    #[test]
    fn test_builtin_tables_validate() -> anyhow::Result<()> {
        for codec in [Codec::H264, Codec::Hevc, Codec::Heic] {
            let registry = Registry::builtin(codec)?;
            assert_eq!(registry.codec(), codec);
            assert!(registry.contains(CapId::BitrateMode));
            assert!(registry.descriptors().any(|d| d.is_root()));
        }
        Ok(())
    }

    #[test]
    fn test_codec_specific_caps() -> anyhow::Result<()> {
        let h264 = Registry::builtin(Codec::H264)?;
        let hevc = Registry::builtin(Codec::Hevc)?;
        assert!(h264.contains(CapId::EntropyMode));
        assert!(h264.contains(CapId::Transform8x8));
        assert!(!hevc.contains(CapId::EntropyMode));
        assert!(!hevc.contains(CapId::Transform8x8));
        assert!(hevc.contains(CapId::Tier));
        Ok(())
    }

    #[test]
    fn test_lookup_by_external_id() -> anyhow::Result<()> {
        let registry = Registry::builtin(Codec::H264)?;
        let id = registry.lookup_by_external_id(crate::v4l2::CID_MPEG_VIDEO_GOP_SIZE)?;
        assert_eq!(id, CapId::GopSize);
        assert!(matches!(
            registry.lookup_by_external_id(0xdead_beef),
            Err(CapError::UnknownControl(0xdead_beef))
        ));
        Ok(())
    }

    #[test]
    fn test_lookup_by_name() -> anyhow::Result<()> {
        let h264 = Registry::builtin(Codec::H264)?;
        assert_eq!(h264.lookup_by_name("ENTROPY_MODE")?, CapId::EntropyMode);
        let hevc = Registry::builtin(Codec::Hevc)?;
        assert!(matches!(
            hevc.lookup_by_name("ENTROPY_MODE"),
            Err(CapError::UnknownName(_))
        ));
        Ok(())
    }

    #[test]
    fn test_asymmetric_child_rejected() {
        let table = vec![
            CapabilityDescriptor::new(CapId::LtrCount, 1, 0)
                .with_flags(CapFlags::ROOT)
                .with_children(&[CapId::UseLtr]),
            CapabilityDescriptor::new(CapId::UseLtr, 2, 0)
                .with_adjust(AdjustRule::UseLtr)
                .with_set(SetRule::UseAndMarkLtr),
        ];
        let err = Registry::new(Codec::H264, table).unwrap_err();
        assert!(matches!(
            err,
            CapError::MalformedDescriptor { cap: CapId::UseLtr, .. }
        ));
    }

    #[test]
    fn test_dynamic_parent_without_adjust_rejected() {
        let table = vec![
            CapabilityDescriptor::new(CapId::LtrCount, 1, 0)
                .with_flags(CapFlags::ROOT | CapFlags::DYNAMIC_ALLOWED)
                .with_children(&[CapId::UseLtr]),
            CapabilityDescriptor::new(CapId::UseLtr, 2, 0)
                .with_parents(&[CapId::LtrCount])
                .with_adjust(AdjustRule::UseLtr),
        ];
        let err = Registry::new(Codec::H264, table).unwrap_err();
        assert!(matches!(
            err,
            CapError::MalformedDescriptor { cap: CapId::LtrCount, .. }
        ));
    }

    #[test]
    fn test_duplicate_and_default_out_of_range_rejected() {
        let dup = vec![
            CapabilityDescriptor::new(CapId::GopSize, 1, 0),
            CapabilityDescriptor::new(CapId::GopSize, 2, 0),
        ];
        assert!(Registry::new(Codec::H264, dup).is_err());

        let bad_default =
            vec![CapabilityDescriptor::new(CapId::GopSize, 1, 0).with_range(1, 10, 1, 0)];
        assert!(Registry::new(Codec::H264, bad_default).is_err());
    }
}
