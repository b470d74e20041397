use std::collections::HashSet;

use super::*;
use crate::{
    cap::{AdjustRule, CapFlags, CapabilityDescriptor, Codec, SetRule},
    hfi::{LayerType, RcType},
    registry::Registry,
    transport::RecordingTransport,
    v4l2,
};

const CODECS: [Codec; 3] = [Codec::H264, Codec::Hevc, Codec::Heic];

fn reachable_from_roots(registry: &Registry) -> HashSet<CapId> {
    let mut seen = HashSet::new();
    let mut stack: Vec<CapId> = registry
        .descriptors()
        .filter(|d| d.is_root())
        .map(|d| d.id)
        .collect();
    while let Some(id) = stack.pop() {
        if seen.insert(id) {
            if let Some(desc) = registry.get(id) {
                stack.extend(desc.children.iter().copied());
            }
        }
    }
    seen
}

#[test]
fn test_static_pass_visits_each_cap_once() -> anyhow::Result<()> {
    for codec in CODECS {
        let registry = Registry::builtin(codec)?;
        let mut state = CapabilityState::new(registry);
        let mut resolver = Resolver::new();
        let visited = resolver.static_pass(&mut state)?;

        let unique: HashSet<CapId> = visited.iter().copied().collect();
        assert_eq!(unique.len(), visited.len(), "{} visited a cap twice", codec);
        assert_eq!(unique, reachable_from_roots(registry), "{}", codec);

        let pending: Vec<CapId> = resolver.firmware().iter().collect();
        assert_eq!(pending, visited, "{}", codec);
    }
    Ok(())
}

#[test]
fn test_static_pass_resolves_parents_first() -> anyhow::Result<()> {
    for codec in CODECS {
        let registry = Registry::builtin(codec)?;
        let mut state = CapabilityState::new(registry);
        let visited = Resolver::new().static_pass(&mut state)?;
        let position = |id: CapId| visited.iter().position(|v| *v == id);
        for (i, id) in visited.iter().enumerate() {
            for parent in &registry.get(*id).map(|d| d.parents.clone()).unwrap_or_default() {
                if let Some(p) = position(*parent) {
                    assert!(p < i, "{}: {} resolved before parent {}", codec, id, parent);
                }
            }
        }
    }
    Ok(())
}

#[test]
fn test_adjusted_values_stay_in_range() -> anyhow::Result<()> {
    for codec in CODECS {
        let registry = Registry::builtin(codec)?;
        let mut state = CapabilityState::new(registry);
        state.set_value(CapId::LayerEnable, 1);
        state.set_value(CapId::EnhLayerCount, 5);
        state.set_value(CapId::GopSize, i32::MAX);
        Resolver::new().static_pass(&mut state)?;
        for desc in registry.descriptors().filter(|d| d.adjust.is_some()) {
            let value = state.value(desc.id);
            assert!(
                (desc.min..=desc.max).contains(&value),
                "{}: {} = {} outside [{}, {}]",
                codec,
                desc.id,
                value,
                desc.min,
                desc.max
            );
        }
    }
    Ok(())
}

#[test]
fn test_cbr_resolution() -> anyhow::Result<()> {
    let mut state = CapabilityState::new(Registry::builtin(Codec::H264)?);
    state.set_value(CapId::BitrateMode, v4l2::MPEG_VIDEO_BITRATE_MODE_CBR);
    Resolver::new().static_pass(&mut state)?;
    assert_eq!(state.rc_type, RcType::CbrCfr);
    Ok(())
}

#[test]
fn test_hier_b_frames() -> anyhow::Result<()> {
    let mut state = CapabilityState::new(Registry::builtin(Codec::Hevc)?);
    state.set_value(CapId::LayerType, v4l2::MPEG_VIDEO_HIERARCHICAL_CODING_B);
    state.set_value(CapId::EnhLayerCount, 5);
    Resolver::new().static_pass(&mut state)?;
    assert_eq!(state.layer_type, LayerType::HierB);
    assert_eq!(state.value(CapId::EnhLayerCount), 3);
    assert_eq!(state.value(CapId::BFrame), 7);
    assert!([0, 1, 3, 7].contains(&state.value(CapId::BFrame)));
    Ok(())
}

#[test]
fn test_dynamic_enqueues_children_only_on_change() -> anyhow::Result<()> {
    let mut state = CapabilityState::new(Registry::builtin(Codec::Hevc)?);
    state.set_value(CapId::BitrateMode, v4l2::MPEG_VIDEO_BITRATE_MODE_CBR);
    state.set_value(CapId::EnhLayerCount, 3);
    state.set_value(CapId::GopSize, 30);
    let mut resolver = Resolver::new();
    resolver.static_pass(&mut state)?;
    resolver.discard();
    state.streaming = true;
    assert_eq!(state.layer_type, LayerType::HierPSlidingWindow);
    assert_eq!(state.value(CapId::GopSize), 32);

    let touched = resolver.dynamic_pass(&mut state, CapId::EnhLayerCount, 3)?;
    assert_eq!(touched, vec![CapId::EnhLayerCount]);
    assert_eq!(resolver.firmware().len(), 1, "re-added even when unchanged");

    resolver.discard();
    let touched = resolver.dynamic_pass(&mut state, CapId::EnhLayerCount, 1)?;
    assert_eq!(touched, vec![CapId::EnhLayerCount, CapId::GopSize, CapId::BFrame]);
    assert_eq!(state.value(CapId::GopSize), 32);
    assert_eq!(state.value(CapId::BFrame), 0);
    Ok(())
}

#[test]
fn test_dynamic_rejects_static_cap() -> anyhow::Result<()> {
    let mut state = CapabilityState::new(Registry::builtin(Codec::H264)?);
    let mut resolver = Resolver::new();
    resolver.static_pass(&mut state)?;
    resolver.discard();
    state.streaming = true;
    let err = resolver
        .dynamic_pass(&mut state, CapId::Profile, v4l2::MPEG_VIDEO_H264_PROFILE_MAIN)
        .unwrap_err();
    assert!(matches!(err, CapError::NotDynamicallyAllowed(CapId::Profile)));
    assert!(resolver.firmware().is_empty());
    Ok(())
}

#[test]
fn test_dynamic_child_must_be_dynamic() -> anyhow::Result<()> {
    let table = vec![
        CapabilityDescriptor::new(CapId::BitrateMode, 1, 0)
            .with_flags(CapFlags::ROOT | CapFlags::DYNAMIC_ALLOWED)
            .with_children(&[CapId::TimeDeltaBasedRc])
            .with_adjust(AdjustRule::BitrateMode),
        CapabilityDescriptor::new(CapId::TimeDeltaBasedRc, 2, 0)
            .with_range(0, 1, 1, 1)
            .with_parents(&[CapId::BitrateMode])
            .with_adjust(AdjustRule::TimeDeltaBasedRc)
            .with_set(SetRule::U32),
    ];
    let registry = Registry::new(Codec::H264, table)?;
    let mut state = CapabilityState::new(&registry);
    let mut resolver = Resolver::new();
    resolver.static_pass(&mut state)?;
    resolver.discard();
    state.streaming = true;
    let err = resolver
        .dynamic_pass(&mut state, CapId::BitrateMode, v4l2::MPEG_VIDEO_BITRATE_MODE_CBR)
        .unwrap_err();
    assert!(matches!(err, CapError::NotDynamicallyAllowed(CapId::TimeDeltaBasedRc)));
    assert!(resolver.firmware().is_empty());
    Ok(())
}

#[test]
fn test_failed_dynamic_pass_keeps_earlier_pending() -> anyhow::Result<()> {
    let mut state = CapabilityState::new(Registry::builtin(Codec::H264)?);
    state.set_value(CapId::BitrateMode, v4l2::MPEG_VIDEO_BITRATE_MODE_CBR);
    state.set_value(CapId::LtrCount, 1);
    let mut resolver = Resolver::new();
    resolver.static_pass(&mut state)?;
    resolver.discard();
    state.streaming = true;

    resolver.dynamic_pass(&mut state, CapId::BitRate, 4_000_000)?;
    let err = resolver
        .dynamic_pass(&mut state, CapId::UseLtr, 3)
        .unwrap_err();
    assert!(matches!(err, CapError::InvalidValue { cap: CapId::UseLtr, value: 3 }));
    let pending: Vec<CapId> = resolver.firmware().iter().collect();
    assert_eq!(pending, vec![CapId::BitRate]);
    Ok(())
}

#[test]
fn test_missing_parent_aborts_static_pass() -> anyhow::Result<()> {
    let table = vec![
        CapabilityDescriptor::new(CapId::PixFmts, 1, 0).with_flags(CapFlags::ROOT),
        CapabilityDescriptor::new(CapId::GopSize, 2, 0)
            .with_range(0, 100, 1, 30)
            .with_flags(CapFlags::ROOT)
            .with_adjust(AdjustRule::GopSize),
    ];
    let registry = Registry::new(Codec::H264, table)?;
    let mut state = CapabilityState::new(&registry);
    let mut resolver = Resolver::new();
    let err = resolver.static_pass(&mut state).unwrap_err();
    assert!(matches!(
        err,
        CapError::MissingParent {
            cap: CapId::GopSize,
            parent: CapId::EnhLayerCount
        }
    ));
    assert!(resolver.firmware().is_empty());
    Ok(())
}

#[test]
fn test_drain_failure_discards_queue() -> anyhow::Result<()> {
    let mut state = CapabilityState::new(Registry::builtin(Codec::Hevc)?);
    let mut resolver = Resolver::new();
    resolver.static_pass(&mut state)?;
    assert!(resolver.firmware().len() > 2);

    let mut transport = RecordingTransport::new().with_fail_after(2);
    let err = resolver.drain(&state, &mut transport).unwrap_err();
    assert!(matches!(err, CapError::Transport(_)));
    assert_eq!(transport.sent.len(), 2);
    assert!(resolver.firmware().is_empty());
    Ok(())
}
