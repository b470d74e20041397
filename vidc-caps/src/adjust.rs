//! Recomputation rules run by the resolver.
//!
//! Every rule reads the cap's own value (or the caller's `trigger` value when
//! one is given), consults its parents and stores the result back into the
//! instance state. Rules never touch the queues.

use crate::{
    cap::{AdjustRule, CapId, Codec},
    database::{
        MAX_AVC_ENH_LAYER_HYBRID_HP, MAX_AVC_ENH_LAYER_SLIDING_WINDOW, MAX_ENH_LAYER_HB,
        MAX_HEVC_ENH_LAYER_SLIDING_WINDOW,
    },
    error::{CapError, Result},
    hfi::{LayerType, RcType},
    state::CapabilityState,
    v4l2,
};

pub fn run(
    state: &mut CapabilityState<'_>,
    id: CapId,
    rule: AdjustRule,
    trigger: Option<i32>,
) -> Result<()> {
    match rule {
        AdjustRule::BitrateMode => bitrate_mode(state, id, trigger),
        AdjustRule::Profile => profile(state, id, trigger),
        AdjustRule::EntropyMode => entropy_mode(state, id, trigger),
        AdjustRule::Transform8x8 => transform_8x8(state, id, trigger),
        AdjustRule::LtrCount => ltr_count(state, id, trigger),
        AdjustRule::UseLtr => use_ltr(state, id, trigger),
        AdjustRule::MarkLtr => mark_ltr(state, id, trigger),
        AdjustRule::IrRandom => ir_random(state, id, trigger),
        AdjustRule::TimeDeltaBasedRc => time_delta_based_rc(state, id, trigger),
        AdjustRule::LayerCount => layer_count(state, id, trigger),
        AdjustRule::GopSize => gop_size(state, id, trigger),
        AdjustRule::BFrame => b_frame(state, id, trigger),
        AdjustRule::HevcMinQp => hevc_qp(
            state,
            id,
            trigger,
            &[CapId::IFrameMinQp, CapId::PFrameMinQp, CapId::BFrameMinQp],
        ),
        AdjustRule::HevcMaxQp => hevc_qp(
            state,
            id,
            trigger,
            &[CapId::IFrameMaxQp, CapId::PFrameMaxQp, CapId::BFrameMaxQp],
        ),
        AdjustRule::HevcFrameQp => {
            hevc_qp(state, id, trigger, &[CapId::PFrameQp, CapId::BFrameQp])
        }
    }
}

fn input(state: &CapabilityState<'_>, id: CapId, trigger: Option<i32>) -> i32 {
    trigger.unwrap_or_else(|| state.value(id))
}

fn is_rc(value: i32, kinds: &[RcType]) -> bool {
    kinds.iter().any(|kind| kind.as_u32() as i32 == value)
}

fn bitrate_mode(state: &mut CapabilityState<'_>, id: CapId, trigger: Option<i32>) -> Result<()> {
    let mode = input(state, id, trigger);
    state.set_value(id, mode);

    let rc = if state.value(CapId::Lossless) != 0 {
        RcType::Lossless
    } else if state.value(CapId::FrameRcEnable) == 0 && !state.codec().is_image() {
        RcType::Off
    } else {
        match mode {
            v4l2::MPEG_VIDEO_BITRATE_MODE_VBR => RcType::VbrCfr,
            v4l2::MPEG_VIDEO_BITRATE_MODE_CBR if state.value(CapId::FrameSkipMode) != 0 => {
                RcType::CbrVfr
            }
            v4l2::MPEG_VIDEO_BITRATE_MODE_CBR => RcType::CbrCfr,
            v4l2::MPEG_VIDEO_BITRATE_MODE_CQ => RcType::Cq,
            _ => RcType::VbrCfr,
        }
    };
    if state.rc_type != rc {
        log::debug!("rc type resolved to {:?} (mode {})", rc, mode);
    }
    state.rc_type = rc;
    Ok(())
}

fn profile(state: &mut CapabilityState<'_>, id: CapId, trigger: Option<i32>) -> Result<()> {
    let mut value = input(state, id, trigger);
    let pix_fmt = state.parent_value(id, CapId::PixFmts)?;

    if v4l2::is_10bit_format(pix_fmt) {
        value = v4l2::MPEG_VIDEO_HEVC_PROFILE_MAIN_10;
    } else if value == v4l2::MPEG_VIDEO_HEVC_PROFILE_MAIN_10 {
        value = if state.codec().is_image() {
            v4l2::MPEG_VIDEO_HEVC_PROFILE_MAIN_STILL_PICTURE
        } else {
            v4l2::MPEG_VIDEO_HEVC_PROFILE_MAIN
        };
    }
    state.set_value(id, value);
    Ok(())
}

fn entropy_mode(state: &mut CapabilityState<'_>, id: CapId, trigger: Option<i32>) -> Result<()> {
    if state.codec() != Codec::H264 {
        log::error!("{}: incorrect entry in database for codec {}, fix database", id, state.codec());
        return Ok(());
    }
    let mut value = input(state, id, trigger);
    let profile = state.parent_value(id, CapId::Profile)?;
    if profile == v4l2::MPEG_VIDEO_H264_PROFILE_BASELINE
        || profile == v4l2::MPEG_VIDEO_H264_PROFILE_CONSTRAINED_BASELINE
    {
        value = v4l2::MPEG_VIDEO_H264_ENTROPY_MODE_CAVLC;
    }
    state.set_value(id, value);
    Ok(())
}

fn transform_8x8(state: &mut CapabilityState<'_>, id: CapId, trigger: Option<i32>) -> Result<()> {
    if state.codec() != Codec::H264 {
        log::error!("{}: incorrect entry in database for codec {}, fix database", id, state.codec());
        return Ok(());
    }
    let mut value = input(state, id, trigger);
    let profile = state.parent_value(id, CapId::Profile)?;
    if profile != v4l2::MPEG_VIDEO_H264_PROFILE_HIGH
        && profile != v4l2::MPEG_VIDEO_H264_PROFILE_CONSTRAINED_HIGH
    {
        value = 0;
    }
    state.set_value(id, value);
    Ok(())
}

fn ltr_count(state: &mut CapabilityState<'_>, id: CapId, trigger: Option<i32>) -> Result<()> {
    let mut value = input(state, id, trigger);
    let rc = state.parent_value(id, CapId::BitrateMode)?;
    if !is_rc(rc, &[RcType::Off, RcType::CbrCfr, RcType::CbrVfr]) {
        value = 0;
    }
    state.set_value(id, value);
    Ok(())
}

/// The bitmask of LTR frames to reference must be non-empty and fit the count.
fn use_ltr(state: &mut CapabilityState<'_>, id: CapId, trigger: Option<i32>) -> Result<()> {
    let mut value = input(state, id, trigger);
    let count = state.parent_value(id, CapId::LtrCount)?;
    if count == 0 {
        value = 0;
    } else if trigger.is_some() || state.is_client_set(id) {
        let limit = 1i64 << count.clamp(0, 31);
        if value <= 0 || i64::from(value) >= limit {
            log::error!("{}: invalid value {}, ltr count {}", id, value, count);
            return Err(CapError::InvalidValue { cap: id, value });
        }
    }
    state.set_value(id, value);
    Ok(())
}

fn mark_ltr(state: &mut CapabilityState<'_>, id: CapId, trigger: Option<i32>) -> Result<()> {
    let mut value = input(state, id, trigger);
    let count = state.parent_value(id, CapId::LtrCount)?;
    if count == 0 {
        value = 0;
    } else if (trigger.is_some() || state.is_client_set(id)) && !(0..count).contains(&value) {
        log::error!("{}: invalid index {}, ltr count {}", id, value, count);
        return Err(CapError::InvalidValue { cap: id, value });
    }
    state.set_value(id, value);
    Ok(())
}

fn ir_random(state: &mut CapabilityState<'_>, id: CapId, trigger: Option<i32>) -> Result<()> {
    let mut value = input(state, id, trigger);
    if let Some(rc) = state.optional_parent_value(id, CapId::BitrateMode) {
        if !is_rc(rc, &[RcType::CbrCfr, RcType::CbrVfr]) {
            value = 0;
        }
    }
    state.set_value(id, value);
    Ok(())
}

fn time_delta_based_rc(
    state: &mut CapabilityState<'_>,
    id: CapId,
    trigger: Option<i32>,
) -> Result<()> {
    let mut value = input(state, id, trigger);
    let rc = state.parent_value(id, CapId::BitrateMode)?;
    if is_rc(rc, &[RcType::Off, RcType::Cq]) {
        value = 0;
    }
    state.set_value(id, value);
    Ok(())
}

fn layer_count(state: &mut CapabilityState<'_>, id: CapId, trigger: Option<i32>) -> Result<()> {
    let rc = state.parent_value(id, CapId::BitrateMode)?;
    let value = input(state, id, trigger);

    if state.streaming {
        if !state.layer_type.is_hier_p() {
            log::info!("{}: dynamic layer change ignored for {:?}", id, state.layer_type);
            return Ok(());
        }
        state.set_value(id, value.min(state.enh_layer_ceiling));
        return Ok(());
    }

    let codec = state.codec();
    let hb_requested = state.value(CapId::LayerType) == v4l2::MPEG_VIDEO_HIERARCHICAL_CODING_B;
    let disabled = if value == 0 {
        Some("layer count is zero")
    } else if is_rc(rc, &[RcType::Cq]) {
        Some("not supported with CQ")
    } else if codec == Codec::H264 && state.value(CapId::LayerEnable) == 0 {
        Some("layer encoding disabled")
    } else if hb_requested && !is_rc(rc, &[RcType::VbrCfr]) {
        Some("hierarchical B needs VBR")
    } else {
        None
    };
    if let Some(reason) = disabled {
        log::debug!("{}: layer encoding off, {}", id, reason);
        state.set_value(id, 0);
        state.enh_layer_ceiling = 0;
        return Ok(());
    }

    let (layer_type, ceiling) = if hb_requested {
        (LayerType::HierB, MAX_ENH_LAYER_HB)
    } else if codec == Codec::H264 && is_rc(rc, &[RcType::VbrCfr]) {
        (LayerType::HierPHybridLtr, MAX_AVC_ENH_LAYER_HYBRID_HP)
    } else if codec == Codec::H264 {
        (LayerType::HierPSlidingWindow, MAX_AVC_ENH_LAYER_SLIDING_WINDOW)
    } else {
        (LayerType::HierPSlidingWindow, MAX_HEVC_ENH_LAYER_SLIDING_WINDOW)
    };
    let count = value.min(ceiling);
    state.layer_type = layer_type;
    state.enh_layer_ceiling = count;
    state.set_value(id, count);
    Ok(())
}

fn gop_size(state: &mut CapabilityState<'_>, id: CapId, trigger: Option<i32>) -> Result<()> {
    let mut value = input(state, id, trigger);
    let count = state.parent_value(id, CapId::EnhLayerCount)?;
    if count > 0 && state.layer_type.is_hier_p() {
        value = round_gop(value, count);
    }
    state.set_value(id, value);
    Ok(())
}

/// Rounds `gop` to the nearest multiple of the temporal layer period.
pub(crate) fn round_gop(gop: i32, count: i32) -> i32 {
    let unit = 1i64 << count.clamp(0, 30);
    let n = (i64::from(gop) + unit / 2) / unit;
    let rounded = if n == 0 { unit } else { n * unit };
    let limit = i64::from(i32::MAX) - i64::from(i32::MAX) % unit;
    rounded.min(limit) as i32
}

fn b_frame(state: &mut CapabilityState<'_>, id: CapId, trigger: Option<i32>) -> Result<()> {
    if state.streaming {
        return Ok(());
    }
    let count = state.parent_value(id, CapId::EnhLayerCount)?;
    let value = if count > 0 && state.layer_type == LayerType::HierB {
        ((2i32 << count.clamp(0, 29)) - 1).min(7)
    } else {
        0
    };
    if trigger.is_some_and(|t| t != value) {
        log::debug!("{}: requested {:?} overridden to {}", id, trigger, value);
    }
    state.set_value(id, value);
    Ok(())
}

/// 8-bit sessions cannot use the negative QP range; clamps the cap and its
/// per-frame-type siblings together.
fn hevc_qp(
    state: &mut CapabilityState<'_>,
    id: CapId,
    trigger: Option<i32>,
    lockstep: &[CapId],
) -> Result<()> {
    if !state.codec().is_hevc_family() {
        return Err(CapError::malformed(id, format!("QP clamp used for {}", state.codec())));
    }
    let value = input(state, id, trigger);
    let pix_fmt = state.parent_value(id, CapId::PixFmts)?;
    state.set_value(id, value);
    if v4l2::is_10bit_format(pix_fmt) {
        return Ok(());
    }
    for cap in std::iter::once(id).chain(lockstep.iter().copied()) {
        if state.value(cap) < 0 {
            state.set_value(cap, 0);
        }
    }
    Ok(())
}
