//! Turns resolved capability values into wire payloads and drains the
//! firmware queue through a [`Transport`].

use crate::{
    cap::{CapFlags, CapId, CapabilityDescriptor, Codec, SetRule},
    error::{CapError, Result},
    hfi::{self, LayerType, PayloadKind, Port, RcType},
    queue::PendingSet,
    state::CapabilityState,
    transport::{Transport, WirePayload},
    v4l2,
};

/// Payloads for one capability. Empty means the set rule decided to send
/// nothing.
#[derive(Debug, Default)]
pub struct Serialized {
    pub payloads: Vec<WirePayload>,
    /// Non-fatal enum fallbacks, only ever [`CapError::InvalidEnumMapping`].
    pub diagnostics: Vec<CapError>,
}

/// What one drain delivered.
#[derive(Debug, Default)]
pub struct DrainReport {
    pub sent: Vec<WirePayload>,
    pub diagnostics: Vec<CapError>,
}

impl DrainReport {
    pub fn extend(&mut self, other: DrainReport) {
        self.sent.extend(other.sent);
        self.diagnostics.extend(other.diagnostics);
    }
}

const QP_10BIT_OFFSET: i32 = 12;

pub fn port_for(desc: &CapabilityDescriptor) -> Port {
    let input = desc.flags.contains(CapFlags::INPUT_PORT);
    let output = desc.flags.contains(CapFlags::OUTPUT_PORT);
    match (input, output) {
        (true, true) => {
            log::warn!("{}: both ports set, using bitstream port", desc.id);
            Port::Bitstream
        }
        (true, false) => Port::Raw,
        (false, true) => Port::Bitstream,
        (false, false) => Port::None,
    }
}

pub fn serialize(state: &CapabilityState<'_>, id: CapId) -> Result<Serialized> {
    let desc = state
        .descriptor(id)
        .ok_or(CapError::InvalidParams("serializing an unregistered capability"))?;
    let mut out = Serialized::default();
    let Some(rule) = desc.set else {
        return Ok(out);
    };
    let value = state.value(id);
    let mut payloads = Vec::new();
    let mut push = |target: &CapabilityDescriptor, kind: PayloadKind, v: u32| {
        payloads.push(WirePayload::new(target.wire_id, port_for(target), kind, v));
    };

    match rule {
        SetRule::U32 => {
            let v = if desc.is_menu() {
                menu_to_wire(state.codec(), id, value, &mut out.diagnostics)?
            } else {
                value as u32
            };
            push(desc, PayloadKind::U32, v);
        }
        SetRule::U32Enum => {
            let v = enum_to_wire(state, id, value, &mut out.diagnostics)?;
            push(desc, PayloadKind::U32Enum, v);
        }
        SetRule::S32 => push(desc, PayloadKind::S32, value as u32),
        SetRule::Q16 => push(desc, PayloadKind::Q16, value as u32),
        SetRule::HeaderMode => {
            let mut v = match value {
                v4l2::MPEG_VIDEO_HEADER_MODE_SEPARATE => hfi::SEQ_HEADER_SEPERATE_FRAME,
                v4l2::MPEG_VIDEO_HEADER_MODE_JOINED_WITH_1ST_FRAME => {
                    hfi::SEQ_HEADER_JOINED_WITH_1ST_FRAME
                }
                _ => 0,
            };
            if state.value(CapId::PrependSpsPpsToIdr) != 0 {
                v |= hfi::SEQ_HEADER_PREFIX_WITH_SYNC_FRAME;
            }
            if state.value(CapId::MetaSeqHdrNal) != 0 {
                v |= hfi::SEQ_HEADER_METADATA;
            }
            push(desc, PayloadKind::U32Enum, v);
        }
        SetRule::DeblockMode => {
            let mode = enum_to_wire(state, id, value, &mut out.diagnostics)?;
            let alpha = (state.value(CapId::LfAlpha) + 6) as u32;
            let beta = (state.value(CapId::LfBeta) + 6) as u32;
            push(
                desc,
                PayloadKind::Packed32,
                (alpha & 0xff) << 16 | (beta & 0xff) << 8 | mode,
            );
        }
        SetRule::ConstantQuality => {
            let rc = state.parent_value(id, CapId::BitrateMode)?;
            if rc == RcType::Cq.as_u32() as i32 {
                push(desc, PayloadKind::U32, value as u32);
            }
        }
        SetRule::UseAndMarkLtr => {
            if state.value(CapId::LtrCount) > 0 && state.is_client_set(id) {
                push(desc, PayloadKind::U32, value as u32);
            }
        }
        SetRule::MinQp => {
            let family = [CapId::IFrameMinQp, CapId::PFrameMinQp, CapId::BFrameMinQp];
            if let Some(v) = packed_qp(state, id, &family, i32::max) {
                push(desc, PayloadKind::Packed32, v);
            }
        }
        SetRule::MaxQp => {
            let family = [CapId::IFrameMaxQp, CapId::PFrameMaxQp, CapId::BFrameMaxQp];
            if let Some(v) = packed_qp(state, id, &family, i32::min) {
                push(desc, PayloadKind::Packed32, v);
            }
        }
        SetRule::FrameQp => {
            let rc = state.parent_value(id, CapId::BitrateMode)?;
            let family = [CapId::IFrameQp, CapId::PFrameQp, CapId::BFrameQp];
            let enable = if rc == RcType::Off.as_u32() as i32 {
                0b111
            } else {
                client_bits(state, &family)
            };
            if enable == 0 {
                log::debug!("{}: client did not set frame qp, rc {:#x}", id, rc);
            } else {
                let offset = if state.is_10bit() { QP_10BIT_OFFSET } else { 0 };
                let [i, p, b] = family.map(|cap| state.value(cap) + offset);
                push(desc, PayloadKind::Packed32, pack_qp(i, p, b, enable));
            }
        }
        SetRule::ReqSyncFrame => {
            let v = if state.value(CapId::PrependSpsPpsToIdr) != 0 {
                hfi::SYNC_FRAME_REQUEST_WITH_PREFIX_SEQ_HDR
            } else {
                hfi::SYNC_FRAME_REQUEST_WITHOUT_SEQ_HDR
            };
            push(desc, PayloadKind::U32Enum, v);
        }
        SetRule::ChromaQpIndexOffset => {
            let mode = if state.is_client_set(id) {
                hfi::FIXED_CHROMAQP_OFFSET
            } else {
                hfi::ADAPTIVE_CHROMAQP_OFFSET
            };
            let offset = ((value + 12) as u32) & 0xff;
            push(desc, PayloadKind::Packed32, mode | offset << 8 | offset << 16);
        }
        SetRule::SliceCount => {
            let slice_cap = match value {
                v4l2::MPEG_VIDEO_MULTI_SLICE_MODE_MAX_MB => Some(CapId::SliceMaxMb),
                v4l2::MPEG_VIDEO_MULTI_SLICE_MODE_MAX_BYTES => Some(CapId::SliceMaxBytes),
                _ => None,
            };
            if let Some(slice_cap) = slice_cap {
                let slice_desc = state.descriptor(slice_cap).ok_or_else(|| {
                    CapError::malformed(id, format!("{} is not registered", slice_cap))
                })?;
                push(slice_desc, PayloadKind::U32, state.value(slice_cap) as u32);
            }
        }
        SetRule::NalLength => {
            let v = if value == 0 {
                hfi::NAL_LENGTH_STARTCODES
            } else {
                let field = state.value(CapId::NalLengthField);
                enum_to_wire(state, CapId::NalLengthField, field, &mut out.diagnostics)?
            };
            push(desc, PayloadKind::U32Enum, v);
        }
        SetRule::LayerCountAndType => {
            if state.streaming && state.layer_type == LayerType::HierB {
                log::info!("{}: HB dynamic layer change not supported", id);
            } else {
                if !state.streaming {
                    let type_desc = state.descriptor(CapId::LayerType).ok_or_else(|| {
                        CapError::malformed(id, format!("{} is not registered", CapId::LayerType))
                    })?;
                    push(type_desc, PayloadKind::U32Enum, state.layer_type.as_u32());
                }
                push(desc, PayloadKind::U32, (value + 1) as u32);
            }
        }
        SetRule::GopSize => {
            if state.streaming && state.layer_type == LayerType::HierB {
                log::info!("{}: HB dynamic GOP setting not supported", id);
            } else {
                push(desc, PayloadKind::U32, value as u32);
            }
        }
    }
    out.payloads = payloads;
    Ok(out)
}

fn client_bits(state: &CapabilityState<'_>, family: &[CapId; 3]) -> u32 {
    family
        .iter()
        .enumerate()
        .filter(|(_, cap)| state.is_client_set(**cap))
        .fold(0, |bits, (i, _)| bits | 1 << i)
}

/// Combines an umbrella QP with its I/P/B siblings. `None` when the client
/// touched none of them.
fn packed_qp(
    state: &CapabilityState<'_>,
    umbrella: CapId,
    family: &[CapId; 3],
    pick: fn(i32, i32) -> i32,
) -> Option<u32> {
    let mut enable = client_bits(state, family);
    if state.is_client_set(umbrella) {
        enable = 0b111;
    }
    if enable == 0 {
        return None;
    }
    let offset = if state.is_10bit() { QP_10BIT_OFFSET } else { 0 };
    let base = state.value(umbrella);
    let [i, p, b] = family.map(|cap| pick(state.value(cap), base) + offset);
    Some(pack_qp(i, p, b, enable))
}

fn pack_qp(i: i32, p: i32, b: i32, enable: u32) -> u32 {
    (i as u32 & 0xff) | (p as u32 & 0xff) << 8 | (b as u32 & 0xff) << 16 | (enable & 0xff) << 24
}

fn fallback(
    diagnostics: &mut Vec<CapError>,
    cap: CapId,
    value: i32,
    fallback: u32,
) -> u32 {
    log::error!("{}: invalid value {}, set default: {:#x}", cap, value, fallback);
    diagnostics.push(CapError::InvalidEnumMapping {
        cap,
        value,
        fallback,
    });
    fallback
}

/// Menu values sent as plain integers.
pub fn menu_to_wire(
    codec: Codec,
    cap: CapId,
    value: i32,
    diagnostics: &mut Vec<CapError>,
) -> Result<u32> {
    match cap {
        CapId::EntropyMode if codec == Codec::H264 => Ok(match value {
            v4l2::MPEG_VIDEO_H264_ENTROPY_MODE_CABAC => 1,
            v4l2::MPEG_VIDEO_H264_ENTROPY_MODE_CAVLC => 0,
            _ => fallback(diagnostics, cap, value, 1),
        }),
        _ => Err(CapError::malformed(cap, "no menu mapping")),
    }
}

/// Menu and integer values that have a wire enum of their own.
pub fn enum_to_wire(
    state: &CapabilityState<'_>,
    cap: CapId,
    value: i32,
    diagnostics: &mut Vec<CapError>,
) -> Result<u32> {
    let codec = state.codec();
    let v = match cap {
        CapId::BitrateMode => state.rc_type.as_u32(),
        CapId::Profile | CapId::Level | CapId::Tier | CapId::BlurTypes => value as u32,
        CapId::Rotation => match value {
            0 => hfi::ROTATION_NONE,
            90 => hfi::ROTATION_90,
            180 => hfi::ROTATION_180,
            270 => hfi::ROTATION_270,
            _ => fallback(diagnostics, cap, value, hfi::ROTATION_NONE),
        },
        CapId::LfMode if codec == Codec::H264 => match value {
            v4l2::MPEG_VIDEO_H264_LOOP_FILTER_MODE_ENABLED => hfi::DEBLOCK_ALL_BOUNDARY,
            v4l2::MPEG_VIDEO_H264_LOOP_FILTER_MODE_DISABLED => hfi::DEBLOCK_DISABLE,
            v4l2::MPEG_VIDEO_H264_LOOP_FILTER_MODE_DISABLED_AT_SLICE_BOUNDARY => {
                hfi::DEBLOCK_DISABLE_AT_SLICE_BOUNDARY
            }
            _ => fallback(diagnostics, cap, value, hfi::DEBLOCK_ALL_BOUNDARY),
        },
        CapId::LfMode => match value {
            v4l2::MPEG_VIDEO_HEVC_LOOP_FILTER_MODE_ENABLED => hfi::DEBLOCK_ALL_BOUNDARY,
            v4l2::MPEG_VIDEO_HEVC_LOOP_FILTER_MODE_DISABLED => hfi::DEBLOCK_DISABLE,
            v4l2::MPEG_VIDEO_HEVC_LOOP_FILTER_MODE_DISABLED_AT_SLICE_BOUNDARY => {
                hfi::DEBLOCK_DISABLE_AT_SLICE_BOUNDARY
            }
            _ => fallback(diagnostics, cap, value, hfi::DEBLOCK_ALL_BOUNDARY),
        },
        CapId::NalLengthField => match value {
            v4l2::MPEG_VIDEO_HEVC_SIZE_4 => hfi::NAL_LENGTH_SIZE_4,
            _ => fallback(diagnostics, cap, value, hfi::NAL_LENGTH_STARTCODES),
        },
        _ => return Err(CapError::malformed(cap, "no enum mapping")),
    };
    Ok(v)
}

/// Sends every pending cap front to back. On failure the rest of the queue
/// is dropped and the error returned; already sent payloads stay sent.
pub fn drain<T: Transport + ?Sized>(
    state: &CapabilityState<'_>,
    firmware: &mut PendingSet,
    transport: &mut T,
) -> Result<DrainReport> {
    let mut report = DrainReport::default();
    while let Some(id) = firmware.front() {
        let serialized = match serialize(state, id) {
            Ok(serialized) => serialized,
            Err(e) => {
                log::error!("{}: serialization failed: {}", id, e);
                firmware.clear();
                return Err(e);
            }
        };
        for payload in serialized.payloads {
            log::debug!("{}: {}", id, payload);
            if let Err(e) = transport.send_property(&payload) {
                log::error!("{}: failed to send {}: {:#}", id, payload, e);
                firmware.clear();
                return Err(CapError::Transport(e));
            }
            report.sent.push(payload);
        }
        report.diagnostics.extend(serialized.diagnostics);
        firmware.pop_front();
    }
    Ok(report)
}

#[cfg(test)]
#[path = "packetizer_test.rs"]
mod packetizer_test;
