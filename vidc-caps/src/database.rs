//! Built-in encoder capability tables.
//!
//! Tables are authored per codec. Parent and child lists must mirror each
//! other; `Registry::validate` rejects a table that breaks that rule.

use crate::{
    cap::{AdjustRule, CapFlags, CapId, CapId::*, CapabilityDescriptor, Codec, SetRule},
    hfi,
    v4l2::{self, menu_mask},
};

const ROOT: CapFlags = CapFlags::ROOT;
const DYN: CapFlags = CapFlags::DYNAMIC_ALLOWED;
const IN: CapFlags = CapFlags::INPUT_PORT;
const OUT: CapFlags = CapFlags::OUTPUT_PORT;

pub const MAX_LTR_FRAME_COUNT: i32 = 2;
pub const MAX_ENH_LAYER_HB: i32 = 3;
pub const MAX_AVC_ENH_LAYER_HYBRID_HP: i32 = 5;
pub const MAX_AVC_ENH_LAYER_SLIDING_WINDOW: i32 = 3;
pub const MAX_HEVC_ENH_LAYER_SLIDING_WINDOW: i32 = 5;

const MIN_QP_8BIT: i32 = 0;
const MIN_QP_10BIT: i32 = -12;
const MAX_QP: i32 = 51;
const MIN_CHROMA_QP_OFFSET: i32 = -12;
const MAX_CHROMA_QP_OFFSET: i32 = 0;
const DEFAULT_FPS: i32 = 30;
const MAX_FPS: i32 = 240;
const MAX_BITRATE: i32 = 220_000_000;
const DEFAULT_BITRATE: i32 = 20_000_000;
const MAX_SLICE_BYTES: i32 = 0x7fff_ffff;
const MIN_SLICE_BYTES: i32 = 512;
const MAX_SLICE_MB: i32 = 36864;

fn cap(id: CapId, external_id: u32, wire_id: u32) -> CapabilityDescriptor {
    CapabilityDescriptor::new(id, external_id, wire_id)
}

fn toggle(id: CapId, external_id: u32, default: i32) -> CapabilityDescriptor {
    cap(id, external_id, hfi::PROP_NONE).with_range(0, 1, 1, default)
}

/// The full descriptor list for `codec`, in no particular order.
pub fn table(codec: Codec) -> Vec<CapabilityDescriptor> {
    let mut caps = common(codec);
    match codec {
        Codec::H264 => caps.extend(h264()),
        Codec::Hevc => caps.extend(hevc(false)),
        Codec::Heic => caps.extend(hevc(true)),
    }
    if codec != Codec::Heic {
        caps.extend(video());
    }
    caps
}

/// Capabilities every encoder session carries.
fn common(codec: Codec) -> Vec<CapabilityDescriptor> {
    use v4l2::*;

    let rc_children: &[CapId] = match codec {
        Codec::H264 => &[LtrCount, IrRandom, TimeDeltaBasedRc, EnhLayerCount, IFrameQp],
        Codec::Hevc => &[
            LtrCount,
            IrRandom,
            TimeDeltaBasedRc,
            EnhLayerCount,
            IFrameQp,
            ConstantQuality,
        ],
        Codec::Heic => &[TimeDeltaBasedRc, IFrameQp, ConstantQuality],
    };
    let (rc_modes, rc_default) = match codec {
        Codec::H264 => (
            menu_mask(&[MPEG_VIDEO_BITRATE_MODE_VBR, MPEG_VIDEO_BITRATE_MODE_CBR]),
            MPEG_VIDEO_BITRATE_MODE_VBR,
        ),
        Codec::Hevc => (
            menu_mask(&[
                MPEG_VIDEO_BITRATE_MODE_VBR,
                MPEG_VIDEO_BITRATE_MODE_CBR,
                MPEG_VIDEO_BITRATE_MODE_CQ,
            ]),
            MPEG_VIDEO_BITRATE_MODE_VBR,
        ),
        Codec::Heic => (
            menu_mask(&[MPEG_VIDEO_BITRATE_MODE_VBR, MPEG_VIDEO_BITRATE_MODE_CQ]),
            MPEG_VIDEO_BITRATE_MODE_CQ,
        ),
    };
    let (lf_ext, lf_default, alpha_ext, beta_ext) = if codec == Codec::H264 {
        (
            CID_MPEG_VIDEO_H264_LOOP_FILTER_MODE,
            MPEG_VIDEO_H264_LOOP_FILTER_MODE_ENABLED,
            CID_MPEG_VIDEO_H264_LOOP_FILTER_ALPHA,
            CID_MPEG_VIDEO_H264_LOOP_FILTER_BETA,
        )
    } else {
        (
            CID_MPEG_VIDEO_HEVC_LOOP_FILTER_MODE,
            MPEG_VIDEO_HEVC_LOOP_FILTER_MODE_ENABLED,
            CID_MPEG_VIDEO_HEVC_LF_TC_OFFSET_DIV2,
            CID_MPEG_VIDEO_HEVC_LF_BETA_OFFSET_DIV2,
        )
    };
    // H.264 sessions on this engine are 8-bit only.
    let formats: &[i32] = if codec == Codec::H264 {
        &[FMT_NV12, FMT_NV21, FMT_NV12C, FMT_RGBA8888, FMT_RGBA8888C]
    } else {
        &[
            FMT_NV12,
            FMT_NV21,
            FMT_NV12C,
            FMT_P010,
            FMT_TP10C,
            FMT_RGBA8888,
            FMT_RGBA8888C,
        ]
    };
    let fmt_children: &[CapId] = if codec.is_hevc_family() {
        &[Profile, MinFrameQp, MaxFrameQp, IFrameQp]
    } else {
        &[]
    };
    let (frame_rc_default, fps_default) = if codec.is_image() {
        (0, 1)
    } else {
        (1, DEFAULT_FPS)
    };

    vec![
        cap(PixFmts, CID_MPEG_VIDC_PIX_FMTS, hfi::PROP_NONE)
            .with_menu(FMT_NV12, FMT_RGBA8888C, menu_mask(formats), FMT_NV12C)
            .with_flags(ROOT)
            .with_children(fmt_children),
        toggle(FrameRcEnable, CID_MPEG_VIDEO_FRAME_RC_ENABLE, frame_rc_default).with_flags(ROOT),
        cap(BitrateMode, CID_MPEG_VIDEO_BITRATE_MODE, hfi::PROP_RATE_CONTROL)
            .with_menu(
                MPEG_VIDEO_BITRATE_MODE_VBR,
                MPEG_VIDEO_BITRATE_MODE_CQ,
                rc_modes,
                rc_default,
            )
            .with_flags(ROOT | OUT)
            .with_children(rc_children)
            .with_adjust(AdjustRule::BitrateMode)
            .with_set(SetRule::U32Enum),
        cap(FrameRate, CID_MPEG_VIDC_FRAME_RATE, hfi::PROP_FRAME_RATE)
            .with_range(1 << 16, MAX_FPS << 16, 1, fps_default << 16)
            .with_flags(ROOT | OUT | DYN)
            .with_set(SetRule::Q16),
        cap(OperatingRate, CID_MPEG_VIDC_OPERATING_RATE, hfi::PROP_OPERATING_RATE)
            .with_range(1 << 16, i32::MAX, 1, fps_default << 16)
            .with_flags(ROOT | IN | DYN)
            .with_set(SetRule::Q16),
        cap(TimeDeltaBasedRc, CID_MPEG_VIDC_TIME_DELTA_BASED_RC, hfi::PROP_TIME_DELTA_BASED_RATE_CONTROL)
            .with_range(0, 1, 1, 1)
            .with_flags(OUT)
            .with_parents(&[BitrateMode])
            .with_adjust(AdjustRule::TimeDeltaBasedRc)
            .with_set(SetRule::U32),
        cap(ChromaQpIndexOffset, CID_MPEG_VIDEO_H264_CHROMA_QP_INDEX_OFFSET, hfi::PROP_CHROMA_QP_OFFSET)
            .with_range(MIN_CHROMA_QP_OFFSET, MAX_CHROMA_QP_OFFSET, 1, MIN_CHROMA_QP_OFFSET)
            .with_flags(ROOT | OUT)
            .with_set(SetRule::ChromaQpIndexOffset),
        cap(LfMode, lf_ext, hfi::PROP_DEBLOCKING_MODE)
            .with_menu(0, 2, menu_mask(&[0, 1, 2]), lf_default)
            .with_flags(ROOT | OUT)
            .with_set(SetRule::DeblockMode),
        cap(LfAlpha, alpha_ext, hfi::PROP_NONE).with_range(-6, 6, 1, 0),
        cap(LfBeta, beta_ext, hfi::PROP_NONE).with_range(-6, 6, 1, 0),
        cap(HeaderMode, CID_MPEG_VIDEO_HEADER_MODE, hfi::PROP_SEQ_HEADER_MODE)
            .with_menu(
                MPEG_VIDEO_HEADER_MODE_SEPARATE,
                MPEG_VIDEO_HEADER_MODE_JOINED_WITH_1ST_FRAME,
                menu_mask(&[
                    MPEG_VIDEO_HEADER_MODE_SEPARATE,
                    MPEG_VIDEO_HEADER_MODE_JOINED_WITH_1ST_FRAME,
                ]),
                MPEG_VIDEO_HEADER_MODE_JOINED_WITH_1ST_FRAME,
            )
            .with_flags(ROOT | OUT)
            .with_set(SetRule::HeaderMode),
        toggle(PrependSpsPpsToIdr, CID_MPEG_VIDEO_PREPEND_SPSPPS_TO_IDR, 0),
        toggle(MetaSeqHdrNal, CID_MPEG_VIDC_METADATA_SEQ_HEADER_NAL, 0),
        cap(Rotation, CID_ROTATE, hfi::PROP_ROTATION)
            .with_range(0, 270, 90, 0)
            .with_flags(ROOT | OUT)
            .with_set(SetRule::U32Enum),
    ]
}

fn h264() -> Vec<CapabilityDescriptor> {
    use v4l2::*;

    let profiles = menu_mask(&[
        MPEG_VIDEO_H264_PROFILE_BASELINE,
        MPEG_VIDEO_H264_PROFILE_CONSTRAINED_BASELINE,
        MPEG_VIDEO_H264_PROFILE_MAIN,
        MPEG_VIDEO_H264_PROFILE_HIGH,
        MPEG_VIDEO_H264_PROFILE_CONSTRAINED_HIGH,
    ]);

    vec![
        cap(Profile, CID_MPEG_VIDEO_H264_PROFILE, hfi::PROP_PROFILE)
            .with_menu(
                MPEG_VIDEO_H264_PROFILE_BASELINE,
                MPEG_VIDEO_H264_PROFILE_CONSTRAINED_HIGH,
                profiles,
                MPEG_VIDEO_H264_PROFILE_HIGH,
            )
            .with_flags(ROOT | OUT)
            .with_children(&[EntropyMode, Transform8x8])
            .with_set(SetRule::U32Enum),
        cap(Level, CID_MPEG_VIDEO_H264_LEVEL, hfi::PROP_LEVEL)
            .with_menu(0, 19, (1 << 20) - 1, 15)
            .with_flags(ROOT | OUT)
            .with_set(SetRule::U32Enum),
        cap(EntropyMode, CID_MPEG_VIDEO_H264_ENTROPY_MODE, hfi::PROP_CABAC_SESSION)
            .with_menu(
                MPEG_VIDEO_H264_ENTROPY_MODE_CAVLC,
                MPEG_VIDEO_H264_ENTROPY_MODE_CABAC,
                menu_mask(&[
                    MPEG_VIDEO_H264_ENTROPY_MODE_CAVLC,
                    MPEG_VIDEO_H264_ENTROPY_MODE_CABAC,
                ]),
                MPEG_VIDEO_H264_ENTROPY_MODE_CABAC,
            )
            .with_flags(OUT)
            .with_parents(&[Profile])
            .with_adjust(AdjustRule::EntropyMode)
            .with_set(SetRule::U32),
        cap(Transform8x8, CID_MPEG_VIDEO_H264_8X8_TRANSFORM, hfi::PROP_8X8_TRANSFORM)
            .with_range(0, 1, 1, 1)
            .with_flags(OUT)
            .with_parents(&[Profile])
            .with_adjust(AdjustRule::Transform8x8)
            .with_set(SetRule::U32),
        toggle(LayerEnable, CID_MPEG_VIDEO_H264_HIERARCHICAL_CODING, 0)
            .with_flags(ROOT | OUT)
            .with_children(&[EnhLayerCount]),
        layer_type(CID_MPEG_VIDEO_H264_HIERARCHICAL_CODING_TYPE),
        layer_count(
            CID_MPEG_VIDEO_H264_HIERARCHICAL_CODING_LAYER,
            &[BitrateMode, LayerEnable, LayerType],
        ),
        cap(MinFrameQp, CID_MPEG_VIDEO_H264_MIN_QP, hfi::PROP_MIN_QP_PACKED)
            .with_range(MIN_QP_8BIT, MAX_QP, 1, MIN_QP_8BIT)
            .with_flags(ROOT | OUT)
            .with_set(SetRule::MinQp),
        cap(IFrameMinQp, CID_MPEG_VIDEO_H264_I_FRAME_MIN_QP, hfi::PROP_NONE)
            .with_range(MIN_QP_8BIT, MAX_QP, 1, MIN_QP_8BIT),
        cap(PFrameMinQp, CID_MPEG_VIDEO_H264_P_FRAME_MIN_QP, hfi::PROP_NONE)
            .with_range(MIN_QP_8BIT, MAX_QP, 1, MIN_QP_8BIT),
        cap(BFrameMinQp, CID_MPEG_VIDEO_H264_B_FRAME_MIN_QP, hfi::PROP_NONE)
            .with_range(MIN_QP_8BIT, MAX_QP, 1, MIN_QP_8BIT),
        cap(MaxFrameQp, CID_MPEG_VIDEO_H264_MAX_QP, hfi::PROP_MAX_QP_PACKED)
            .with_range(MIN_QP_8BIT, MAX_QP, 1, MAX_QP)
            .with_flags(ROOT | OUT)
            .with_set(SetRule::MaxQp),
        cap(IFrameMaxQp, CID_MPEG_VIDEO_H264_I_FRAME_MAX_QP, hfi::PROP_NONE)
            .with_range(MIN_QP_8BIT, MAX_QP, 1, MAX_QP),
        cap(PFrameMaxQp, CID_MPEG_VIDEO_H264_P_FRAME_MAX_QP, hfi::PROP_NONE)
            .with_range(MIN_QP_8BIT, MAX_QP, 1, MAX_QP),
        cap(BFrameMaxQp, CID_MPEG_VIDEO_H264_B_FRAME_MAX_QP, hfi::PROP_NONE)
            .with_range(MIN_QP_8BIT, MAX_QP, 1, MAX_QP),
        cap(IFrameQp, CID_MPEG_VIDEO_H264_I_FRAME_QP, hfi::PROP_QP_PACKED)
            .with_range(MIN_QP_8BIT, MAX_QP, 1, 10)
            .with_flags(OUT | DYN)
            .with_parents(&[BitrateMode])
            .with_set(SetRule::FrameQp),
        cap(PFrameQp, CID_MPEG_VIDEO_H264_P_FRAME_QP, hfi::PROP_NONE)
            .with_range(MIN_QP_8BIT, MAX_QP, 1, 20),
        cap(BFrameQp, CID_MPEG_VIDEO_H264_B_FRAME_QP, hfi::PROP_NONE)
            .with_range(MIN_QP_8BIT, MAX_QP, 1, 20),
        cap(WithoutStartcode, CID_MPEG_VIDC_H264_WITHOUT_STARTCODE, hfi::PROP_NAL_LENGTH_FIELD)
            .with_range(0, 1, 1, 0)
            .with_flags(ROOT | OUT)
            .with_set(SetRule::NalLength),
        cap(NalLengthField, CID_MPEG_VIDC_H264_NAL_LENGTH_FIELD, hfi::PROP_NONE)
            .with_menu(
                MPEG_VIDEO_HEVC_SIZE_0,
                MPEG_VIDEO_HEVC_SIZE_4,
                menu_mask(&[MPEG_VIDEO_HEVC_SIZE_0, MPEG_VIDEO_HEVC_SIZE_4]),
                MPEG_VIDEO_HEVC_SIZE_0,
            )
            .with_flags(OUT),
    ]
}

/// HEVC video and HEIC image tables share everything but rate-control domain
/// and defaults.
fn hevc(image: bool) -> Vec<CapabilityDescriptor> {
    use v4l2::*;

    let profiles = if image {
        menu_mask(&[
            MPEG_VIDEO_HEVC_PROFILE_MAIN_STILL_PICTURE,
            MPEG_VIDEO_HEVC_PROFILE_MAIN_10,
        ])
    } else {
        menu_mask(&[
            MPEG_VIDEO_HEVC_PROFILE_MAIN,
            MPEG_VIDEO_HEVC_PROFILE_MAIN_STILL_PICTURE,
            MPEG_VIDEO_HEVC_PROFILE_MAIN_10,
        ])
    };
    let profile_default = if image {
        MPEG_VIDEO_HEVC_PROFILE_MAIN_STILL_PICTURE
    } else {
        MPEG_VIDEO_HEVC_PROFILE_MAIN
    };
    let frame_qp_parents: &[CapId] = &[PixFmts, BitrateMode];

    let mut caps = vec![
        cap(Profile, CID_MPEG_VIDEO_HEVC_PROFILE, hfi::PROP_PROFILE)
            .with_menu(
                MPEG_VIDEO_HEVC_PROFILE_MAIN,
                MPEG_VIDEO_HEVC_PROFILE_MAIN_10,
                profiles,
                profile_default,
            )
            .with_flags(OUT)
            .with_parents(&[PixFmts])
            .with_adjust(AdjustRule::Profile)
            .with_set(SetRule::U32Enum),
        cap(Level, CID_MPEG_VIDEO_HEVC_LEVEL, hfi::PROP_LEVEL)
            .with_menu(0, 12, (1 << 13) - 1, 12)
            .with_flags(ROOT | OUT)
            .with_set(SetRule::U32Enum),
        cap(Tier, CID_MPEG_VIDEO_HEVC_TIER, hfi::PROP_TIER)
            .with_menu(
                MPEG_VIDEO_HEVC_TIER_MAIN,
                MPEG_VIDEO_HEVC_TIER_HIGH,
                menu_mask(&[MPEG_VIDEO_HEVC_TIER_MAIN, MPEG_VIDEO_HEVC_TIER_HIGH]),
                MPEG_VIDEO_HEVC_TIER_HIGH,
            )
            .with_flags(ROOT | OUT)
            .with_set(SetRule::U32Enum),
        toggle(Lossless, CID_MPEG_VIDC_LOSSLESS, 0).with_flags(ROOT),
        cap(ConstantQuality, CID_MPEG_VIDEO_CONSTANT_QUALITY, hfi::PROP_CONSTANT_QUALITY)
            .with_range(1, 100, 1, 90)
            .with_flags(OUT | DYN)
            .with_parents(&[BitrateMode])
            .with_set(SetRule::ConstantQuality),
        cap(MinFrameQp, CID_MPEG_VIDEO_HEVC_MIN_QP, hfi::PROP_MIN_QP_PACKED)
            .with_range(MIN_QP_10BIT, MAX_QP, 1, MIN_QP_10BIT)
            .with_flags(OUT)
            .with_parents(&[PixFmts])
            .with_adjust(AdjustRule::HevcMinQp)
            .with_set(SetRule::MinQp),
        cap(IFrameMinQp, CID_MPEG_VIDEO_HEVC_I_FRAME_MIN_QP, hfi::PROP_NONE)
            .with_range(MIN_QP_10BIT, MAX_QP, 1, MIN_QP_10BIT),
        cap(PFrameMinQp, CID_MPEG_VIDEO_HEVC_P_FRAME_MIN_QP, hfi::PROP_NONE)
            .with_range(MIN_QP_10BIT, MAX_QP, 1, MIN_QP_10BIT),
        cap(BFrameMinQp, CID_MPEG_VIDEO_HEVC_B_FRAME_MIN_QP, hfi::PROP_NONE)
            .with_range(MIN_QP_10BIT, MAX_QP, 1, MIN_QP_10BIT),
        cap(MaxFrameQp, CID_MPEG_VIDEO_HEVC_MAX_QP, hfi::PROP_MAX_QP_PACKED)
            .with_range(MIN_QP_10BIT, MAX_QP, 1, MAX_QP)
            .with_flags(OUT)
            .with_parents(&[PixFmts])
            .with_adjust(AdjustRule::HevcMaxQp)
            .with_set(SetRule::MaxQp),
        cap(IFrameMaxQp, CID_MPEG_VIDEO_HEVC_I_FRAME_MAX_QP, hfi::PROP_NONE)
            .with_range(MIN_QP_10BIT, MAX_QP, 1, MAX_QP),
        cap(PFrameMaxQp, CID_MPEG_VIDEO_HEVC_P_FRAME_MAX_QP, hfi::PROP_NONE)
            .with_range(MIN_QP_10BIT, MAX_QP, 1, MAX_QP),
        cap(BFrameMaxQp, CID_MPEG_VIDEO_HEVC_B_FRAME_MAX_QP, hfi::PROP_NONE)
            .with_range(MIN_QP_10BIT, MAX_QP, 1, MAX_QP),
        cap(IFrameQp, CID_MPEG_VIDEO_HEVC_I_FRAME_QP, hfi::PROP_QP_PACKED)
            .with_range(MIN_QP_10BIT, MAX_QP, 1, 10)
            .with_flags(OUT | DYN)
            .with_parents(frame_qp_parents)
            .with_adjust(AdjustRule::HevcFrameQp)
            .with_set(SetRule::FrameQp),
        cap(PFrameQp, CID_MPEG_VIDEO_HEVC_P_FRAME_QP, hfi::PROP_NONE)
            .with_range(MIN_QP_10BIT, MAX_QP, 1, 20),
        cap(BFrameQp, CID_MPEG_VIDEO_HEVC_B_FRAME_QP, hfi::PROP_NONE)
            .with_range(MIN_QP_10BIT, MAX_QP, 1, 20),
    ];

    if !image {
        caps.extend([
            layer_type(CID_MPEG_VIDEO_HEVC_HIER_CODING_TYPE),
            layer_count(
                CID_MPEG_VIDEO_HEVC_HIER_CODING_LAYER,
                &[BitrateMode, LayerType],
            ),
            cap(WithoutStartcode, CID_MPEG_VIDEO_HEVC_WITHOUT_STARTCODE, hfi::PROP_NAL_LENGTH_FIELD)
                .with_range(0, 1, 1, 0)
                .with_flags(ROOT | OUT)
                .with_set(SetRule::NalLength),
            cap(NalLengthField, CID_MPEG_VIDEO_HEVC_SIZE_OF_LENGTH_FIELD, hfi::PROP_NONE)
                .with_menu(
                    MPEG_VIDEO_HEVC_SIZE_0,
                    MPEG_VIDEO_HEVC_SIZE_4,
                    menu_mask(&[MPEG_VIDEO_HEVC_SIZE_0, MPEG_VIDEO_HEVC_SIZE_4]),
                    MPEG_VIDEO_HEVC_SIZE_0,
                )
                .with_flags(OUT),
        ]);
    }
    caps
}

/// Capabilities that only make sense for video (not image) sessions.
fn video() -> Vec<CapabilityDescriptor> {
    use v4l2::*;

    let b_frames = cap(BFrame, CID_MPEG_VIDEO_B_FRAMES, hfi::PROP_MAX_B_FRAMES)
        .with_range(0, 7, 1, 0)
        .with_flags(OUT | DYN)
        .with_parents(&[EnhLayerCount])
        .with_adjust(AdjustRule::BFrame)
        .with_set(SetRule::U32);

    vec![
        cap(FrameSkipMode, CID_MPEG_VIDEO_FRAME_SKIP_MODE, hfi::PROP_NONE)
            .with_menu(0, 2, menu_mask(&[0, 1, 2]), 0)
            .with_flags(ROOT),
        cap(BitRate, CID_MPEG_VIDEO_BITRATE, hfi::PROP_TOTAL_BITRATE)
            .with_range(1, MAX_BITRATE, 1, DEFAULT_BITRATE)
            .with_flags(ROOT | OUT | DYN)
            .with_set(SetRule::U32),
        cap(GopSize, CID_MPEG_VIDEO_GOP_SIZE, hfi::PROP_GOP_SIZE)
            .with_range(0, i32::MAX, 1, 2 * DEFAULT_FPS - 1)
            .with_flags(OUT | DYN)
            .with_parents(&[EnhLayerCount])
            .with_adjust(AdjustRule::GopSize)
            .with_set(SetRule::GopSize),
        b_frames,
        cap(LtrCount, CID_MPEG_VIDEO_LTR_COUNT, hfi::PROP_LTR_COUNT)
            .with_range(0, MAX_LTR_FRAME_COUNT, 1, 0)
            .with_flags(OUT)
            .with_parents(&[BitrateMode])
            .with_children(&[UseLtr, MarkLtr])
            .with_adjust(AdjustRule::LtrCount)
            .with_set(SetRule::U32),
        cap(UseLtr, CID_MPEG_VIDEO_USE_LTR_FRAMES, hfi::PROP_LTR_USE)
            .with_range(0, (1 << MAX_LTR_FRAME_COUNT) - 1, 1, 0)
            .with_flags(OUT | DYN)
            .with_parents(&[LtrCount])
            .with_adjust(AdjustRule::UseLtr)
            .with_set(SetRule::UseAndMarkLtr),
        cap(MarkLtr, CID_MPEG_VIDEO_FRAME_LTR_INDEX, hfi::PROP_LTR_MARK)
            .with_range(0, MAX_LTR_FRAME_COUNT - 1, 1, 0)
            .with_flags(OUT | DYN)
            .with_parents(&[LtrCount])
            .with_adjust(AdjustRule::MarkLtr)
            .with_set(SetRule::UseAndMarkLtr),
        cap(IrRandom, CID_MPEG_VIDC_INTRA_REFRESH_RANDOM, hfi::PROP_IR_RANDOM_PERIOD)
            .with_range(0, i32::MAX, 1, 0)
            .with_flags(OUT)
            .with_parents(&[BitrateMode])
            .with_adjust(AdjustRule::IrRandom)
            .with_set(SetRule::U32),
        cap(RequestSyncFrame, CID_MPEG_VIDEO_FORCE_KEY_FRAME, hfi::PROP_REQUEST_SYNC_FRAME)
            .with_range(0, 1, 1, 0)
            .with_flags(OUT | DYN)
            .with_set(SetRule::ReqSyncFrame),
        cap(SliceMode, CID_MPEG_VIDEO_MULTI_SLICE_MODE, hfi::PROP_NONE)
            .with_menu(
                MPEG_VIDEO_MULTI_SLICE_MODE_SINGLE,
                MPEG_VIDEO_MULTI_SLICE_MODE_MAX_BYTES,
                menu_mask(&[
                    MPEG_VIDEO_MULTI_SLICE_MODE_SINGLE,
                    MPEG_VIDEO_MULTI_SLICE_MODE_MAX_MB,
                    MPEG_VIDEO_MULTI_SLICE_MODE_MAX_BYTES,
                ]),
                MPEG_VIDEO_MULTI_SLICE_MODE_SINGLE,
            )
            .with_flags(ROOT | OUT)
            .with_set(SetRule::SliceCount),
        cap(SliceMaxMb, CID_MPEG_VIDEO_MULTI_SLICE_MAX_MB, hfi::PROP_MULTI_SLICE_MB_COUNT)
            .with_range(1, MAX_SLICE_MB, 1, 1)
            .with_flags(OUT),
        cap(SliceMaxBytes, CID_MPEG_VIDEO_MULTI_SLICE_MAX_BYTES, hfi::PROP_MULTI_SLICE_BYTES_COUNT)
            .with_range(MIN_SLICE_BYTES, MAX_SLICE_BYTES, 1, MIN_SLICE_BYTES)
            .with_flags(OUT),
        cap(BlurTypes, CID_MPEG_VIDC_BLUR_TYPES, hfi::PROP_BLUR_TYPES)
            .with_menu(
                MPEG_VIDC_BLUR_NONE,
                MPEG_VIDC_BLUR_ADAPTIVE,
                menu_mask(&[
                    MPEG_VIDC_BLUR_NONE,
                    MPEG_VIDC_BLUR_EXTERNAL,
                    MPEG_VIDC_BLUR_ADAPTIVE,
                ]),
                MPEG_VIDC_BLUR_NONE,
            )
            .with_flags(ROOT | IN | DYN)
            .with_set(SetRule::U32Enum),
        cap(MinBitstreamSizeOverwrite, CID_MPEG_VIDC_MIN_BITSTREAM_SIZE_OVERWRITE, hfi::PROP_NONE)
            .with_range(0, i32::MAX, 1, 0)
            .with_flags(IN),
        toggle(MetaLtrMarkUse, CID_MPEG_VIDC_METADATA_LTR_MARK_USE_DETAILS, 0).with_flags(IN),
    ]
}

fn layer_type(external_id: u32) -> CapabilityDescriptor {
    use v4l2::*;

    cap(LayerType, external_id, hfi::PROP_LAYER_ENCODING_TYPE)
        .with_menu(
            MPEG_VIDEO_HIERARCHICAL_CODING_B,
            MPEG_VIDEO_HIERARCHICAL_CODING_P,
            menu_mask(&[
                MPEG_VIDEO_HIERARCHICAL_CODING_B,
                MPEG_VIDEO_HIERARCHICAL_CODING_P,
            ]),
            MPEG_VIDEO_HIERARCHICAL_CODING_P,
        )
        .with_flags(ROOT | OUT)
        .with_children(&[EnhLayerCount])
}

fn layer_count(external_id: u32, parents: &[CapId]) -> CapabilityDescriptor {
    cap(EnhLayerCount, external_id, hfi::PROP_LAYER_COUNT)
        .with_range(0, MAX_HEVC_ENH_LAYER_SLIDING_WINDOW, 1, 0)
        .with_flags(OUT | DYN)
        .with_parents(parents)
        .with_children(&[GopSize, BFrame])
        .with_adjust(AdjustRule::LayerCount)
        .with_set(SetRule::LayerCountAndType)
}
