//! Front-end control ids and menu values, i.e. the numbers a caller uses to
//! address a capability and to pick menu entries.

pub const CID_USER_BASE: u32 = 0x0098_0900;
pub const CID_MPEG_BASE: u32 = 0x0099_0900;
pub const CID_MPEG_VIDC_BASE: u32 = CID_MPEG_BASE + 0x2000;

pub const CID_ROTATE: u32 = CID_USER_BASE + 34;

pub const CID_MPEG_VIDEO_B_FRAMES: u32 = CID_MPEG_BASE + 202;
pub const CID_MPEG_VIDEO_GOP_SIZE: u32 = CID_MPEG_BASE + 203;
pub const CID_MPEG_VIDEO_BITRATE_MODE: u32 = CID_MPEG_BASE + 206;
pub const CID_MPEG_VIDEO_BITRATE: u32 = CID_MPEG_BASE + 207;
pub const CID_MPEG_VIDEO_FRAME_RC_ENABLE: u32 = CID_MPEG_BASE + 215;
pub const CID_MPEG_VIDEO_HEADER_MODE: u32 = CID_MPEG_BASE + 216;
pub const CID_MPEG_VIDEO_MULTI_SLICE_MAX_BYTES: u32 = CID_MPEG_BASE + 220;
pub const CID_MPEG_VIDEO_MULTI_SLICE_MAX_MB: u32 = CID_MPEG_BASE + 221;
pub const CID_MPEG_VIDEO_MULTI_SLICE_MODE: u32 = CID_MPEG_BASE + 222;
pub const CID_MPEG_VIDEO_FORCE_KEY_FRAME: u32 = CID_MPEG_BASE + 229;
pub const CID_MPEG_VIDEO_LTR_COUNT: u32 = CID_MPEG_BASE + 232;
pub const CID_MPEG_VIDEO_FRAME_LTR_INDEX: u32 = CID_MPEG_BASE + 233;
pub const CID_MPEG_VIDEO_USE_LTR_FRAMES: u32 = CID_MPEG_BASE + 234;
pub const CID_MPEG_VIDEO_PREPEND_SPSPPS_TO_IDR: u32 = CID_MPEG_BASE + 644;
pub const CID_MPEG_VIDEO_CONSTANT_QUALITY: u32 = CID_MPEG_BASE + 645;
pub const CID_MPEG_VIDEO_FRAME_SKIP_MODE: u32 = CID_MPEG_BASE + 646;

pub const CID_MPEG_VIDEO_H264_I_FRAME_QP: u32 = CID_MPEG_BASE + 350;
pub const CID_MPEG_VIDEO_H264_P_FRAME_QP: u32 = CID_MPEG_BASE + 351;
pub const CID_MPEG_VIDEO_H264_B_FRAME_QP: u32 = CID_MPEG_BASE + 352;
pub const CID_MPEG_VIDEO_H264_MIN_QP: u32 = CID_MPEG_BASE + 353;
pub const CID_MPEG_VIDEO_H264_MAX_QP: u32 = CID_MPEG_BASE + 354;
pub const CID_MPEG_VIDEO_H264_8X8_TRANSFORM: u32 = CID_MPEG_BASE + 355;
pub const CID_MPEG_VIDEO_H264_ENTROPY_MODE: u32 = CID_MPEG_BASE + 357;
pub const CID_MPEG_VIDEO_H264_LEVEL: u32 = CID_MPEG_BASE + 359;
pub const CID_MPEG_VIDEO_H264_LOOP_FILTER_ALPHA: u32 = CID_MPEG_BASE + 360;
pub const CID_MPEG_VIDEO_H264_LOOP_FILTER_BETA: u32 = CID_MPEG_BASE + 361;
pub const CID_MPEG_VIDEO_H264_LOOP_FILTER_MODE: u32 = CID_MPEG_BASE + 362;
pub const CID_MPEG_VIDEO_H264_PROFILE: u32 = CID_MPEG_BASE + 363;
pub const CID_MPEG_VIDEO_H264_HIERARCHICAL_CODING: u32 = CID_MPEG_BASE + 379;
pub const CID_MPEG_VIDEO_H264_HIERARCHICAL_CODING_TYPE: u32 = CID_MPEG_BASE + 380;
pub const CID_MPEG_VIDEO_H264_HIERARCHICAL_CODING_LAYER: u32 = CID_MPEG_BASE + 381;
pub const CID_MPEG_VIDEO_H264_CHROMA_QP_INDEX_OFFSET: u32 = CID_MPEG_BASE + 384;
pub const CID_MPEG_VIDEO_H264_I_FRAME_MIN_QP: u32 = CID_MPEG_BASE + 390;
pub const CID_MPEG_VIDEO_H264_I_FRAME_MAX_QP: u32 = CID_MPEG_BASE + 391;
pub const CID_MPEG_VIDEO_H264_P_FRAME_MIN_QP: u32 = CID_MPEG_BASE + 392;
pub const CID_MPEG_VIDEO_H264_P_FRAME_MAX_QP: u32 = CID_MPEG_BASE + 393;
pub const CID_MPEG_VIDEO_H264_B_FRAME_MIN_QP: u32 = CID_MPEG_BASE + 394;
pub const CID_MPEG_VIDEO_H264_B_FRAME_MAX_QP: u32 = CID_MPEG_BASE + 395;

pub const CID_MPEG_VIDEO_HEVC_MIN_QP: u32 = CID_MPEG_BASE + 600;
pub const CID_MPEG_VIDEO_HEVC_MAX_QP: u32 = CID_MPEG_BASE + 601;
pub const CID_MPEG_VIDEO_HEVC_I_FRAME_QP: u32 = CID_MPEG_BASE + 602;
pub const CID_MPEG_VIDEO_HEVC_P_FRAME_QP: u32 = CID_MPEG_BASE + 603;
pub const CID_MPEG_VIDEO_HEVC_B_FRAME_QP: u32 = CID_MPEG_BASE + 604;
pub const CID_MPEG_VIDEO_HEVC_HIER_CODING_TYPE: u32 = CID_MPEG_BASE + 606;
pub const CID_MPEG_VIDEO_HEVC_HIER_CODING_LAYER: u32 = CID_MPEG_BASE + 607;
pub const CID_MPEG_VIDEO_HEVC_PROFILE: u32 = CID_MPEG_BASE + 615;
pub const CID_MPEG_VIDEO_HEVC_LEVEL: u32 = CID_MPEG_BASE + 616;
pub const CID_MPEG_VIDEO_HEVC_TIER: u32 = CID_MPEG_BASE + 618;
pub const CID_MPEG_VIDEO_HEVC_LOOP_FILTER_MODE: u32 = CID_MPEG_BASE + 620;
pub const CID_MPEG_VIDEO_HEVC_LF_BETA_OFFSET_DIV2: u32 = CID_MPEG_BASE + 621;
pub const CID_MPEG_VIDEO_HEVC_LF_TC_OFFSET_DIV2: u32 = CID_MPEG_BASE + 622;
pub const CID_MPEG_VIDEO_HEVC_SIZE_OF_LENGTH_FIELD: u32 = CID_MPEG_BASE + 626;
pub const CID_MPEG_VIDEO_HEVC_WITHOUT_STARTCODE: u32 = CID_MPEG_BASE + 625;
pub const CID_MPEG_VIDEO_HEVC_I_FRAME_MIN_QP: u32 = CID_MPEG_BASE + 647;
pub const CID_MPEG_VIDEO_HEVC_I_FRAME_MAX_QP: u32 = CID_MPEG_BASE + 648;
pub const CID_MPEG_VIDEO_HEVC_P_FRAME_MIN_QP: u32 = CID_MPEG_BASE + 649;
pub const CID_MPEG_VIDEO_HEVC_P_FRAME_MAX_QP: u32 = CID_MPEG_BASE + 650;
pub const CID_MPEG_VIDEO_HEVC_B_FRAME_MIN_QP: u32 = CID_MPEG_BASE + 651;
pub const CID_MPEG_VIDEO_HEVC_B_FRAME_MAX_QP: u32 = CID_MPEG_BASE + 652;

pub const CID_MPEG_VIDC_PIX_FMTS: u32 = CID_MPEG_VIDC_BASE + 0x01;
pub const CID_MPEG_VIDC_LOSSLESS: u32 = CID_MPEG_VIDC_BASE + 0x02;
pub const CID_MPEG_VIDC_FRAME_RATE: u32 = CID_MPEG_VIDC_BASE + 0x03;
pub const CID_MPEG_VIDC_OPERATING_RATE: u32 = CID_MPEG_VIDC_BASE + 0x04;
pub const CID_MPEG_VIDC_INTRA_REFRESH_RANDOM: u32 = CID_MPEG_VIDC_BASE + 0x05;
pub const CID_MPEG_VIDC_TIME_DELTA_BASED_RC: u32 = CID_MPEG_VIDC_BASE + 0x06;
pub const CID_MPEG_VIDC_BLUR_TYPES: u32 = CID_MPEG_VIDC_BASE + 0x07;
pub const CID_MPEG_VIDC_MIN_BITSTREAM_SIZE_OVERWRITE: u32 = CID_MPEG_VIDC_BASE + 0x08;
pub const CID_MPEG_VIDC_METADATA_SEQ_HEADER_NAL: u32 = CID_MPEG_VIDC_BASE + 0x09;
pub const CID_MPEG_VIDC_METADATA_LTR_MARK_USE_DETAILS: u32 = CID_MPEG_VIDC_BASE + 0x0a;
pub const CID_MPEG_VIDC_H264_NAL_LENGTH_FIELD: u32 = CID_MPEG_VIDC_BASE + 0x0b;
pub const CID_MPEG_VIDC_H264_WITHOUT_STARTCODE: u32 = CID_MPEG_VIDC_BASE + 0x0c;

pub const MPEG_VIDEO_BITRATE_MODE_VBR: i32 = 0;
pub const MPEG_VIDEO_BITRATE_MODE_CBR: i32 = 1;
pub const MPEG_VIDEO_BITRATE_MODE_CQ: i32 = 2;

pub const MPEG_VIDEO_H264_PROFILE_BASELINE: i32 = 0;
pub const MPEG_VIDEO_H264_PROFILE_CONSTRAINED_BASELINE: i32 = 1;
pub const MPEG_VIDEO_H264_PROFILE_MAIN: i32 = 2;
pub const MPEG_VIDEO_H264_PROFILE_HIGH: i32 = 4;
pub const MPEG_VIDEO_H264_PROFILE_CONSTRAINED_HIGH: i32 = 17;

pub const MPEG_VIDEO_HEVC_PROFILE_MAIN: i32 = 0;
pub const MPEG_VIDEO_HEVC_PROFILE_MAIN_STILL_PICTURE: i32 = 1;
pub const MPEG_VIDEO_HEVC_PROFILE_MAIN_10: i32 = 2;

pub const MPEG_VIDEO_HEVC_TIER_MAIN: i32 = 0;
pub const MPEG_VIDEO_HEVC_TIER_HIGH: i32 = 1;

pub const MPEG_VIDEO_H264_ENTROPY_MODE_CAVLC: i32 = 0;
pub const MPEG_VIDEO_H264_ENTROPY_MODE_CABAC: i32 = 1;

pub const MPEG_VIDEO_H264_LOOP_FILTER_MODE_ENABLED: i32 = 0;
pub const MPEG_VIDEO_H264_LOOP_FILTER_MODE_DISABLED: i32 = 1;
pub const MPEG_VIDEO_H264_LOOP_FILTER_MODE_DISABLED_AT_SLICE_BOUNDARY: i32 = 2;

pub const MPEG_VIDEO_HEVC_LOOP_FILTER_MODE_DISABLED: i32 = 0;
pub const MPEG_VIDEO_HEVC_LOOP_FILTER_MODE_ENABLED: i32 = 1;
pub const MPEG_VIDEO_HEVC_LOOP_FILTER_MODE_DISABLED_AT_SLICE_BOUNDARY: i32 = 2;

pub const MPEG_VIDEO_HEADER_MODE_SEPARATE: i32 = 0;
pub const MPEG_VIDEO_HEADER_MODE_JOINED_WITH_1ST_FRAME: i32 = 1;

pub const MPEG_VIDEO_HIERARCHICAL_CODING_B: i32 = 0;
pub const MPEG_VIDEO_HIERARCHICAL_CODING_P: i32 = 1;

pub const MPEG_VIDEO_MULTI_SLICE_MODE_SINGLE: i32 = 0;
pub const MPEG_VIDEO_MULTI_SLICE_MODE_MAX_MB: i32 = 1;
pub const MPEG_VIDEO_MULTI_SLICE_MODE_MAX_BYTES: i32 = 2;

pub const MPEG_VIDEO_HEVC_SIZE_0: i32 = 0;
pub const MPEG_VIDEO_HEVC_SIZE_1: i32 = 1;
pub const MPEG_VIDEO_HEVC_SIZE_2: i32 = 2;
pub const MPEG_VIDEO_HEVC_SIZE_4: i32 = 3;

pub const MPEG_VIDC_BLUR_NONE: i32 = 0;
pub const MPEG_VIDC_BLUR_EXTERNAL: i32 = 1;
pub const MPEG_VIDC_BLUR_ADAPTIVE: i32 = 2;

/// Uncompressed formats, numbered as menu entries.
pub const FMT_NV12: i32 = 0;
pub const FMT_NV21: i32 = 1;
pub const FMT_NV12C: i32 = 2;
pub const FMT_P010: i32 = 3;
pub const FMT_TP10C: i32 = 4;
pub const FMT_RGBA8888: i32 = 5;
pub const FMT_RGBA8888C: i32 = 6;

pub fn is_10bit_format(fmt: i32) -> bool {
    fmt == FMT_P010 || fmt == FMT_TP10C
}

/// Builds a menu mask from the legal entries.
pub const fn menu_mask(entries: &[i32]) -> u32 {
    let mut mask = 0u32;
    let mut i = 0;
    while i < entries.len() {
        mask |= 1 << entries[i];
        i += 1;
    }
    mask
}
