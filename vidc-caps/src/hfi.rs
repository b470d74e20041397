//! Wire-side identifiers and enums understood by the remote codec engine.

use std::fmt;

pub const HOST_FLAGS_NONE: u32 = 0x0000_0000;

pub const PROP_PROFILE: u32 = 0x0300_0107;
pub const PROP_LEVEL: u32 = 0x0300_0108;
pub const PROP_TIER: u32 = 0x0300_0109;
pub const PROP_FRAME_RATE: u32 = 0x0300_010e;
pub const PROP_ROTATION: u32 = 0x0300_0110;
pub const PROP_CABAC_SESSION: u32 = 0x0300_0111;
pub const PROP_8X8_TRANSFORM: u32 = 0x0300_0112;
pub const PROP_LTR_COUNT: u32 = 0x0300_0113;
pub const PROP_LTR_MARK: u32 = 0x0300_0114;
pub const PROP_LTR_USE: u32 = 0x0300_0115;
pub const PROP_IR_RANDOM_PERIOD: u32 = 0x0300_0116;
pub const PROP_TIME_DELTA_BASED_RATE_CONTROL: u32 = 0x0300_0117;
pub const PROP_RATE_CONTROL: u32 = 0x0300_0118;
pub const PROP_TOTAL_BITRATE: u32 = 0x0300_0119;
pub const PROP_CONSTANT_QUALITY: u32 = 0x0300_011a;
pub const PROP_GOP_SIZE: u32 = 0x0300_011b;
pub const PROP_MAX_B_FRAMES: u32 = 0x0300_011c;
pub const PROP_LAYER_ENCODING_TYPE: u32 = 0x0300_011d;
pub const PROP_LAYER_COUNT: u32 = 0x0300_011e;
pub const PROP_MIN_QP_PACKED: u32 = 0x0300_011f;
pub const PROP_MAX_QP_PACKED: u32 = 0x0300_0120;
pub const PROP_QP_PACKED: u32 = 0x0300_0121;
pub const PROP_CHROMA_QP_OFFSET: u32 = 0x0300_0122;
pub const PROP_DEBLOCKING_MODE: u32 = 0x0300_0123;
pub const PROP_SEQ_HEADER_MODE: u32 = 0x0300_0124;
pub const PROP_REQUEST_SYNC_FRAME: u32 = 0x0300_0125;
pub const PROP_MULTI_SLICE_MB_COUNT: u32 = 0x0300_0126;
pub const PROP_MULTI_SLICE_BYTES_COUNT: u32 = 0x0300_0127;
pub const PROP_NAL_LENGTH_FIELD: u32 = 0x0300_0128;
pub const PROP_BLUR_TYPES: u32 = 0x0300_0129;
pub const PROP_OPERATING_RATE: u32 = 0x0300_012a;

/// Property was never meant to go over the wire.
pub const PROP_NONE: u32 = 0;

/// Resolved rate-control kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum RcType {
    #[default]
    VbrCfr = 0x0,
    CbrCfr = 0x1,
    Cq = 0x2,
    Off = 0x3,
    CbrVfr = 0x4,
    Lossless = 0x5,
}

impl RcType {
    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

/// Resolved layer-encoding kind. `None` until the static pass decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum LayerType {
    #[default]
    None = 0x0,
    HierPSlidingWindow = 0x1,
    HierPHybridLtr = 0x2,
    HierB = 0x3,
}

impl LayerType {
    pub fn as_u32(self) -> u32 {
        self as u32
    }

    pub fn is_hier_p(self) -> bool {
        matches!(self, LayerType::HierPSlidingWindow | LayerType::HierPHybridLtr)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Port {
    None = 0x0,
    Bitstream = 0x1,
    Raw = 0x2,
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Port::None => "NONE",
            Port::Bitstream => "BITSTREAM",
            Port::Raw => "RAW",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PayloadKind {
    U32 = 0x1,
    S32 = 0x2,
    Q16 = 0x8,
    U32Enum = 0x9,
    Packed32 = 0xa,
}

pub const ROTATION_NONE: u32 = 0x0;
pub const ROTATION_90: u32 = 0x1;
pub const ROTATION_180: u32 = 0x2;
pub const ROTATION_270: u32 = 0x3;

pub const DEBLOCK_ALL_BOUNDARY: u32 = 0x0;
pub const DEBLOCK_DISABLE: u32 = 0x1;
pub const DEBLOCK_DISABLE_AT_SLICE_BOUNDARY: u32 = 0x2;

pub const SEQ_HEADER_SEPERATE_FRAME: u32 = 0x1;
pub const SEQ_HEADER_JOINED_WITH_1ST_FRAME: u32 = 0x2;
pub const SEQ_HEADER_PREFIX_WITH_SYNC_FRAME: u32 = 0x4;
pub const SEQ_HEADER_METADATA: u32 = 0x8;

pub const SYNC_FRAME_REQUEST_WITHOUT_SEQ_HDR: u32 = 0x1;
pub const SYNC_FRAME_REQUEST_WITH_PREFIX_SEQ_HDR: u32 = 0x2;

pub const ADAPTIVE_CHROMAQP_OFFSET: u32 = 0x0;
pub const FIXED_CHROMAQP_OFFSET: u32 = 0x1;

pub const NAL_LENGTH_STARTCODES: u32 = 0x0;
pub const NAL_LENGTH_SIZE_4: u32 = 0x4;
