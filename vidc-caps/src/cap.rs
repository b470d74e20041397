//! Capability model: the closed set of capability ids, their flags and the
//! static descriptor every codec table is built from.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

macro_rules! cap_ids {
    ($($variant:ident => $name:literal,)+) => {
        /// One independently addressable encoder parameter.
        ///
        /// Declaration order is registry order: the static pass visits root
        /// capabilities in exactly this order.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(usize)]
        pub enum CapId {
            $($variant,)+
        }

        impl CapId {
            pub const ALL: &'static [CapId] = &[$(CapId::$variant,)+];
            pub const COUNT: usize = CapId::ALL.len();

            pub fn name(self) -> &'static str {
                match self {
                    $(CapId::$variant => $name,)+
                }
            }

            pub fn from_name(name: &str) -> Option<CapId> {
                match name {
                    $($name => Some(CapId::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

cap_ids! {
    PixFmts => "PIX_FMTS",
    Profile => "PROFILE",
    Level => "LEVEL",
    Tier => "TIER",
    Lossless => "LOSSLESS",
    FrameRcEnable => "FRAME_RC_ENABLE",
    FrameSkipMode => "FRAME_SKIP_MODE",
    BitrateMode => "BITRATE_MODE",
    BitRate => "BIT_RATE",
    ConstantQuality => "CONSTANT_QUALITY",
    FrameRate => "FRAME_RATE",
    OperatingRate => "OPERATING_RATE",
    EntropyMode => "ENTROPY_MODE",
    Transform8x8 => "TRANSFORM_8X8",
    LayerEnable => "LAYER_ENABLE",
    LayerType => "LAYER_TYPE",
    EnhLayerCount => "ENH_LAYER_COUNT",
    GopSize => "GOP_SIZE",
    BFrame => "B_FRAME",
    LtrCount => "LTR_COUNT",
    UseLtr => "USE_LTR",
    MarkLtr => "MARK_LTR",
    IrRandom => "IR_RANDOM",
    TimeDeltaBasedRc => "TIME_DELTA_BASED_RC",
    MinFrameQp => "MIN_FRAME_QP",
    IFrameMinQp => "I_FRAME_MIN_QP",
    PFrameMinQp => "P_FRAME_MIN_QP",
    BFrameMinQp => "B_FRAME_MIN_QP",
    MaxFrameQp => "MAX_FRAME_QP",
    IFrameMaxQp => "I_FRAME_MAX_QP",
    PFrameMaxQp => "P_FRAME_MAX_QP",
    BFrameMaxQp => "B_FRAME_MAX_QP",
    IFrameQp => "I_FRAME_QP",
    PFrameQp => "P_FRAME_QP",
    BFrameQp => "B_FRAME_QP",
    ChromaQpIndexOffset => "CHROMA_QP_INDEX_OFFSET",
    LfMode => "LF_MODE",
    LfAlpha => "LF_ALPHA",
    LfBeta => "LF_BETA",
    HeaderMode => "HEADER_MODE",
    PrependSpsPpsToIdr => "PREPEND_SPSPPS_TO_IDR",
    MetaSeqHdrNal => "META_SEQ_HDR_NAL",
    RequestSyncFrame => "REQUEST_SYNC_FRAME",
    SliceMode => "SLICE_MODE",
    SliceMaxMb => "SLICE_MAX_MB",
    SliceMaxBytes => "SLICE_MAX_BYTES",
    WithoutStartcode => "WITHOUT_STARTCODE",
    NalLengthField => "NAL_LENGTH_FIELD",
    Rotation => "ROTATION",
    BlurTypes => "BLUR_TYPES",
    MinBitstreamSizeOverwrite => "MIN_BITSTREAM_SIZE_OVERWRITE",
    MetaLtrMarkUse => "META_LTR_MARK_USE",
}

impl CapId {
    pub fn index(self) -> usize {
        self as usize
    }

    /// Metadata enables change the metadata port layout when set before streaming.
    pub fn is_meta(self) -> bool {
        matches!(self, CapId::MetaSeqHdrNal | CapId::MetaLtrMarkUse)
    }
}

impl fmt::Display for CapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// Per-capability flags. Everything but `CLIENT_SET` is authored in the
    /// codec tables; `CLIENT_SET` only ever appears on instance state.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CapFlags: u32 {
        const MENU = 0b0000_0001;
        const ROOT = 0b0000_0010;
        const DYNAMIC_ALLOWED = 0b0000_0100;
        const INPUT_PORT = 0b0000_1000;
        const OUTPUT_PORT = 0b0001_0000;
        const CLIENT_SET = 0b0010_0000;
    }
}

/// Codec family a session encodes to. `Heic` is an HEVC image session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Codec {
    H264,
    Hevc,
    Heic,
}

impl Codec {
    pub fn is_image(self) -> bool {
        self == Codec::Heic
    }

    pub fn is_hevc_family(self) -> bool {
        matches!(self, Codec::Hevc | Codec::Heic)
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Codec::H264 => "h264",
            Codec::Hevc => "hevc",
            Codec::Heic => "heic",
        };
        f.write_str(name)
    }
}

/// Recomputation rule run when a capability (or one of its parents) changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustRule {
    BitrateMode,
    Profile,
    EntropyMode,
    Transform8x8,
    LtrCount,
    UseLtr,
    MarkLtr,
    IrRandom,
    TimeDeltaBasedRc,
    LayerCount,
    GopSize,
    BFrame,
    HevcMinQp,
    HevcMaxQp,
    HevcFrameQp,
}

/// Serialization rule turning a resolved value into wire payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetRule {
    U32,
    U32Enum,
    S32,
    Q16,
    HeaderMode,
    DeblockMode,
    ConstantQuality,
    UseAndMarkLtr,
    MinQp,
    MaxQp,
    FrameQp,
    ReqSyncFrame,
    ChromaQpIndexOffset,
    SliceCount,
    NalLength,
    LayerCountAndType,
    GopSize,
}

#[derive(Debug, Clone)]
pub struct CapabilityDescriptor {
    pub id: CapId,
    pub external_id: u32,
    pub wire_id: u32,
    pub min: i32,
    pub max: i32,
    pub step_or_mask: u32,
    pub default: i32,
    pub flags: CapFlags,
    pub parents: Vec<CapId>,
    pub children: Vec<CapId>,
    pub adjust: Option<AdjustRule>,
    pub set: Option<SetRule>,
}

impl CapabilityDescriptor {
    pub fn new(id: CapId, external_id: u32, wire_id: u32) -> Self {
        Self {
            id,
            external_id,
            wire_id,
            min: 0,
            max: 1,
            step_or_mask: 1,
            default: 0,
            flags: CapFlags::empty(),
            parents: Vec::new(),
            children: Vec::new(),
            adjust: None,
            set: None,
        }
    }

    pub fn with_range(mut self, min: i32, max: i32, step: u32, default: i32) -> Self {
        self.min = min;
        self.max = max;
        self.step_or_mask = step;
        self.default = default;
        self
    }

    /// Menu domain: `mask` has one bit set per legal menu entry.
    pub fn with_menu(mut self, min: i32, max: i32, mask: u32, default: i32) -> Self {
        self.min = min;
        self.max = max;
        self.step_or_mask = mask;
        self.default = default;
        self.flags |= CapFlags::MENU;
        self
    }

    pub fn with_flags(mut self, flags: CapFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn with_parents(mut self, parents: &[CapId]) -> Self {
        self.parents = parents.to_vec();
        self
    }

    pub fn with_children(mut self, children: &[CapId]) -> Self {
        self.children = children.to_vec();
        self
    }

    pub fn with_adjust(mut self, rule: AdjustRule) -> Self {
        self.adjust = Some(rule);
        self
    }

    pub fn with_set(mut self, rule: SetRule) -> Self {
        self.set = Some(rule);
        self
    }

    pub fn is_root(&self) -> bool {
        self.flags.contains(CapFlags::ROOT)
    }

    pub fn is_menu(&self) -> bool {
        self.flags.contains(CapFlags::MENU)
    }

    pub fn is_dynamic_allowed(&self) -> bool {
        self.flags.contains(CapFlags::DYNAMIC_ALLOWED)
    }

    pub fn has_parent(&self, parent: CapId) -> bool {
        self.parents.contains(&parent)
    }

    /// Whether `value` is inside the descriptor's domain. Menus check the
    /// entry bit in `step_or_mask`; integers check `[min, max]` and the step.
    pub fn accepts(&self, value: i32) -> bool {
        if value < self.min || value > self.max {
            return false;
        }
        if self.is_menu() {
            return value < 32 && self.step_or_mask & (1 << value) != 0;
        }
        let step = i64::from(self.step_or_mask.max(1));
        (i64::from(value) - i64::from(self.min)) % step == 0
    }
}
