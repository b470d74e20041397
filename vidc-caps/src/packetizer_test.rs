use super::*;
use crate::registry::Registry;

fn state(codec: Codec) -> anyhow::Result<CapabilityState<'static>> {
    Ok(CapabilityState::new(Registry::builtin(codec)?))
}

fn single(state: &CapabilityState<'_>, id: CapId) -> anyhow::Result<WirePayload> {
    let out = serialize(state, id)?;
    assert_eq!(out.payloads.len(), 1, "{} produced {:?}", id, out.payloads);
    Ok(out.payloads[0].clone())
}

fn client_set(state: &mut CapabilityState<'_>, id: CapId, value: i32) {
    state.set_value(id, value);
    state.mark_client_set(id);
}

#[test]
fn test_payload_is_little_endian() {
    let payload = WirePayload::new(hfi::PROP_GOP_SIZE, Port::Bitstream, PayloadKind::U32, 0x0102_0304);
    assert_eq!(&payload.bytes[..], &[4, 3, 2, 1]);
    assert_eq!(payload.value(), 0x0102_0304);
}

#[test]
fn test_ten_bit_min_qp() -> anyhow::Result<()> {
    let mut st = state(Codec::Hevc)?;
    st.set_value(CapId::PixFmts, v4l2::FMT_P010);
    client_set(&mut st, CapId::MinFrameQp, 5);

    let payload = single(&st, CapId::MinFrameQp)?;
    assert_eq!(payload.wire_id, hfi::PROP_MIN_QP_PACKED);
    assert_eq!(payload.kind, PayloadKind::Packed32);
    assert_eq!(payload.value(), 17 | 17 << 8 | 17 << 16 | 0b111 << 24);
    Ok(())
}

#[test]
fn test_min_qp_skipped_without_client() -> anyhow::Result<()> {
    let st = state(Codec::H264)?;
    assert!(serialize(&st, CapId::MinFrameQp)?.payloads.is_empty());
    Ok(())
}

#[test]
fn test_max_qp_per_type_bit() -> anyhow::Result<()> {
    let mut st = state(Codec::H264)?;
    client_set(&mut st, CapId::IFrameMaxQp, 40);
    let payload = single(&st, CapId::MaxFrameQp)?;
    assert_eq!(payload.value(), 40 | 51 << 8 | 51 << 16 | 0b001 << 24);
    Ok(())
}

#[test]
fn test_frame_qp() -> anyhow::Result<()> {
    let mut st = state(Codec::H264)?;
    st.rc_type = RcType::VbrCfr;
    assert!(serialize(&st, CapId::IFrameQp)?.payloads.is_empty());

    client_set(&mut st, CapId::PFrameQp, 30);
    assert_eq!(
        single(&st, CapId::IFrameQp)?.value(),
        10 | 30 << 8 | 20 << 16 | 0b010 << 24
    );

    st.rc_type = RcType::Off;
    assert_eq!(
        single(&st, CapId::IFrameQp)?.value(),
        10 | 30 << 8 | 20 << 16 | 0b111 << 24
    );
    Ok(())
}

#[test]
fn test_header_mode_bits() -> anyhow::Result<()> {
    let mut st = state(Codec::H264)?;
    assert_eq!(
        single(&st, CapId::HeaderMode)?.value(),
        hfi::SEQ_HEADER_JOINED_WITH_1ST_FRAME
    );
    st.set_value(CapId::HeaderMode, v4l2::MPEG_VIDEO_HEADER_MODE_SEPARATE);
    st.set_value(CapId::PrependSpsPpsToIdr, 1);
    st.set_value(CapId::MetaSeqHdrNal, 1);
    assert_eq!(single(&st, CapId::HeaderMode)?.value(), 0x1 | 0x4 | 0x8);

    st.set_value(CapId::HeaderMode, 5);
    st.set_value(CapId::PrependSpsPpsToIdr, 0);
    assert_eq!(single(&st, CapId::HeaderMode)?.value(), hfi::SEQ_HEADER_METADATA);
    Ok(())
}

#[test]
fn test_deblock_mode() -> anyhow::Result<()> {
    let mut st = state(Codec::H264)?;
    st.set_value(CapId::LfMode, v4l2::MPEG_VIDEO_H264_LOOP_FILTER_MODE_DISABLED);
    st.set_value(CapId::LfAlpha, 2);
    st.set_value(CapId::LfBeta, -1);
    let payload = single(&st, CapId::LfMode)?;
    assert_eq!(payload.wire_id, hfi::PROP_DEBLOCKING_MODE);
    assert_eq!(payload.kind, PayloadKind::Packed32);
    assert_eq!(payload.value(), 8 << 16 | 5 << 8 | hfi::DEBLOCK_DISABLE);

    let mut hevc = state(Codec::Hevc)?;
    hevc.set_value(CapId::LfMode, v4l2::MPEG_VIDEO_HEVC_LOOP_FILTER_MODE_DISABLED);
    assert_eq!(
        single(&hevc, CapId::LfMode)?.value() & 0xff,
        hfi::DEBLOCK_DISABLE
    );
    Ok(())
}

#[test]
fn test_chroma_qp_offset() -> anyhow::Result<()> {
    let mut st = state(Codec::Hevc)?;
    assert_eq!(
        single(&st, CapId::ChromaQpIndexOffset)?.value(),
        hfi::ADAPTIVE_CHROMAQP_OFFSET
    );
    client_set(&mut st, CapId::ChromaQpIndexOffset, -6);
    assert_eq!(
        single(&st, CapId::ChromaQpIndexOffset)?.value(),
        hfi::FIXED_CHROMAQP_OFFSET | 6 << 8 | 6 << 16
    );
    Ok(())
}

#[test]
fn test_enum_fallback_is_diagnostic() -> anyhow::Result<()> {
    let mut st = state(Codec::H264)?;
    st.set_value(CapId::Rotation, 45);
    let out = serialize(&st, CapId::Rotation)?;
    assert_eq!(out.payloads.len(), 1);
    assert_eq!(out.payloads[0].value(), hfi::ROTATION_NONE);
    assert!(matches!(
        out.diagnostics.as_slice(),
        [CapError::InvalidEnumMapping {
            cap: CapId::Rotation,
            value: 45,
            fallback: 0
        }]
    ));

    st.set_value(CapId::Rotation, 270);
    assert_eq!(single(&st, CapId::Rotation)?.value(), hfi::ROTATION_270);
    Ok(())
}

#[test]
fn test_entropy_menu_mapping() -> anyhow::Result<()> {
    let mut st = state(Codec::H264)?;
    assert_eq!(single(&st, CapId::EntropyMode)?.value(), 1);
    st.set_value(CapId::EntropyMode, v4l2::MPEG_VIDEO_H264_ENTROPY_MODE_CAVLC);
    assert_eq!(single(&st, CapId::EntropyMode)?.value(), 0);

    st.set_value(CapId::EntropyMode, 7);
    let out = serialize(&st, CapId::EntropyMode)?;
    assert_eq!(out.payloads[0].value(), 1);
    assert_eq!(out.diagnostics.len(), 1);
    Ok(())
}

#[test]
fn test_unmapped_enum_is_table_defect() -> anyhow::Result<()> {
    let st = state(Codec::H264)?;
    let mut diagnostics = Vec::new();
    assert!(matches!(
        enum_to_wire(&st, CapId::GopSize, 1, &mut diagnostics),
        Err(CapError::MalformedDescriptor { cap: CapId::GopSize, .. })
    ));
    assert!(matches!(
        menu_to_wire(Codec::Hevc, CapId::EntropyMode, 1, &mut diagnostics),
        Err(CapError::MalformedDescriptor { .. })
    ));

    // the layer type on the wire is the resolved kind, not the menu value
    let hevc = state(Codec::Hevc)?;
    assert!(matches!(
        enum_to_wire(&hevc, CapId::LayerType, v4l2::MPEG_VIDEO_HIERARCHICAL_CODING_B, &mut diagnostics),
        Err(CapError::MalformedDescriptor { cap: CapId::LayerType, .. })
    ));
    assert!(diagnostics.is_empty());
    Ok(())
}

#[test]
fn test_port_scope() -> anyhow::Result<()> {
    let registry = Registry::builtin(Codec::Hevc)?;
    let port = |id: CapId| registry.get(id).map(port_for);
    assert_eq!(port(CapId::BlurTypes), Some(Port::Raw));
    assert_eq!(port(CapId::BitRate), Some(Port::Bitstream));
    assert_eq!(port(CapId::PixFmts), Some(Port::None));

    let both = CapabilityDescriptor::new(CapId::FrameRate, 0, hfi::PROP_FRAME_RATE)
        .with_flags(CapFlags::INPUT_PORT | CapFlags::OUTPUT_PORT);
    assert_eq!(port_for(&both), Port::Bitstream);
    Ok(())
}

#[test]
fn test_slice_count() -> anyhow::Result<()> {
    let mut st = state(Codec::H264)?;
    assert!(serialize(&st, CapId::SliceMode)?.payloads.is_empty());

    st.set_value(CapId::SliceMode, v4l2::MPEG_VIDEO_MULTI_SLICE_MODE_MAX_MB);
    st.set_value(CapId::SliceMaxMb, 100);
    let payload = single(&st, CapId::SliceMode)?;
    assert_eq!(payload.wire_id, hfi::PROP_MULTI_SLICE_MB_COUNT);
    assert_eq!(payload.value(), 100);

    st.set_value(CapId::SliceMode, v4l2::MPEG_VIDEO_MULTI_SLICE_MODE_MAX_BYTES);
    let payload = single(&st, CapId::SliceMode)?;
    assert_eq!(payload.wire_id, hfi::PROP_MULTI_SLICE_BYTES_COUNT);
    assert_eq!(payload.value(), 512);
    Ok(())
}

#[test]
fn test_nal_length() -> anyhow::Result<()> {
    let mut st = state(Codec::Hevc)?;
    assert_eq!(
        single(&st, CapId::WithoutStartcode)?.value(),
        hfi::NAL_LENGTH_STARTCODES
    );
    st.set_value(CapId::WithoutStartcode, 1);
    st.set_value(CapId::NalLengthField, v4l2::MPEG_VIDEO_HEVC_SIZE_4);
    let payload = single(&st, CapId::WithoutStartcode)?;
    assert_eq!(payload.wire_id, hfi::PROP_NAL_LENGTH_FIELD);
    assert_eq!(payload.kind, PayloadKind::U32Enum);
    assert_eq!(payload.value(), hfi::NAL_LENGTH_SIZE_4);

    let mut h264 = state(Codec::H264)?;
    h264.set_value(CapId::WithoutStartcode, 1);
    h264.set_value(CapId::NalLengthField, v4l2::MPEG_VIDEO_HEVC_SIZE_4);
    assert_eq!(
        single(&h264, CapId::WithoutStartcode)?.wire_id,
        hfi::PROP_NAL_LENGTH_FIELD
    );

    st.set_value(CapId::NalLengthField, v4l2::MPEG_VIDEO_HEVC_SIZE_0);
    let out = serialize(&st, CapId::WithoutStartcode)?;
    assert_eq!(out.payloads[0].value(), hfi::NAL_LENGTH_STARTCODES);
    assert_eq!(out.diagnostics.len(), 1);
    Ok(())
}

#[test]
fn test_layer_count_and_type() -> anyhow::Result<()> {
    let mut st = state(Codec::Hevc)?;
    st.layer_type = LayerType::HierPSlidingWindow;
    st.set_value(CapId::EnhLayerCount, 2);
    let out = serialize(&st, CapId::EnhLayerCount)?;
    let sent: Vec<(u32, u32)> = out.payloads.iter().map(|p| (p.wire_id, p.value())).collect();
    assert_eq!(
        sent,
        vec![
            (hfi::PROP_LAYER_ENCODING_TYPE, LayerType::HierPSlidingWindow.as_u32()),
            (hfi::PROP_LAYER_COUNT, 3),
        ]
    );
    let type_port = st.descriptor(CapId::LayerType).map(port_for);
    assert_eq!(Some(out.payloads[0].port), type_port);

    st.streaming = true;
    assert_eq!(single(&st, CapId::EnhLayerCount)?.value(), 3);
    assert_eq!(single(&st, CapId::GopSize)?.value(), 59);

    st.layer_type = LayerType::HierB;
    assert!(serialize(&st, CapId::EnhLayerCount)?.payloads.is_empty());
    assert!(serialize(&st, CapId::GopSize)?.payloads.is_empty());
    Ok(())
}

#[test]
fn test_rc_gated_payloads() -> anyhow::Result<()> {
    let mut st = state(Codec::Hevc)?;
    st.rc_type = RcType::VbrCfr;
    assert!(serialize(&st, CapId::ConstantQuality)?.payloads.is_empty());
    st.rc_type = RcType::Cq;
    assert_eq!(single(&st, CapId::ConstantQuality)?.value(), 90);

    client_set(&mut st, CapId::UseLtr, 1);
    assert!(serialize(&st, CapId::UseLtr)?.payloads.is_empty());
    st.set_value(CapId::LtrCount, 2);
    assert_eq!(single(&st, CapId::UseLtr)?.value(), 1);
    assert!(serialize(&st, CapId::MarkLtr)?.payloads.is_empty());
    Ok(())
}

#[test]
fn test_request_sync_frame() -> anyhow::Result<()> {
    let mut st = state(Codec::H264)?;
    assert_eq!(
        single(&st, CapId::RequestSyncFrame)?.value(),
        hfi::SYNC_FRAME_REQUEST_WITHOUT_SEQ_HDR
    );
    st.set_value(CapId::PrependSpsPpsToIdr, 1);
    assert_eq!(
        single(&st, CapId::RequestSyncFrame)?.value(),
        hfi::SYNC_FRAME_REQUEST_WITH_PREFIX_SEQ_HDR
    );
    Ok(())
}

#[test]
fn test_unregistered_and_unset() -> anyhow::Result<()> {
    let st = state(Codec::Hevc)?;
    assert!(matches!(
        serialize(&st, CapId::EntropyMode),
        Err(CapError::InvalidParams(_))
    ));
    assert!(serialize(&st, CapId::PixFmts)?.payloads.is_empty());
    Ok(())
}
