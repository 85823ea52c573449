//! レンダラーの公開APIに対するテスト

use fugu_core::rpc_header::NOT_LOADED_MARKER;
use fugu_core::string::EMPTY_MARKER;
use fugu_core::{
    render_rpc_header, BoundedStringRenderer, ManagedStringValue, RenderConfig, RpcHeaderValue,
    VectorValue,
};

#[test]
fn test_vector_lanes_for_arbitrary_words() {
    let inputs = [
        [0, 0, 0, 0],
        [u64::MAX, u64::MAX, u64::MAX, u64::MAX],
        [0x0102030405060708, 0x1112131415161718, 0x2122232425262728, 0x3132333435363738],
        [0x8000000000000001, 0x00ff00ff00ff00ff, 0xdeadbeefcafebabe, 0x7f],
    ];

    for words in inputs {
        let value = VectorValue::new(words[0], words[1], words[2], words[3]);
        let lanes = value.lanes();
        assert_eq!(lanes.len(), 2);
        for lane in &lanes {
            assert_eq!(lane.len(), 16 * 3 - 1);
            assert!(!lane.ends_with(' '));
            assert_eq!(lane.split(' ').count(), 16);
            assert_eq!(lane.to_lowercase(), *lane);
        }
        assert_eq!(value.lane(0).as_ref(), Some(&lanes[0]));
        assert_eq!(value.lane(1).as_ref(), Some(&lanes[1]));
        assert!(value.lane(2).is_none());
        assert!(value.lane(-1).is_none());
    }
}

#[test]
fn test_vector_lane_order() {
    let value = VectorValue::new(
        0x0102030405060708,
        0x1112131415161718,
        0x2122232425262728,
        0x3132333435363738,
    );
    assert_eq!(
        value.lane(0).unwrap(),
        "08 07 06 05 04 03 02 01 18 17 16 15 14 13 12 11"
    );
    assert_eq!(
        value.lane(1).unwrap(),
        "28 27 26 25 24 23 22 21 38 37 36 35 34 33 32 31"
    );
}

#[test]
fn test_bounded_string_boundaries() {
    let renderer = BoundedStringRenderer::default();
    assert_eq!(renderer.max_length(), 64);

    assert_eq!(renderer.render(0, "ignored"), EMPTY_MARKER);
    assert_eq!(renderer.render(1, "a"), "a");
    assert_eq!(renderer.render(63, &"a".repeat(63)), "a".repeat(63));
    assert_eq!(renderer.render(64, &"a".repeat(64)), "a".repeat(64));
    assert_eq!(
        renderer.render(65, &"a".repeat(65)),
        format!("{}... (1 bytes)", "a".repeat(64))
    );
    assert_eq!(
        renderer.render(100, &"a".repeat(100)),
        format!("{}... (36 bytes)", "a".repeat(64))
    );
}

#[test]
fn test_rpc_header() {
    let strings = BoundedStringRenderer::new(&RenderConfig::default());

    let header = RpcHeaderValue::new(
        ManagedStringValue::new(3, "1.0"),
        ManagedStringValue::new(4, "ping"),
    );
    assert_eq!(render_rpc_header(&header, &strings), "ping (v1.0)");
    assert_eq!(
        render_rpc_header(&header, &strings),
        render_rpc_header(&header, &strings)
    );

    let unloaded = RpcHeaderValue::new(
        ManagedStringValue::new(0, ""),
        ManagedStringValue::new(4, "ping"),
    );
    assert!(!unloaded.is_loaded());
    assert_eq!(render_rpc_header(&unloaded, &strings), NOT_LOADED_MARKER);
}
