//! スナップショットから読み取った値のサマリーテスト

use fugu_core::{RenderConfig, SummaryRegistry};
use fugu_target::{
    read_managed_string, read_rpc_header, read_string_view, read_vector256, RpcHeaderLayout,
    SnapshotMemory,
};

const HEADER_ADDR: u64 = 0x1000;
const HEAP_ADDR: u64 = 0x8000;

fn managed_string(block: u64, size: u32) -> [u8; 16] {
    let mut data = [0u8; 16];
    data[0..8].copy_from_slice(&block.to_le_bytes());
    data[8..12].copy_from_slice(&size.to_le_bytes());
    data
}

/// RpcHeader { arena, json_rpc, method } とヒープ上の文字列を配置する
fn header_snapshot(version: &str, method: &str) -> SnapshotMemory {
    let mut heap = Vec::new();
    heap.extend_from_slice(version.as_bytes());
    heap.extend_from_slice(method.as_bytes());

    let mut header = vec![0u8; 40];
    header[0..8].copy_from_slice(&0x7fff_0000u64.to_le_bytes());
    header[8..24].copy_from_slice(&managed_string(HEAP_ADDR, version.len() as u32));
    header[24..40].copy_from_slice(&managed_string(
        HEAP_ADDR + version.len() as u64,
        method.len() as u32,
    ));

    let mut memory = SnapshotMemory::new();
    memory.map(HEADER_ADDR, header).unwrap();
    if !heap.is_empty() {
        memory.map(HEAP_ADDR, heap).unwrap();
    }
    memory
}

fn registry() -> SummaryRegistry {
    SummaryRegistry::with_defaults(&RenderConfig::default()).unwrap()
}

#[test]
fn test_rpc_header_from_snapshot() {
    let memory = header_snapshot("2.0", "textDocument/didOpen");
    let node = read_rpc_header(&memory, HEADER_ADDR, &RpcHeaderLayout::default()).unwrap();
    assert_eq!(
        registry().summarize(&node).unwrap(),
        "textDocument/didOpen (v2.0)"
    );
}

#[test]
fn test_rpc_header_not_loaded_from_snapshot() {
    let memory = header_snapshot("", "initialize");
    let node = read_rpc_header(&memory, HEADER_ADDR, &RpcHeaderLayout::default()).unwrap();
    assert_eq!(registry().summarize(&node).unwrap(), "[Not Loaded]");
}

#[test]
fn test_managed_string_truncated_from_snapshot() {
    let text = "z".repeat(100);
    let mut memory = SnapshotMemory::new();
    memory.map(HEADER_ADDR, managed_string(HEAP_ADDR, 100).to_vec()).unwrap();
    memory.map(HEAP_ADDR, text.into_bytes()).unwrap();

    let node = read_managed_string(&memory, HEADER_ADDR).unwrap();
    assert_eq!(
        registry().summarize(&node).unwrap(),
        format!("{}... (36 bytes)", "z".repeat(64))
    );
}

#[test]
fn test_string_view_from_snapshot() {
    let mut view = vec![0u8; 16];
    view[0..8].copy_from_slice(&8u64.to_le_bytes());
    view[8..16].copy_from_slice(&HEAP_ADDR.to_le_bytes());

    let mut memory = SnapshotMemory::new();
    memory.map(HEADER_ADDR, view).unwrap();
    memory.map(HEAP_ADDR, b"\"quoted\" and more".to_vec()).unwrap();

    let node = read_string_view(&memory, HEADER_ADDR).unwrap();
    assert_eq!(registry().summarize(&node).unwrap(), "quoted");
}

#[test]
fn test_vector_from_snapshot() {
    let mut memory = SnapshotMemory::new();
    memory.map(HEADER_ADDR, (0u8..32).collect()).unwrap();

    let node = read_vector256(&memory, HEADER_ADDR).unwrap();
    let registry = registry();
    assert_eq!(registry.summarize(&node).unwrap(), "AVX2 256bit Register");

    let children = registry.children(&node).unwrap();
    assert_eq!(
        children,
        vec![
            (
                "lane 1".to_string(),
                "00 01 02 03 04 05 06 07 08 09 0a 0b 0c 0d 0e 0f".to_string()
            ),
            (
                "lane 2".to_string(),
                "10 11 12 13 14 15 16 17 18 19 1a 1b 1c 1d 1e 1f".to_string()
            ),
        ]
    );
}

#[test]
fn test_vector_child_by_name() {
    let mut memory = SnapshotMemory::new();
    memory.map(HEADER_ADDR, (0u8..32).collect()).unwrap();
    let node = read_vector256(&memory, HEADER_ADDR).unwrap();

    let mut registry = registry();
    let (name, lane) = registry.child_named(&node, "[1]").unwrap();
    assert_eq!(name, "lane 2");
    assert!(lane.starts_with("10 11 12"));

    registry.disable("avx2").unwrap();
    assert_eq!(registry.summarize(&node).unwrap(), "AVX2 256bit Register");
    assert!(registry.child_named(&node, "[1]").is_none());
}

#[test]
fn test_header_at_end_of_address_space() {
    let memory = SnapshotMemory::new();
    assert!(read_rpc_header(&memory, u64::MAX, &RpcHeaderLayout::default()).is_err());
}
