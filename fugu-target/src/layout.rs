//! ネイティブ型のメモリレイアウト
//!
//! メモリスナップショットから各型を読み取り、`HostValue` を実装した値ツリーを構築します。
//!
//! レイアウト（x86_64）:
//! - `ManagedString`: { rented_block: *char (+0), size: u32 (+8) }、16バイト
//! - `std::string_view`: { _M_len: usize (+0), _M_str: *char (+8) }、16バイト
//! - `RpcHeader`: { arena: &Arena (+0), json_rpc (+8), method (+24), ... }
//! - `__m256i`: u64 × 4

use crate::memory::{le_array, MemoryError, MemoryReader};
use crate::Result;
use fugu_core::{HostValue, VectorValue};
use tracing::debug;

pub const MANAGED_STRING_TYPE: &str = "Perimortem::Memory::ManagedString";
pub const RPC_HEADER_TYPE: &str = "Perimortem::Storage::Json::RpcHeader";
pub const STRING_VIEW_TYPE: &str = "std::string_view";
pub const VECTOR256_TYPE: &str = "__m256i";

/// 文字列データを読み取る最大バイト数
const MAX_STR_LEN: usize = 1024;

/// 値ツリーのノード
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueNode {
    pub type_name: String,
    /// スカラー値（ポインタの場合はアドレス）
    pub value: u64,
    /// ポインタが指すデータ
    pub bytes: Option<Vec<u8>>,
    /// フィールド（宣言順）
    pub fields: Vec<(String, ValueNode)>,
}

impl ValueNode {
    pub fn scalar(type_name: &str, value: u64) -> Self {
        Self {
            type_name: type_name.to_string(),
            value,
            bytes: None,
            fields: Vec::new(),
        }
    }

    pub fn pointer(type_name: &str, address: u64, bytes: Option<Vec<u8>>) -> Self {
        Self {
            type_name: type_name.to_string(),
            value: address,
            bytes,
            fields: Vec::new(),
        }
    }

    pub fn record(type_name: &str, fields: Vec<(&str, ValueNode)>) -> Self {
        Self {
            type_name: type_name.to_string(),
            value: 0,
            bytes: None,
            fields: fields
                .into_iter()
                .map(|(name, node)| (name.to_string(), node))
                .collect(),
        }
    }

    /// ManagedString のノードを作る
    pub fn managed_string(block: u64, size: u32, bytes: Option<Vec<u8>>) -> Self {
        Self::record(
            MANAGED_STRING_TYPE,
            vec![
                ("rented_block", Self::pointer("char *", block, bytes)),
                ("size", Self::scalar("uint32_t", size as u64)),
            ],
        )
    }

    /// RpcHeader のノードを作る
    pub fn rpc_header(json_rpc: ValueNode, method: ValueNode) -> Self {
        Self::record(RPC_HEADER_TYPE, vec![("json_rpc", json_rpc), ("method", method)])
    }

    /// __m256i のノードを作る
    pub fn vector256(words: [u64; 4]) -> Self {
        Self::record(
            VECTOR256_TYPE,
            words
                .iter()
                .map(|w| ("", Self::scalar("long long", *w)))
                .collect(),
        )
    }
}

impl HostValue for ValueNode {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn field_named(&self, name: &str) -> Option<&dyn HostValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, node)| node as &dyn HostValue)
    }

    fn indexed_child(&self, index: usize) -> Option<&dyn HostValue> {
        self.fields.get(index).map(|(_, node)| node as &dyn HostValue)
    }

    fn raw_unsigned(&self) -> u64 {
        self.value
    }

    fn raw_bytes(&self) -> Option<&[u8]> {
        self.bytes.as_deref()
    }
}

/// RpcHeader のフィールドオフセット
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RpcHeaderLayout {
    pub json_rpc_offset: u64,
    pub method_offset: u64,
}

impl Default for RpcHeaderLayout {
    fn default() -> Self {
        Self {
            json_rpc_offset: 8,
            method_offset: 24,
        }
    }
}

/// ベースアドレスにオフセットを足したフィールドアドレス
///
/// アドレス空間の終端を越える場合は `MemoryError::OutOfBounds`。
fn field_address(address: u64, offset: u64) -> Result<u64> {
    address.checked_add(offset).ok_or_else(|| {
        MemoryError::OutOfBounds {
            addr: address,
            size: offset as usize,
        }
        .into()
    })
}

/// ManagedString を読み取る
///
/// `size == 0` の場合、`rented_block` の指す先は読みません。
pub fn read_managed_string(memory: &dyn MemoryReader, address: u64) -> Result<ValueNode> {
    let block = memory.read_u64(address)?;
    let size = memory.read_u32(field_address(address, 8)?)?;

    let bytes = if size == 0 {
        None
    } else {
        Some(memory.read(block, (size as usize).min(MAX_STR_LEN))?)
    };

    Ok(ValueNode::managed_string(block, size, bytes))
}

/// std::string_view を読み取る
pub fn read_string_view(memory: &dyn MemoryReader, address: u64) -> Result<ValueNode> {
    let len = memory.read_u64(address)?;
    let data = memory.read_u64(field_address(address, 8)?)?;

    let bytes = if len == 0 {
        None
    } else {
        Some(memory.read(data, (len as usize).min(MAX_STR_LEN))?)
    };

    Ok(ValueNode::record(
        STRING_VIEW_TYPE,
        vec![
            ("_M_len", ValueNode::scalar("size_t", len)),
            ("_M_str", ValueNode::pointer("const char *", data, bytes)),
        ],
    ))
}

/// RpcHeader を読み取る
pub fn read_rpc_header(
    memory: &dyn MemoryReader,
    address: u64,
    layout: &RpcHeaderLayout,
) -> Result<ValueNode> {
    debug!(
        "read_rpc_header at 0x{:x} (json_rpc=+{}, method=+{})",
        address, layout.json_rpc_offset, layout.method_offset
    );
    let json_rpc = read_managed_string(memory, field_address(address, layout.json_rpc_offset)?)?;
    let method = read_managed_string(memory, field_address(address, layout.method_offset)?)?;

    Ok(ValueNode::rpc_header(json_rpc, method))
}

/// __m256i を読み取る
pub fn read_vector256(memory: &dyn MemoryReader, address: u64) -> Result<ValueNode> {
    let bytes = memory.read(address, 32)?;
    let vector = VectorValue::from_le_bytes(&le_array(&bytes)?);
    Ok(ValueNode::vector256(vector.words))
}
