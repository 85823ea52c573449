//! Fugu メモリスナップショットと型レイアウト
//!
//! このクレートは、メモリスナップショットから値を読み取る低レベル機能を提供します。
//! 読み取った値は `fugu_core::HostValue` を実装した値ツリーとして返され、
//! そのままサマリーレジストリに渡せます。

pub mod layout;
pub mod memory;

pub use layout::{
    read_managed_string, read_rpc_header, read_string_view, read_vector256, RpcHeaderLayout,
    ValueNode,
};
pub use memory::{MemoryError, MemoryReader, MemoryRegion, SnapshotMemory};

/// ターゲットアクセスの結果型
pub type Result<T> = anyhow::Result<T>;
