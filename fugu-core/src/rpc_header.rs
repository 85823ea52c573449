//! RPCヘッダのフォーマット

use crate::string::{strip_quotes, BoundedStringRenderer, ManagedStringValue};

/// ヘッダが未読み込みの場合のマーカー
pub const NOT_LOADED_MARKER: &str = "[Not Loaded]";

/// RPCヘッダの値
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RpcHeaderValue<'a> {
    /// プロトコルバージョン（"jsonrpc"）
    pub protocol_version: ManagedStringValue<'a>,
    /// メソッド名
    pub method: ManagedStringValue<'a>,
}

impl<'a> RpcHeaderValue<'a> {
    pub fn new(protocol_version: ManagedStringValue<'a>, method: ManagedStringValue<'a>) -> Self {
        Self {
            protocol_version,
            method,
        }
    }

    /// 両フィールドが読み込み済みか
    pub fn is_loaded(&self) -> bool {
        !self.protocol_version.is_empty() && !self.method.is_empty()
    }
}

/// RPCヘッダを `"<method> (v<version>)"` 形式にする
pub fn render_rpc_header(header: &RpcHeaderValue<'_>, strings: &BoundedStringRenderer) -> String {
    render_rpc_header_with(header.protocol_version.size, header.method.size, |field| match field {
        RpcField::ProtocolVersion => strings.render_value(&header.protocol_version),
        RpcField::Method => strings.render_value(&header.method),
    })
}

/// RPCヘッダのフィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcField {
    ProtocolVersion,
    Method,
}

/// フィールドの表示をホスト側のサマリーに委譲する版
///
/// `summarize` はどちらかのサイズが0の場合は呼ばれません。
pub fn render_rpc_header_with<F>(version_size: u64, method_size: u64, mut summarize: F) -> String
where
    F: FnMut(RpcField) -> String,
{
    if version_size == 0 || method_size == 0 {
        return NOT_LOADED_MARKER.to_string();
    }

    let version = summarize(RpcField::ProtocolVersion);
    let method = summarize(RpcField::Method);
    format!("{} (v{})", strip_quotes(&method), strip_quotes(&version))
}
