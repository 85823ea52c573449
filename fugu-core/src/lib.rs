//! Fugu 値サマリー
//!
//! このクレートは、デバッガで検査した値を人間が読みやすい文字列にする機能を提供します。
//! 256bitベクタのレーン分解、長さ付き文字列の切り詰め表示、RPCヘッダの要約を行い、
//! 型名からそれらを引き当てるレジストリを備えます。

pub mod host;
pub mod registry;
pub mod rpc_header;
pub mod string;
pub mod vector;

pub use host::HostValue;
pub use registry::{Category, RegistryError, SummaryKind, SummaryRegistry, TypeMatcher};
pub use rpc_header::{render_rpc_header, render_rpc_header_with, RpcField, RpcHeaderValue};
pub use string::{BoundedStringRenderer, ManagedStringValue};
pub use vector::VectorValue;

/// サマリー処理の結果型
pub type Result<T> = anyhow::Result<T>;

/// 文字列の既定の最大表示文字数
pub const DEFAULT_MAX_STRING_LENGTH: usize = 64;

/// レンダリング設定
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// 管理文字列の最大表示文字数
    pub max_string_length: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_string_length: DEFAULT_MAX_STRING_LENGTH,
        }
    }
}
