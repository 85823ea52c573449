//! 長さ付き文字列のフォーマット
//!
//! サイズと文字バッファを持つ管理文字列を、先頭の一定文字数だけ表示します。

use crate::RenderConfig;

/// サイズ0の文字列を表すマーカー
pub const EMPTY_MARKER: &str = "... empty ...";

/// 管理文字列の値
///
/// `size` が有効バイト数の唯一の根拠で、終端文字は信用しません。
/// `size == 0` の場合 `contents` は参照しません。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagedStringValue<'a> {
    /// 論理文字数
    pub size: u64,
    /// 文字バッファ
    pub contents: &'a str,
}

impl<'a> ManagedStringValue<'a> {
    pub fn new(size: u64, contents: &'a str) -> Self {
        Self { size, contents }
    }

    /// 文字列から作成する（サイズはバイト長）
    pub fn from_text(contents: &'a str) -> Self {
        Self {
            size: contents.len() as u64,
            contents,
        }
    }

    /// 値がまだ読み込まれていないか
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

/// 長さ制限付き文字列レンダラー
#[derive(Debug, Clone)]
pub struct BoundedStringRenderer {
    max_length: usize,
}

impl Default for BoundedStringRenderer {
    fn default() -> Self {
        Self::new(&RenderConfig::default())
    }
}

impl BoundedStringRenderer {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            max_length: config.max_string_length,
        }
    }

    /// 表示する最大文字数
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// 管理文字列をレンダリングする
    pub fn render_value(&self, value: &ManagedStringValue<'_>) -> String {
        self.render(value.size, value.contents)
    }

    /// サイズと生データから表示文字列を作る
    ///
    /// `size > max_length` の判定はここだけで行い、省略バイト数もこの分岐内でのみ計算します。
    pub fn render(&self, size: u64, contents: &str) -> String {
        if size == 0 {
            return EMPTY_MARKER.to_string();
        }

        let max = self.max_length as u64;
        if size > max {
            let mut text: String = contents.chars().take(self.max_length).collect();
            text.push_str(&format!("... ({} bytes)", size - max));
            text
        } else {
            contents.chars().take(size as usize).collect()
        }
    }
}

/// 前後の引用符をすべて取り除く
pub fn strip_quotes(text: &str) -> &str {
    text.trim_start_matches('"').trim_end_matches('"')
}

/// `std::string_view` のサマリー
///
/// データポインタの（引用符付き）サマリーから引用符を外したもの。
pub fn string_view_summary(quoted: &str) -> String {
    strip_quotes(quoted).to_string()
}
