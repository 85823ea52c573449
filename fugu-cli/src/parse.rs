//! パース関連のユーティリティ関数

use anyhow::Result;
use fugu_core::{SummaryKind, SummaryRegistry};

/// アドレス文字列をu64にパース
///
/// 16進数（0xプレフィックス付き）または10進数をサポート
pub fn parse_address(s: &str) -> Result<u64> {
    let s = s.trim();

    if s.starts_with("0x") || s.starts_with("0X") {
        // 16進数
        u64::from_str_radix(&s[2..], 16)
            .map_err(|e| anyhow::anyhow!("Invalid hexadecimal address '{}': {}", s, e))
    } else {
        // 10進数を試す
        s.parse::<u64>()
            .or_else(|_| {
                // 10進数でもダメなら16進数として解釈を試みる
                u64::from_str_radix(s, 16)
            })
            .map_err(|e| anyhow::anyhow!("Invalid address '{}': {}", s, e))
    }
}

/// `print` の型指定をサマリーの種類に変換する
///
/// 短縮名のほか、レジストリに登録された型名も受け付けます。
pub fn parse_kind(s: &str, registry: &SummaryRegistry) -> Result<SummaryKind> {
    let kind = match s {
        "m256" | "vector" => Some(SummaryKind::Vector256),
        "string" | "managed" => Some(SummaryKind::ManagedString),
        "view" => Some(SummaryKind::StringView),
        "rpc" => Some(SummaryKind::RpcHeader),
        _ => registry.lookup(s),
    };
    kind.ok_or_else(|| anyhow::anyhow!("Unknown value kind '{}'", s))
}
