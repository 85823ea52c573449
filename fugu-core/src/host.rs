//! ホストデバッガの値インスペクションインターフェース
//!
//! デバッガが提供する値オブジェクトへの構造的アクセスを抽象化します。
//! サマリープロバイダはこのトレイト経由でフィールドを読み取り、型付きの値に変換してから
//! 純粋なレンダラーに渡します。

/// ホストの値オブジェクト
pub trait HostValue {
    /// 実行時の型名（例: `Perimortem::Memory::ManagedString`）
    fn type_name(&self) -> &str;

    /// 名前でフィールドを取得する
    fn field_named(&self, name: &str) -> Option<&dyn HostValue>;

    /// インデックスで子要素を取得する（範囲外は `None`）
    fn indexed_child(&self, index: usize) -> Option<&dyn HostValue>;

    /// スカラー値のビットパターン
    fn raw_unsigned(&self) -> u64;

    /// 裏付けとなるバイト列（読み取れない場合は `None`）
    fn raw_bytes(&self) -> Option<&[u8]> {
        None
    }
}

/// フィールドのスカラー値を読む（フィールドが無ければ0）
pub fn field_unsigned(value: &dyn HostValue, name: &str) -> u64 {
    value.field_named(name).map(|f| f.raw_unsigned()).unwrap_or(0)
}

/// フィールドのバイト列を最大 `len` バイトまで文字列として読む
pub fn field_text(value: &dyn HostValue, name: &str, len: usize) -> String {
    value
        .field_named(name)
        .and_then(|f| f.raw_bytes())
        .map(|bytes| String::from_utf8_lossy(&bytes[..bytes.len().min(len)]).into_owned())
        .unwrap_or_default()
}
