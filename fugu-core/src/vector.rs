//! 256bitベクタレジスタのレーン分解
//!
//! `__m256i` の生データ（64bit ワード4つ）を、128bit ずつの2つのレーンに分けて
//! 16進バイト列として表示します。

/// ベクタ値のサマリー文字列
pub const VECTOR_SUMMARY: &str = "AVX2 256bit Register";

/// 合成子要素の数（レーン数）
pub const LANE_COUNT: usize = 2;

/// 1レーンあたりのバイト数
pub const LANE_BYTES: usize = 16;

/// 256bitベクタ値
///
/// 32バイトをリトルエンディアンの u64 ワード4つとして保持します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VectorValue {
    pub words: [u64; 4],
}

impl VectorValue {
    /// ワード4つからベクタ値を作成する
    pub fn new(w0: u64, w1: u64, w2: u64, w3: u64) -> Self {
        Self {
            words: [w0, w1, w2, w3],
        }
    }

    /// 32バイトのリトルエンディアン列からベクタ値を作成する
    pub fn from_le_bytes(bytes: &[u8; 32]) -> Self {
        let mut words = [0u64; 4];
        for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(8)) {
            let mut arr = [0u8; 8];
            arr.copy_from_slice(chunk);
            *word = u64::from_le_bytes(arr);
        }
        Self { words }
    }

    /// 合成子要素の数
    pub fn num_children(&self) -> usize {
        LANE_COUNT
    }

    /// 指定インデックスのレーンを文字列化する
    ///
    /// 0 はバイト 0..15、1 はバイト 16..31。それ以外は `None`。
    pub fn lane(&self, index: i64) -> Option<String> {
        match index {
            0 => Some(lane_text(self.words[0], self.words[1])),
            1 => Some(lane_text(self.words[2], self.words[3])),
            _ => None,
        }
    }

    /// 両レーンを文字列化する
    pub fn lanes(&self) -> [String; 2] {
        [
            lane_text(self.words[0], self.words[1]),
            lane_text(self.words[2], self.words[3]),
        ]
    }

    /// 組み込みのベクタ表示（レーン分解が無効な場合に使用）
    pub fn words_summary(&self) -> String {
        let words: Vec<String> = self.words.iter().map(|w| format!("0x{:016x}", w)).collect();
        format!("{{{}}}", words.join(", "))
    }
}

/// レーンの子要素名（"lane 1", "lane 2"）
pub fn lane_name(index: usize) -> Option<&'static str> {
    match index {
        0 => Some("lane 1"),
        1 => Some("lane 2"),
        _ => None,
    }
}

/// "[n]" 形式の子要素名をインデックスに変換する
pub fn child_index(name: &str) -> Option<usize> {
    name.trim_start_matches('[')
        .trim_end_matches(']')
        .trim()
        .parse()
        .ok()
}

/// 2ワード（16バイト）をスペース区切りの16進バイト列にする
///
/// 各ワードは下位バイトから順に出力します。
pub fn lane_text(lo: u64, hi: u64) -> String {
    let mut text = String::with_capacity(LANE_BYTES * 3);
    for (i, word) in [lo, hi].into_iter().enumerate() {
        for shift in 0..8 {
            if i > 0 || shift > 0 {
                text.push(' ');
            }
            let byte = (word >> (8 * shift)) & 0xff;
            text.push_str(&format!("{:02x}", byte));
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_byte_order() {
        let value = VectorValue::new(0x0102030405060708, 0, 0, 0);
        let lane = value.lane(0).unwrap();
        assert!(lane.starts_with("08 07 06 05 04 03 02 01 "));
    }

    #[test]
    fn test_all_zero_lanes() {
        let value = VectorValue::default();
        let expected = vec!["00"; 16].join(" ");
        let [lane1, lane2] = value.lanes();
        assert_eq!(lane1, expected);
        assert_eq!(lane2, expected);
        assert!(!lane1.ends_with(' '));
    }

    #[test]
    fn test_lane_shape() {
        let value = VectorValue::new(u64::MAX, 0xdeadbeef, 0x0123456789abcdef, 1);
        for lane in value.lanes() {
            let tokens: Vec<&str> = lane.split(' ').collect();
            assert_eq!(tokens.len(), 16);
            for token in tokens {
                assert_eq!(token.len(), 2);
                assert!(token.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
            }
        }
    }

    #[test]
    fn test_second_lane_uses_upper_words() {
        let value = VectorValue::new(0, 0, 0xff, 0xab00000000000000);
        assert_eq!(
            value.lane(1).unwrap(),
            "ff 00 00 00 00 00 00 00 00 00 00 00 00 00 00 ab"
        );
    }

    #[test]
    fn test_lane_out_of_range() {
        let value = VectorValue::default();
        assert_eq!(value.num_children(), 2);
        assert!(value.lane(2).is_none());
        assert!(value.lane(-1).is_none());
    }

    #[test]
    fn test_from_le_bytes() {
        let mut bytes = [0u8; 32];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = i as u8;
        }
        let value = VectorValue::from_le_bytes(&bytes);
        assert_eq!(value.words[0], 0x0706050403020100);
        assert_eq!(
            value.lane(1).unwrap(),
            "10 11 12 13 14 15 16 17 18 19 1a 1b 1c 1d 1e 1f"
        );
    }

    #[test]
    fn test_child_index() {
        assert_eq!(child_index("[0]"), Some(0));
        assert_eq!(child_index("[1]"), Some(1));
        assert_eq!(child_index("lane"), None);
        assert_eq!(lane_name(1), Some("lane 2"));
        assert_eq!(lane_name(2), None);
    }

    #[test]
    fn test_words_summary() {
        let value = VectorValue::new(1, 2, 3, 0xff);
        assert_eq!(
            value.words_summary(),
            "{0x0000000000000001, 0x0000000000000002, 0x0000000000000003, 0x00000000000000ff}"
        );
    }
}
