//! サマリープロバイダの登録とディスパッチ
//!
//! 型名からサマリーの種類を引き当て、対応するレンダラーを呼び出します。
//! プロバイダはカテゴリ単位で有効化・無効化でき、有効なカテゴリのうち先頭のものが優先されます。

use crate::host::{field_text, field_unsigned, HostValue};
use crate::rpc_header::{render_rpc_header_with, RpcField};
use crate::string::{string_view_summary, BoundedStringRenderer, ManagedStringValue, EMPTY_MARKER};
use crate::vector::{child_index, lane_name, VectorValue, VECTOR_SUMMARY};
use crate::{RenderConfig, Result};
use regex::Regex;
use thiserror::Error;
use tracing::{debug, trace};

/// 既定カテゴリ名（初期状態で有効）
pub const DEFAULT_CATEGORY: &str = "default";

/// レーン分解を提供するカテゴリ名
pub const AVX2_CATEGORY: &str = "avx2";

/// 組み込みのベクタ表示カテゴリ名
pub const VECTOR_TYPES_CATEGORY: &str = "VectorTypes";

/// レジストリ操作のエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
}

/// サマリーの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryKind {
    /// std::string_view
    StringView,
    /// Perimortem::Memory::ManagedString
    ManagedString,
    /// Perimortem::Storage::Json::RpcHeader
    RpcHeader,
    /// __m256i（固定サマリーのみ）
    Vector256,
    /// __m256i（固定サマリーとレーン分解）
    VectorLanes,
    /// __m256i（ワード表示）
    VectorWords,
}

/// 型名のマッチャー
#[derive(Debug, Clone)]
pub enum TypeMatcher {
    /// 完全一致
    Exact(String),
    /// 正規表現
    Regex(Regex),
}

impl TypeMatcher {
    pub fn exact(name: &str) -> Self {
        TypeMatcher::Exact(name.to_string())
    }

    pub fn regex(pattern: &str) -> Result<Self> {
        let re = Regex::new(pattern)
            .map_err(|e| anyhow::anyhow!("Invalid type pattern '{}': {}", pattern, e))?;
        Ok(TypeMatcher::Regex(re))
    }

    pub fn matches(&self, type_name: &str) -> bool {
        match self {
            TypeMatcher::Exact(name) => name == type_name,
            TypeMatcher::Regex(re) => re.is_match(type_name),
        }
    }
}

/// サマリーのカテゴリ
#[derive(Debug, Clone)]
pub struct Category {
    name: String,
    enabled: bool,
    entries: Vec<(TypeMatcher, SummaryKind)>,
}

impl Category {
    /// 無効状態のカテゴリを作成する
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            enabled: false,
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// 登録されているエントリ数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn lookup(&self, type_name: &str) -> Option<SummaryKind> {
        self.entries
            .iter()
            .find(|(matcher, _)| matcher.matches(type_name))
            .map(|(_, kind)| *kind)
    }
}

/// サマリーレジストリ
pub struct SummaryRegistry {
    categories: Vec<Category>,
    strings: BoundedStringRenderer,
}

impl SummaryRegistry {
    /// 空のレジストリを作成する
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            categories: Vec::new(),
            strings: BoundedStringRenderer::new(config),
        }
    }

    /// 既定のプロバイダを登録したレジストリを作成する
    ///
    /// `__m256i` の固定サマリーは `default` カテゴリに置くため、`avx2` を無効にしても残ります。
    /// `avx2` カテゴリを有効にし、組み込みの `VectorTypes` カテゴリを無効にします。
    pub fn with_defaults(config: &RenderConfig) -> Result<Self> {
        let mut registry = Self::new(config);

        registry.add(DEFAULT_CATEGORY, TypeMatcher::exact("__m256i"), SummaryKind::Vector256);
        registry.enable(DEFAULT_CATEGORY)?;

        registry.add(VECTOR_TYPES_CATEGORY, TypeMatcher::exact("__m256i"), SummaryKind::VectorWords);
        registry.enable(VECTOR_TYPES_CATEGORY)?;

        registry.add(AVX2_CATEGORY, TypeMatcher::exact("std::string_view"), SummaryKind::StringView);
        registry.add(
            AVX2_CATEGORY,
            TypeMatcher::regex(r"^std::basic_string_view<char(,.*)?>$")?,
            SummaryKind::StringView,
        );
        registry.add(
            AVX2_CATEGORY,
            TypeMatcher::exact("Perimortem::Memory::ManagedString"),
            SummaryKind::ManagedString,
        );
        registry.add(
            AVX2_CATEGORY,
            TypeMatcher::exact("Perimortem::Storage::Json::RpcHeader"),
            SummaryKind::RpcHeader,
        );
        registry.add(AVX2_CATEGORY, TypeMatcher::exact("__m256i"), SummaryKind::VectorLanes);

        registry.enable(AVX2_CATEGORY)?;
        registry.disable(VECTOR_TYPES_CATEGORY)?;
        Ok(registry)
    }

    /// プロバイダを登録する（カテゴリが無ければ無効状態で作成）
    pub fn add(&mut self, category: &str, matcher: TypeMatcher, kind: SummaryKind) {
        let index = match self.categories.iter().position(|c| c.name == category) {
            Some(index) => index,
            None => {
                self.categories.push(Category::new(category));
                self.categories.len() - 1
            }
        };
        self.categories[index].entries.push((matcher, kind));
    }

    /// カテゴリを有効にして最優先にする
    pub fn enable(&mut self, category: &str) -> std::result::Result<(), RegistryError> {
        let index = self.position(category)?;
        let mut entry = self.categories.remove(index);
        entry.enabled = true;
        self.categories.insert(0, entry);
        debug!("Enabled category '{}'", category);
        Ok(())
    }

    /// カテゴリを無効にする
    pub fn disable(&mut self, category: &str) -> std::result::Result<(), RegistryError> {
        let index = self.position(category)?;
        self.categories[index].enabled = false;
        debug!("Disabled category '{}'", category);
        Ok(())
    }

    /// 優先順のカテゴリ一覧
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// 文字列レンダラー
    pub fn strings(&self) -> &BoundedStringRenderer {
        &self.strings
    }

    fn position(&self, category: &str) -> std::result::Result<usize, RegistryError> {
        self.categories
            .iter()
            .position(|c| c.name == category)
            .ok_or_else(|| RegistryError::UnknownCategory(category.to_string()))
    }

    /// 型名に対応するサマリーの種類を探す
    pub fn lookup(&self, type_name: &str) -> Option<SummaryKind> {
        self.categories
            .iter()
            .filter(|c| c.enabled)
            .find_map(|c| c.lookup(type_name))
    }

    /// 値のサマリーを取得する
    ///
    /// 登録された型でなければ `None`。
    pub fn summarize(&self, value: &dyn HostValue) -> Option<String> {
        let kind = self.lookup(value.type_name())?;
        trace!("summarize type='{}' as {:?}", value.type_name(), kind);
        Some(self.summarize_as(kind, value))
    }

    /// 種類を指定して値のサマリーを取得する
    pub fn summarize_as(&self, kind: SummaryKind, value: &dyn HostValue) -> String {
        match kind {
            SummaryKind::StringView => self.string_view_summary(value),
            SummaryKind::ManagedString => self.managed_string_summary(value),
            SummaryKind::RpcHeader => self.rpc_header_summary(value),
            SummaryKind::Vector256 | SummaryKind::VectorLanes => VECTOR_SUMMARY.to_string(),
            SummaryKind::VectorWords => read_vector(value).words_summary(),
        }
    }

    /// 合成子要素の数
    ///
    /// レーン分解が有効な `__m256i` 以外は 0。
    pub fn num_children(&self, value: &dyn HostValue) -> usize {
        match self.lookup(value.type_name()) {
            Some(SummaryKind::VectorLanes) => read_vector(value).num_children(),
            _ => 0,
        }
    }

    /// 指定インデックスの合成子要素（名前と表示文字列）
    pub fn child_at(&self, value: &dyn HostValue, index: usize) -> Option<(String, String)> {
        if index >= self.num_children(value) {
            return None;
        }
        let name = lane_name(index)?;
        let lane = read_vector(value).lane(index as i64)?;
        Some((name.to_string(), lane))
    }

    /// "[n]" 形式の名前で合成子要素を引く
    pub fn child_named(&self, value: &dyn HostValue, name: &str) -> Option<(String, String)> {
        let index = child_index(name)?;
        trace!("child_named '{}' -> {}", name, index);
        self.child_at(value, index)
    }

    /// 合成子要素（名前と表示文字列）を取得する
    ///
    /// 合成子要素を持たない型では `None`。
    pub fn children(&self, value: &dyn HostValue) -> Option<Vec<(String, String)>> {
        let count = self.num_children(value);
        if count == 0 {
            return None;
        }
        Some((0..count).filter_map(|i| self.child_at(value, i)).collect())
    }

    fn string_view_summary(&self, value: &dyn HostValue) -> String {
        let len = value
            .field_named("_M_len")
            .map(|f| f.raw_unsigned() as usize)
            .unwrap_or(usize::MAX);
        let text = field_text(value, "_M_str", len);
        string_view_summary(&format!("\"{}\"", text))
    }

    fn managed_string_summary(&self, value: &dyn HostValue) -> String {
        let size = field_unsigned(value, "size");
        if size == 0 {
            return EMPTY_MARKER.to_string();
        }

        let text = field_text(value, "rented_block", size as usize);
        self.strings.render_value(&ManagedStringValue::new(size, &text))
    }

    fn rpc_header_summary(&self, value: &dyn HostValue) -> String {
        let version = value.field_named("json_rpc");
        let method = value.field_named("method");
        let version_size = version.map(|f| field_unsigned(f, "size")).unwrap_or(0);
        let method_size = method.map(|f| field_unsigned(f, "size")).unwrap_or(0);

        render_rpc_header_with(version_size, method_size, |field| {
            let target = match field {
                RpcField::ProtocolVersion => version,
                RpcField::Method => method,
            };
            target
                .map(|f| self.field_summary(f))
                .unwrap_or_default()
        })
    }

    /// フィールドのサマリー（未登録の型は管理文字列として扱う）
    fn field_summary(&self, field: &dyn HostValue) -> String {
        self.summarize(field)
            .unwrap_or_else(|| self.managed_string_summary(field))
    }
}

/// 子要素 0..3 からベクタ値を組み立てる
fn read_vector(value: &dyn HostValue) -> VectorValue {
    let word = |i| value.indexed_child(i).map(|c| c.raw_unsigned()).unwrap_or(0);
    VectorValue::new(word(0), word(1), word(2), word(3))
}
