//! メモリスナップショットへのアクセス

use crate::Result;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, trace};

/// メモリアクセスのエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MemoryError {
    /// どの領域にも含まれないアドレス
    #[error("Address range 0x{addr:x}..+{size} is not mapped in the snapshot")]
    OutOfBounds { addr: u64, size: usize },
    /// 既存の領域と重なる
    #[error("Region 0x{base:x}..+{size} overlaps an existing region")]
    Overlap { base: u64, size: usize },
}

/// 読み取ったバイト列を固定長配列にする
pub(crate) fn le_array<const N: usize>(bytes: &[u8]) -> Result<[u8; N]> {
    bytes
        .try_into()
        .map_err(|_| anyhow::anyhow!("Expected {} bytes, got {}", N, bytes.len()))
}

/// メモリ読み取りトレイト
///
/// 値のレイアウト読み取りが使うメモリインターフェースを抽象化します。
pub trait MemoryReader {
    /// 指定アドレスから `size` バイト読み取る
    fn read(&self, addr: u64, size: usize) -> Result<Vec<u8>>;

    /// u32値を読み取る（リトルエンディアン）
    fn read_u32(&self, addr: u64) -> Result<u32> {
        let bytes = self.read(addr, 4)?;
        Ok(u32::from_le_bytes(le_array(&bytes)?))
    }

    /// u64値を読み取る（リトルエンディアン）
    fn read_u64(&self, addr: u64) -> Result<u64> {
        let bytes = self.read(addr, 8)?;
        Ok(u64::from_le_bytes(le_array(&bytes)?))
    }
}

/// スナップショット内の連続領域
#[derive(Debug, Clone)]
pub struct MemoryRegion {
    pub base: u64,
    pub bytes: Vec<u8>,
}

impl MemoryRegion {
    /// 領域の終端アドレス（含まない）
    pub fn end(&self) -> u64 {
        self.base + self.bytes.len() as u64
    }

    fn contains(&self, addr: u64, size: usize) -> bool {
        addr >= self.base
            && addr
                .checked_add(size as u64)
                .map_or(false, |end| end <= self.end())
    }
}

/// メモリスナップショット
///
/// ホストから取得した（あるいはファイルに保存された）メモリの写しです。
/// 複数の領域をそれぞれのベースアドレスにマップできます。
#[derive(Debug, Clone, Default)]
pub struct SnapshotMemory {
    regions: Vec<MemoryRegion>,
}

impl SnapshotMemory {
    /// 空のスナップショットを作成する
    pub fn new() -> Self {
        Self::default()
    }

    /// バイト列を指定アドレスにマップする
    pub fn map(&mut self, base: u64, bytes: Vec<u8>) -> Result<()> {
        let size = bytes.len();
        let end = base
            .checked_add(size as u64)
            .ok_or(MemoryError::OutOfBounds { addr: base, size })?;
        if self.regions.iter().any(|r| base < r.end() && r.base < end) {
            return Err(MemoryError::Overlap { base, size }.into());
        }

        debug!("Mapped region 0x{:x}..0x{:x} ({} bytes)", base, end, size);
        self.regions.push(MemoryRegion { base, bytes });
        self.regions.sort_by_key(|r| r.base);
        Ok(())
    }

    /// ファイルの内容を指定アドレスにマップする
    pub fn load<P: AsRef<Path>>(&mut self, path: P, base: u64) -> Result<()> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        self.map(base, bytes)
    }

    /// マップ済みの領域
    pub fn regions(&self) -> &[MemoryRegion] {
        &self.regions
    }

    /// 指定されたアドレスがマップ済みか
    pub fn is_mapped(&self, addr: u64) -> bool {
        self.regions.iter().any(|r| r.contains(addr, 1))
    }
}

impl MemoryReader for SnapshotMemory {
    fn read(&self, addr: u64, size: usize) -> Result<Vec<u8>> {
        trace!("read 0x{:x} ({} bytes)", addr, size);
        let region = self
            .regions
            .iter()
            .find(|r| r.contains(addr, size))
            .ok_or(MemoryError::OutOfBounds { addr, size })?;

        let start = (addr - region.base) as usize;
        Ok(region.bytes[start..start + size].to_vec())
    }
}
