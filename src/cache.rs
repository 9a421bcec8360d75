//! フェイススキャン結果キャッシュ
//!
//! スナップショットのSHA-256をキーにして解析結果を保存し、
//! 同じ画像の再解析（API呼び出し）をスキップする。
//! 代替結果（AI失敗時）はキャッシュしない。

use crate::error::Result;
use crate::snapshot::Snapshot;
use chrono::{DateTime, Utc};
use eyewear_advisor_common::FaceScanReport;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

const CACHE_FILE_NAME: &str = ".face-scan-cache.json";

/// キャッシュファイルの構造
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheFile {
    /// バージョン（互換性チェック用）
    version: u32,
    /// ハッシュ → 解析結果のマップ
    entries: HashMap<String, CacheEntry>,
}

/// キャッシュエントリ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub source: String,
    pub cached_at: DateTime<Utc>,
    pub report: FaceScanReport,
}

impl CacheFile {
    const CURRENT_VERSION: u32 = 1;

    pub fn cache_path(dir: &Path) -> PathBuf {
        dir.join(CACHE_FILE_NAME)
    }

    /// キャッシュファイルを読み込み（壊れている・旧バージョンなら空）
    pub fn load(dir: &Path) -> Self {
        let cache_path = Self::cache_path(dir);
        if !cache_path.exists() {
            return Self::default();
        }

        let file = match File::open(&cache_path) {
            Ok(f) => f,
            Err(_) => return Self::default(),
        };

        match serde_json::from_reader::<_, CacheFile>(BufReader::new(file)) {
            Ok(cache) if cache.version == Self::CURRENT_VERSION => cache,
            Ok(cache) => {
                tracing::warn!(found = cache.version, "キャッシュバージョン不一致、再生成します");
                Self::default()
            }
            Err(e) => {
                tracing::warn!(error = %e, "キャッシュファイルが壊れています、再生成します");
                Self::default()
            }
        }
    }

    pub fn save(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;
        let file = File::create(Self::cache_path(dir))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// キャッシュファイルを削除（存在した場合 true）
    pub fn clear(dir: &Path) -> Result<bool> {
        let cache_path = Self::cache_path(dir);
        if cache_path.exists() {
            std::fs::remove_file(cache_path)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn get(&self, hash: &str) -> Option<&FaceScanReport> {
        self.entries.get(hash).map(|e| &e.report)
    }

    pub fn insert(&mut self, hash: String, source: String, report: FaceScanReport) {
        self.entries.insert(
            hash,
            CacheEntry {
                source,
                cached_at: Utc::now(),
                report,
            },
        );
    }

    /// 登録して保存（保存失敗は警告のみで、登録した内容は残す）
    pub fn insert_and_save(&mut self, dir: &Path, hash: String, source: String, report: FaceScanReport) -> bool {
        self.insert(hash, source, report);
        match self.save(dir) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "failed to save face scan cache");
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CacheFile {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            entries: HashMap::new(),
        }
    }
}

/// スナップショットのハッシュ（SHA-256, hex）
pub fn snapshot_hash(snapshot: &Snapshot) -> String {
    let mut hasher = Sha256::new();
    hasher.update(snapshot.mime_type.as_bytes());
    hasher.update(b":");
    hasher.update(snapshot.data.as_bytes());
    hex::encode(hasher.finalize())
}
