use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::lottery::{DrawRecord, PrizeTier};

/// 持久化的完整抽奖会话快照（单条记录，整体覆盖写入）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredData {
    pub min_number: i64,
    pub max_number: i64,
    pub drawn_numbers: Vec<i64>,
    pub remaining_numbers: Vec<i64>,
    pub blacklist: Vec<i64>,
    pub whitelist: Vec<i64>,
    pub draw_history: Vec<DrawRecord>,
    pub prize_state: Vec<PrizeTier>,
    #[serde(default)]
    pub current_prize: Option<String>,
    #[serde(default = "default_draw_count")]
    pub draw_count: usize,
    pub timestamp: DateTime<Utc>,
}

fn default_draw_count() -> usize {
    1
}

/// 快照存储
///
/// 单文件 JSON 键值存储：保存时整体覆盖，读取失败（文件缺失或内容
/// 损坏）一律视为"无存档"，系统按全新会话继续，绝不因此失败。
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SnapshotStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 读取快照；缺失或解析失败都返回 None
    pub fn load(&self) -> Option<StoredData> {
        if !self.path.exists() {
            return None;
        }
        match self.read_snapshot() {
            Ok(data) => Some(data),
            Err(e) => {
                // 损坏的存档按"无存档"处理，下次保存会覆盖掉
                log::warn!("Failed to load snapshot from {:?}: {e:#}", self.path);
                None
            }
        }
    }

    fn read_snapshot(&self) -> anyhow::Result<StoredData> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("read {:?}", self.path))?;
        let data = serde_json::from_str(&content)
            .with_context(|| format!("parse {:?}", self.path))?;
        Ok(data)
    }

    /// 保存快照（写临时文件后原子改名）
    pub fn save(&self, data: &StoredData) -> AppResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(data)?;
        let tmp_path = self.path.with_extension(format!("tmp-{}", Uuid::new_v4()));

        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            AppError::StorageError(format!("rename {:?} -> {:?}: {e}", tmp_path, self.path))
        })?;

        Ok(())
    }

    /// 删除快照；文件不存在不算错误
    pub fn clear(&self) -> AppResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> SnapshotStore {
        let path = std::env::temp_dir().join(format!("lottery-snapshot-{}.json", Uuid::new_v4()));
        SnapshotStore::new(path)
    }

    fn sample_data() -> StoredData {
        StoredData {
            min_number: 1,
            max_number: 10,
            drawn_numbers: vec![3, 7],
            remaining_numbers: vec![1, 2, 4, 5, 6, 8, 9, 10],
            blacklist: vec![],
            whitelist: vec![],
            draw_history: vec![],
            prize_state: vec![PrizeTier::new("first", "一等奖", 3)],
            current_prize: Some("first".to_string()),
            draw_count: 2,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_save_load_round_trip() {
        let store = temp_store();
        let data = sample_data();
        store.save(&data).unwrap();

        let loaded = store.load().expect("snapshot should exist");
        assert_eq!(loaded.drawn_numbers, data.drawn_numbers);
        assert_eq!(loaded.remaining_numbers, data.remaining_numbers);
        assert_eq!(loaded.current_prize, data.current_prize);
        assert_eq!(loaded.draw_count, 2);

        store.clear().unwrap();
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let store = temp_store();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_load_corrupt_file_is_none() {
        let store = temp_store();
        fs::write(store.path(), "{ not json").unwrap();
        assert!(store.load().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn test_clear_is_idempotent() {
        let store = temp_store();
        store.save(&sample_data()).unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_save_overwrites_previous_snapshot() {
        let store = temp_store();
        let mut data = sample_data();
        store.save(&data).unwrap();

        data.drawn_numbers.push(9);
        store.save(&data).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.drawn_numbers, vec![3, 7, 9]);
        store.clear().unwrap();
    }
}
