use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

pub const SETTINGS_FILE: &str = "config.json";

/// 跨次執行保存的路徑與開關，參數與預設不保存
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedSettings {
    pub input: String,
    pub output: String,
    pub subdirs: bool,
    pub delete: bool,
}

/// 以 JSON 檔保存設定，讀寫失敗一律忽略
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SettingsStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 檔案不存在或內容損毀時返回預設值
    pub fn load(&self) -> PersistedSettings {
        let content = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) => {
                debug!("未讀取設定檔 {}：{}", self.path.display(), e);
                return PersistedSettings::default();
            }
        };
        match serde_json::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("設定檔 {} 格式錯誤，使用預設值：{}", self.path.display(), e);
                PersistedSettings::default()
            }
        }
    }

    pub fn save(&self, settings: &PersistedSettings) {
        let content = match serde_json::to_string(settings) {
            Ok(text) => text,
            Err(e) => {
                warn!("無法序列化設定：{}", e);
                return;
            }
        };
        if let Err(e) = fs::write(&self.path, content) {
            warn!("無法寫入設定檔 {}：{}", self.path.display(), e);
        }
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        SettingsStore::new(SETTINGS_FILE)
    }
}
