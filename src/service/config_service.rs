use std::io;
use std::path::{Path, PathBuf};

use crate::config::config::validate_input_path;
use crate::config::ports::{AppConfig, ConfigPort};
use crate::models::params::ConversionParameters;
use crate::models::preset::DEFAULT_PRESET;
use crate::service::settings::PersistedSettings;

// 配置服務，取得配置後補齊輸出目錄並檢查參數
pub struct ConfigService {
    config_port: Box<dyn ConfigPort>,
}

impl ConfigService {
    pub fn new(config_port: Box<dyn ConfigPort>) -> Self {
        ConfigService { config_port }
    }

    pub fn get_config(&self) -> io::Result<AppConfig> {
        let mut config = self.config_port.get_config()?;
        if config.input.trim().is_empty() {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "請選擇輸入資料夾"));
        }
        validate_input_path(&config.input)?;
        if config.output.trim().is_empty() {
            config.output = default_output_dir(&config.input);
            log::info!("未指定輸出目錄，使用：{}", config.output);
        }
        config.params.validate()?;
        Ok(config)
    }
}

/// 未指定輸出目錄時，預設為輸入目錄下的 output
pub fn default_output_dir(input: &str) -> String {
    Path::new(input).join("output").to_string_lossy().to_string()
}

// 預設配置適配器：沿用上次保存的路徑與開關，參數使用預設值
pub struct DefaultConfigAdapter {
    settings: PersistedSettings,
    converter: PathBuf,
    settings_path: PathBuf,
}

impl DefaultConfigAdapter {
    pub fn new(settings: PersistedSettings, converter: PathBuf, settings_path: PathBuf) -> Self {
        DefaultConfigAdapter { settings, converter, settings_path }
    }
}

impl ConfigPort for DefaultConfigAdapter {
    fn get_config(&self) -> io::Result<AppConfig> {
        Ok(AppConfig {
            input: self.settings.input.clone(),
            output: self.settings.output.clone(),
            subdirs: self.settings.subdirs,
            delete: self.settings.delete,
            preset: DEFAULT_PRESET.to_string(),
            params: ConversionParameters::default(),
            converter: self.converter.clone(),
            settings_path: self.settings_path.clone(),
            no_progress: false,
        })
    }
}
