use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};

use crate::config::ports::ConfigPort;
use crate::facade::traits::i_conversion::ConversionFacadeTrait;
use crate::models::conversion::ConversionOutput;
use crate::models::job::FileStatus;
use crate::service::config_service::ConfigService;
use crate::service::converter::ProcessConverter;
use crate::service::dispatcher::{BatchDispatcher, DispatchEvent, StartOutcome};
use crate::service::settings::SettingsStore;
use crate::service::traits::i_service::ConverterTrait;
use crate::utils::utils::ProgressManager;

const EVENT_TICK: Duration = Duration::from_millis(100);

pub struct ConversionFacade {
    config_service: ConfigService,
    converter: Option<Arc<dyn ConverterTrait>>,
}

impl ConversionFacade {
    pub fn new(config_port: Box<dyn ConfigPort>) -> Self {
        ConversionFacade {
            config_service: ConfigService::new(config_port),
            converter: None,
        }
    }

    /// 使用指定的轉換程式實作，而非依配置啟動 vtracer
    pub fn with_converter(config_port: Box<dyn ConfigPort>, converter: Arc<dyn ConverterTrait>) -> Self {
        ConversionFacade {
            config_service: ConfigService::new(config_port),
            converter: Some(converter),
        }
    }

    fn converter_for(&self, program: PathBuf) -> Arc<dyn ConverterTrait> {
        match &self.converter {
            Some(converter) => Arc::clone(converter),
            None => Arc::new(ProcessConverter::new(program)),
        }
    }
}

impl ConversionFacadeTrait for ConversionFacade {
    fn execute_conversion(&self) -> io::Result<ConversionOutput> {
        let config = self.config_service.get_config()?;
        let converter = self.converter_for(config.converter.clone());
        let mut dispatcher = BatchDispatcher::new(converter, SettingsStore::new(&config.settings_path));

        info!(
            "開始轉換，輸入目錄：{}，輸出目錄：{}，預設：{}，子資料夾：{}，刪除原檔：{}",
            config.input, config.output, config.preset, config.subdirs, config.delete
        );
        debug!("轉換參數：{:?}", config.params);

        if dispatcher.start(config.to_batch_job())? == StartOutcome::AlreadyRunning {
            return Err(io::Error::new(io::ErrorKind::Other, "已有批次執行中"));
        }

        let pm = ProgressManager::new(config.no_progress);
        let summary = loop {
            match dispatcher.next_event_timeout(EVENT_TICK) {
                Some(DispatchEvent::Log(line)) => pm.log(&line),
                Some(DispatchEvent::Started { total }) => debug!("共 {} 個檔案待轉換", total),
                Some(DispatchEvent::NoFiles) => {
                    pm.abandon();
                    warn!("輸入目錄中沒有可轉換的圖片：{}", config.input);
                }
                Some(DispatchEvent::FileDone { outcome, .. }) => {
                    if let FileStatus::Failed(reason) = &outcome.status {
                        debug!("{} 轉換失敗：{}", outcome.source.display(), reason);
                    }
                }
                Some(DispatchEvent::Progress { completed, total, percent }) => {
                    pm.update(completed, total, percent)
                }
                Some(DispatchEvent::Finished(summary)) => {
                    pm.finish(&summary);
                    break summary;
                }
                None => {}
            }
        };

        if !summary.failed.is_empty() {
            warn!("{} 個檔案轉換失敗：{:?}", summary.failed.len(), summary.failed);
        }

        Ok(ConversionOutput {
            output_path: config.output,
            processed_files: summary.attempted,
            summary,
        })
    }
}
