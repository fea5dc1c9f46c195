use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::Local;
use log::{error, info, warn};
use thiserror::Error;

use crate::models::job::{BatchJob, FileOutcome, FileStatus, JobResult, JobSummary};
use crate::service::converter::build_args;
use crate::service::file::{ensure_dir, output_path_for, relative_path, FileService};
use crate::service::settings::{PersistedSettings, SettingsStore};
use crate::service::traits::i_service::{ConverterTrait, FileServiceTrait};

/// 背景執行緒送回控制端的事件
#[derive(Debug, Clone)]
pub enum DispatchEvent {
    Log(String),
    Started { total: usize },
    NoFiles,
    FileDone { index: usize, total: usize, outcome: FileOutcome },
    Progress { completed: usize, total: usize, percent: f64 },
    Finished(JobSummary),
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("輸入目錄 '{0}' 不存在")]
    InputMissing(PathBuf),
    #[error("找不到轉換程式 {0}")]
    ConverterMissing(PathBuf),
    #[error("無法啟動背景執行緒：{0}")]
    Spawn(#[from] io::Error),
}

impl From<DispatchError> for io::Error {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::Spawn(e) => e,
            other => io::Error::new(io::ErrorKind::NotFound, other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatcherState {
    Idle,
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    AlreadyRunning,
}

/// 批次轉換調度器
///
/// 由控制端持有，狀態只在控制端變更；實際工作在背景執行緒進行，
/// 透過 channel 回報事件。同一時間只允許一個批次。
pub struct BatchDispatcher {
    converter: Arc<dyn ConverterTrait>,
    files: Arc<dyn FileServiceTrait>,
    settings: SettingsStore,
    state: DispatcherState,
    events: Option<Receiver<DispatchEvent>>,
    worker: Option<thread::JoinHandle<()>>,
    cancel: Arc<AtomicBool>,
}

impl BatchDispatcher {
    pub fn new(converter: Arc<dyn ConverterTrait>, settings: SettingsStore) -> Self {
        BatchDispatcher::with_file_service(converter, Arc::new(FileService::new()), settings)
    }

    pub fn with_file_service(
        converter: Arc<dyn ConverterTrait>,
        files: Arc<dyn FileServiceTrait>,
        settings: SettingsStore,
    ) -> Self {
        BatchDispatcher {
            converter,
            files,
            settings,
            state: DispatcherState::Idle,
            events: None,
            worker: None,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn state(&self) -> DispatcherState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == DispatcherState::Running
    }

    /// 開始批次轉換
    /// # 參數
    /// - job: 本次批次的目錄、開關與參數快照
    /// # 回傳
    /// - 已有批次執行中時返回 `AlreadyRunning` 且不做任何事
    /// - 輸入目錄或轉換程式不存在時返回錯誤，批次不會開始
    pub fn start(&mut self, job: BatchJob) -> Result<StartOutcome, DispatchError> {
        if self.is_running() {
            warn!("已有批次執行中，忽略新的開始要求");
            return Ok(StartOutcome::AlreadyRunning);
        }
        if !job.input_dir.is_dir() {
            error!("輸入目錄不存在：{}", job.input_dir.display());
            return Err(DispatchError::InputMissing(job.input_dir));
        }
        if !self.converter.is_available() {
            error!("找不到轉換程式：{}", self.converter.program().display());
            return Err(DispatchError::ConverterMissing(
                self.converter.program().to_path_buf(),
            ));
        }

        self.settings.save(&PersistedSettings {
            input: job.input_dir.to_string_lossy().to_string(),
            output: job.output_dir.to_string_lossy().to_string(),
            subdirs: job.recurse,
            delete: job.delete_original,
        });

        let (tx, rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));
        let worker = Worker {
            job,
            converter: Arc::clone(&self.converter),
            files: Arc::clone(&self.files),
            tx,
            cancel: Arc::clone(&cancel),
        };
        let handle = thread::Builder::new()
            .name("batch-dispatcher".to_string())
            .spawn(move || worker.run())?;

        self.cancel = cancel;
        self.events = Some(rx);
        self.worker = Some(handle);
        self.state = DispatcherState::Running;
        info!("批次轉換已開始");
        Ok(StartOutcome::Started)
    }

    /// 要求停止：目前檔案完成後不再處理剩餘檔案
    ///
    /// 供嵌入使用；命令列與交互模式不會呼叫
    pub fn cancel(&self) {
        if self.is_running() {
            info!("已要求取消批次轉換");
            self.cancel.store(true, Ordering::SeqCst);
        }
    }

    /// 取出一個事件，不阻塞
    pub fn try_next_event(&mut self) -> Option<DispatchEvent> {
        let polled = self.events.as_ref()?.try_recv();
        let received = match polled {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => self.worker_vanished(),
        };
        received.map(|event| self.observe(event))
    }

    /// 最多等待 `timeout` 取出一個事件
    pub fn next_event_timeout(&mut self, timeout: Duration) -> Option<DispatchEvent> {
        let polled = self.events.as_ref()?.recv_timeout(timeout);
        let received = match polled {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => self.worker_vanished(),
        };
        received.map(|event| self.observe(event))
    }

    fn observe(&mut self, event: DispatchEvent) -> DispatchEvent {
        if let DispatchEvent::Finished(_) = event {
            self.state = DispatcherState::Idle;
            self.events = None;
            // Finished 是背景執行緒的最後一步，不需要等待 join
            self.worker = None;
        }
        event
    }

    // 背景執行緒未送出 Finished 就結束（例如 panic），視同完成
    fn worker_vanished(&mut self) -> Option<DispatchEvent> {
        if !self.is_running() {
            self.events = None;
            return None;
        }
        // channel 已斷開，執行緒已結束，join 不會等待
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                error!("背景執行緒 panic");
            }
        }
        error!("背景執行緒意外結束");
        Some(DispatchEvent::Finished(JobSummary::empty()))
    }
}

struct Worker {
    job: BatchJob,
    converter: Arc<dyn ConverterTrait>,
    files: Arc<dyn FileServiceTrait>,
    tx: Sender<DispatchEvent>,
    cancel: Arc<AtomicBool>,
}

impl Worker {
    // 控制端已離開時送出失敗，直接忽略
    fn emit(&self, event: DispatchEvent) {
        let _ = self.tx.send(event);
    }

    fn log(&self, line: String) {
        self.emit(DispatchEvent::Log(line));
    }

    fn run(self) {
        let started_at = Local::now();
        let files = match self.files.collect_images(&self.job.input_dir, self.job.recurse) {
            Ok(files) => files,
            Err(e) => {
                self.log(format!("錯誤: 無法列出 {}：{}", self.job.input_dir.display(), e));
                Vec::new()
            }
        };

        let total = files.len();
        if total == 0 {
            self.log("未找到圖片".to_string());
            self.emit(DispatchEvent::NoFiles);
            self.emit(DispatchEvent::Finished(
                JobResult::new().into_summary(0, false, started_at),
            ));
            return;
        }

        self.log(format!("開始處理 {} 個檔案...", total));
        self.emit(DispatchEvent::Started { total });
        ensure_dir(&self.job.output_dir);

        let mut result = JobResult::new();
        let mut cancelled = false;
        for (i, source) in files.iter().enumerate() {
            if self.cancel.load(Ordering::SeqCst) {
                cancelled = true;
                self.log(format!("已取消，剩餘 {} 個檔案未處理", total - i));
                break;
            }

            let index = i + 1;
            let outcome = self.convert_one(source);
            let mark = if outcome.is_success() { "✅" } else { "❌" };
            self.log(format!("[{}/{}] {} {}", index, total, mark, outcome.relative.display()));
            self.emit(DispatchEvent::FileDone {
                index,
                total,
                outcome: outcome.clone(),
            });
            result.record(outcome);
            self.emit(DispatchEvent::Progress {
                completed: index,
                total,
                percent: index as f64 / total as f64 * 100.0,
            });
        }

        let summary = result.into_summary(total, cancelled, started_at);
        self.log(format!("完成! 成功: {}/{}", summary.succeeded, summary.total));
        self.emit(DispatchEvent::Finished(summary));
    }

    fn convert_one(&self, source: &Path) -> FileOutcome {
        let relative = relative_path(source, &self.job.input_dir);
        let output = output_path_for(
            source,
            &self.job.input_dir,
            &self.job.output_dir,
            self.job.recurse,
        );
        if let Some(parent) = output.parent() {
            ensure_dir(parent);
        }

        let args = build_args(source, &output, &self.job.params);
        let status = match self.converter.convert(&args) {
            Ok(out) if out.success() => {
                if self.job.delete_original {
                    remove_original(source);
                }
                FileStatus::Succeeded
            }
            Ok(out) => {
                let reason = match out.code {
                    Some(code) => format!("結束碼 {}", code),
                    None => "被訊號終止".to_string(),
                };
                warn!("轉換失敗 {}：{} {}", relative.display(), reason, out.stderr.trim());
                FileStatus::Failed(reason)
            }
            Err(e) => {
                self.log(format!("錯誤: {}", e));
                FileStatus::Failed(e.to_string())
            }
        };

        FileOutcome {
            source: source.to_path_buf(),
            relative,
            output,
            status,
        }
    }
}

// 刪除原檔失敗不影響批次
fn remove_original(source: &Path) {
    if let Err(e) = fs::remove_file(source) {
        warn!("無法刪除原檔 {}：{}", source.display(), e);
    }
}
