use std::io;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};

use crate::models::job::JobSummary;

pub fn setup_logging(log_level: &str) -> io::Result<()> {
    let log_level_filter = match log_level {
        "debug" => log::LevelFilter::Debug,
        "info" => log::LevelFilter::Info,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        _ => log::LevelFilter::Info,
    };
    env_logger::Builder::new()
        .filter_level(log_level_filter)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("日誌初始化失敗: {}", e)))
}

/// 以百分比顯示的轉換進度條
pub struct ProgressManager {
    pb: ProgressBar,
    no_progress: bool,
    start: Instant,
}

impl ProgressManager {
    pub fn new(no_progress: bool) -> Self {
        let pb = if no_progress {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new(100);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{msg} [{bar:40}] {pos}% ETA: {eta_precise}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("##-"),
            );
            pb
        };
        ProgressManager {
            pb,
            no_progress,
            start: Instant::now(),
        }
    }

    /// 輸出一行執行紀錄，進度條顯示時先暫時隱藏
    pub fn log(&self, line: &str) {
        if self.no_progress {
            log::info!("{}", line);
        } else {
            self.pb.suspend(|| log::info!("{}", line));
        }
    }

    pub fn update(&self, completed: usize, total: usize, percent: f64) {
        if self.no_progress {
            return;
        }
        let elapsed = self.start.elapsed().as_secs_f64();
        let speed = if elapsed > 0.0 { completed as f64 / elapsed } else { 0.0 };
        self.pb.set_message(format!(
            "轉換中：{}/{} 檔案，速度：{:.1} 檔案/秒",
            completed, total, speed
        ));
        self.pb.set_position(percent.round().clamp(0.0, 100.0) as u64);
    }

    pub fn finish(&self, summary: &JobSummary) {
        if self.no_progress {
            return;
        }
        let msg = if summary.cancelled {
            format!(
                "已取消，成功 {}/{}，耗時 {:.1} 秒",
                summary.succeeded, summary.total, summary.elapsed_secs()
            )
        } else {
            format!(
                "完成，成功 {}/{}，耗時 {:.1} 秒",
                summary.succeeded, summary.total, summary.elapsed_secs()
            )
        };
        self.pb.finish_with_message(msg);
    }

    pub fn abandon(&self) {
        self.pb.finish_and_clear();
    }
}
