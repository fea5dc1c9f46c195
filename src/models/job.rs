use std::path::PathBuf;

use chrono::{DateTime, Local};

use crate::models::params::ConversionParameters;

/// 一次批次轉換的輸入
#[derive(Clone, Debug)]
pub struct BatchJob {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub recurse: bool,
    pub delete_original: bool,
    pub params: ConversionParameters,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileStatus {
    Succeeded,
    Failed(String),
}

#[derive(Clone, Debug)]
pub struct FileOutcome {
    pub source: PathBuf,
    pub relative: PathBuf,
    pub output: PathBuf,
    pub status: FileStatus,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        self.status == FileStatus::Succeeded
    }
}

/// 執行中的逐檔結果，只存在於背景執行緒
#[derive(Debug, Default)]
pub struct JobResult {
    outcomes: Vec<FileOutcome>,
    succeeded: usize,
}

impl JobResult {
    pub fn new() -> Self {
        JobResult::default()
    }

    pub fn record(&mut self, outcome: FileOutcome) {
        if outcome.is_success() {
            self.succeeded += 1;
        }
        self.outcomes.push(outcome);
    }

    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    /// 結束本次執行，只留下摘要
    pub fn into_summary(
        self,
        total: usize,
        cancelled: bool,
        started_at: DateTime<Local>,
    ) -> JobSummary {
        let failed = self
            .outcomes
            .iter()
            .filter(|o| !o.is_success())
            .map(|o| o.relative.clone())
            .collect();
        JobSummary {
            total,
            attempted: self.attempted(),
            succeeded: self.succeeded,
            failed,
            cancelled,
            started_at,
            finished_at: Local::now(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct JobSummary {
    pub total: usize,
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: Vec<PathBuf>,
    pub cancelled: bool,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
}

impl JobSummary {
    pub fn empty() -> Self {
        let now = Local::now();
        JobSummary {
            total: 0,
            attempted: 0,
            succeeded: 0,
            failed: Vec::new(),
            cancelled: false,
            started_at: now,
            finished_at: now,
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(name: &str, status: FileStatus) -> FileOutcome {
        FileOutcome {
            source: PathBuf::from("in").join(name),
            relative: PathBuf::from(name),
            output: PathBuf::from("out").join(name),
            status,
        }
    }

    #[test]
    fn counts_track_recorded_outcomes() {
        let mut result = JobResult::new();
        result.record(outcome("a.png", FileStatus::Succeeded));
        result.record(outcome("b.png", FileStatus::Failed("exit code 1".into())));
        result.record(outcome("c.png", FileStatus::Succeeded));
        assert_eq!(result.attempted(), 3);
        assert_eq!(result.succeeded(), 2);

        let summary = result.into_summary(3, false, Local::now());
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, vec![PathBuf::from("b.png")]);
        assert!(summary.elapsed_secs() >= 0.0);
    }
}
