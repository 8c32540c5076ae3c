use crate::config::MediaCategory;
use log::info;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveStatus {
    Success,
    Failure,
}

/// 每個掃描到的檔案恰好產生一筆結果
#[derive(Debug, Clone)]
pub struct MoveOutcome {
    pub source: PathBuf,
    pub category: Option<MediaCategory>,
    /// 成功時為實際目標路徑；失敗時為預計的目標路徑（若已決定）
    pub target: Option<PathBuf>,
    pub status: MoveStatus,
    pub error: Option<String>,
    pub warning: Option<String>,
}

/// 執行過程中的計數
#[derive(Debug, Default)]
pub struct RunState {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// 中斷後未開始處理的檔案數
    pub cancelled: usize,
    pub outcomes: Vec<MoveOutcome>,
}

impl RunState {
    #[must_use]
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn record(&mut self, outcome: MoveOutcome) {
        match outcome.status {
            MoveStatus::Success => self.succeeded += 1,
            MoveStatus::Failure => self.failed += 1,
        }
        self.outcomes.push(outcome);
    }

    /// 已產生結果的檔案數
    #[must_use]
    pub fn processed(&self) -> usize {
        self.succeeded + self.failed
    }

    #[must_use]
    pub const fn was_interrupted(&self) -> bool {
        self.cancelled > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub cancelled: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "總計 {} 個檔案 - 成功: {}, 失敗: {}",
            self.total, self.succeeded, self.failed
        )?;
        if self.cancelled > 0 {
            write!(f, ", 中斷未處理: {}", self.cancelled)?;
        }
        Ok(())
    }
}

/// 彙總執行結果並寫入一行日誌
#[must_use]
pub fn finalize(state: &RunState) -> RunSummary {
    let summary = RunSummary {
        total: state.total,
        succeeded: state.succeeded,
        failed: state.failed,
        cancelled: state.cancelled,
    };
    info!("匯入完成 - {summary}");
    summary
}
