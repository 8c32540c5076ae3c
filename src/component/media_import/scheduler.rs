//! 搬移排程
//!
//! 並行數量為 1 時依掃描順序逐一搬移；大於 1 時使用固定大小的 rayon 執行緒池，
//! 以 FIFO 順序派送，同一時間最多只有 `jobs` 個搬移在進行。

use super::destination::plan_directory;
use super::media_file::MediaFile;
use super::mover::{Mover, Transfer};
use super::summary::{MoveOutcome, MoveStatus, RunState};
use crate::config::{FileTypeTable, ImportOptions, MediaCategory};
use crate::error::MoveError;
use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

pub struct Scheduler {
    file_type_table: FileTypeTable,
    options: ImportOptions,
    mover: Mover,
    shutdown_signal: Arc<AtomicBool>,
    in_flight: AtomicUsize,
    /// 執行期間同時進行的搬移數最大值
    peak_in_flight: AtomicUsize,
}

impl Scheduler {
    #[must_use]
    pub fn new(
        file_type_table: FileTypeTable,
        options: ImportOptions,
        shutdown_signal: Arc<AtomicBool>,
    ) -> Self {
        let mover = Mover::new(options.preserve_timestamps, options.dry_run);
        Self {
            file_type_table,
            options,
            mover,
            shutdown_signal,
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    #[must_use]
    pub const fn mover(&self) -> &Mover {
        &self.mover
    }

    /// 處理所有檔案，回傳最終計數；中斷時回傳已完成部分的計數
    pub fn run(&self, files: &[PathBuf]) -> Result<RunState> {
        info!(
            "開始匯入，共 {} 個檔案（並行數: {}，方式: {}{}）",
            files.len(),
            self.options.jobs,
            self.mover.method_name(),
            if self.options.dry_run { "，試執行" } else { "" }
        );

        let state = if self.options.jobs <= 1 {
            self.run_sequential(files)
        } else {
            self.run_concurrent(files)?
        };

        debug!("最高同時搬移數: {}", self.peak_in_flight());
        if state.was_interrupted() {
            warn!(
                "收到中斷信號，已處理 {} 個檔案，{} 個未處理",
                state.processed(),
                state.cancelled
            );
        }

        Ok(state)
    }

    fn run_sequential(&self, files: &[PathBuf]) -> RunState {
        let mut state = RunState::new(files.len());

        for (index, path) in files.iter().enumerate() {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                state.cancelled = files.len() - index;
                break;
            }

            let outcome = self.track_in_flight(path);
            if self.options.show_progress && !self.options.dry_run {
                print_progress_line(index + 1, files.len(), &outcome);
            }
            state.record(outcome);
        }

        state
    }

    fn run_concurrent(&self, files: &[PathBuf]) -> Result<RunState> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.jobs)
            .thread_name(|index| format!("mover-{index}"))
            .build()
            .context("無法建立搬移執行緒池")?;

        let progress_bar = self.progress_bar(files.len());
        let outcomes = Mutex::new(Vec::with_capacity(files.len()));
        let cancelled = AtomicUsize::new(0);

        {
            let progress_bar = &progress_bar;
            let outcomes = &outcomes;
            let cancelled = &cancelled;

            pool.scope_fifo(|scope| {
                for path in files {
                    scope.spawn_fifo(move |_| {
                        if self.shutdown_signal.load(Ordering::SeqCst) {
                            cancelled.fetch_add(1, Ordering::SeqCst);
                            return;
                        }

                        let outcome = self.track_in_flight(path);
                        progress_bar.inc(1);
                        outcomes
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .push(outcome);
                    });
                }
            });
        }

        let cancelled = cancelled.into_inner();
        if cancelled > 0 {
            progress_bar.abandon_with_message("操作已中斷");
        } else {
            progress_bar.finish_with_message("完成");
        }

        let mut state = RunState::new(files.len());
        for outcome in outcomes.into_inner().unwrap_or_else(PoisonError::into_inner) {
            state.record(outcome);
        }
        state.cancelled = cancelled;

        Ok(state)
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.options.show_progress || self.options.dry_run {
            return ProgressBar::hidden();
        }

        let progress_bar = ProgressBar::new(len as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        progress_bar.set_message("搬移中...");
        progress_bar
    }

    fn track_in_flight(&self, path: &Path) -> MoveOutcome {
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(running, Ordering::SeqCst);

        let outcome = self.process_file(path);

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        outcome
    }

    /// 單一檔案：讀取資訊 → 分類 → 規劃目標資料夾 → 搬移
    fn process_file(&self, path: &Path) -> MoveOutcome {
        let file = match MediaFile::read(path) {
            Ok(file) => file,
            Err(e) => {
                error!("{e}");
                return MoveOutcome {
                    source: path.to_path_buf(),
                    category: None,
                    target: None,
                    status: MoveStatus::Failure,
                    error: Some(e.to_string()),
                    warning: None,
                };
            }
        };

        let category = self.file_type_table.classify(&file.extension);
        let destination_dir = self
            .options
            .output_root
            .join(plan_directory(self.options.base_folder(category), file.date));

        let result = self.mover.move_one(&file, &destination_dir);
        transfer_outcome(file, category, &destination_dir, result)
    }
}

/// 將搬移結果轉為統計用的結果；需要人工處理的失敗以警告等級記錄
fn transfer_outcome(
    file: MediaFile,
    category: MediaCategory,
    destination_dir: &Path,
    result: Result<Transfer, MoveError>,
) -> MoveOutcome {
    match result {
        Ok(transfer) => {
            info!(
                "{} -> {}",
                file.path.display(),
                transfer.target.display()
            );
            MoveOutcome {
                source: file.path,
                category: Some(category),
                target: Some(transfer.target),
                status: MoveStatus::Success,
                error: None,
                warning: transfer.warning,
            }
        }
        Err(e) => {
            if e.needs_attention() {
                warn!("需要手動處理: {e}");
            } else {
                error!("{e}");
            }
            MoveOutcome {
                target: Some(destination_dir.join(&file.file_name)),
                source: file.path,
                category: Some(category),
                status: MoveStatus::Failure,
                error: Some(e.to_string()),
                warning: None,
            }
        }
    }
}

fn print_progress_line(index: usize, total: usize, outcome: &MoveOutcome) {
    let counter = style(format!("[{index}/{total}]")).dim();
    match (&outcome.target, &outcome.error) {
        (Some(target), None) => println!(
            "{counter} {} {} {}",
            outcome.source.display(),
            style("→").green(),
            target.display()
        ),
        (_, Some(error)) => println!("{counter} {} {error}", style("✗").red()),
        (None, None) => println!("{counter} {}", outcome.source.display()),
    }
}
