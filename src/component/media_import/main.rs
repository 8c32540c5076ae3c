use super::media_file::MediaFile;
use super::scheduler::Scheduler;
use super::summary::{RunState, RunSummary, finalize};
use crate::config::{Config, ImportOptions, MediaCategory};
use crate::tools::{
    eject_volume, prune_empty_directories, scan_all_files, validate_directory_exists,
};
use anyhow::{Result, bail};
use console::{Term, style};
use dialoguer::Confirm;
use log::{info, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// 一次匯入的最終報告
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub summary: RunSummary,
    pub interrupted: bool,
    /// 刪除的空資料夾數量
    pub pruned: usize,
}

/// 媒體匯入元件
pub struct MediaImport {
    config: Config,
    options: ImportOptions,
    shutdown_signal: Arc<AtomicBool>,
}

impl MediaImport {
    pub const fn new(
        config: Config,
        options: ImportOptions,
        shutdown_signal: Arc<AtomicBool>,
    ) -> Self {
        Self {
            config,
            options,
            shutdown_signal,
        }
    }

    /// 執行匯入；使用者取消確認時回傳 `None`
    pub fn run(&self) -> Result<Option<ImportReport>> {
        let input_root = &self.options.input_root;
        validate_directory_exists(input_root)?;
        self.options.validate()?;

        if self.options.show_progress {
            println!("{}", style("=== 媒體檔案匯入 ===").cyan().bold());
            println!("{}", style("掃描檔案中...").dim());
        }

        let files = self.scan(input_root)?;
        if files.is_empty() {
            bail!("找不到任何待匯入的檔案: {}", input_root.display());
        }

        if self.options.show_progress {
            self.print_category_summary(&files);
        }

        if !self.options.dry_run && !self.confirm_import()? {
            println!("{}", style("操作已取消").yellow());
            return Ok(None);
        }

        let scheduler = Scheduler::new(
            self.config.file_type_table.clone(),
            self.options.clone(),
            Arc::clone(&self.shutdown_signal),
        );
        let state = scheduler.run(&files)?;
        let summary = finalize(&state);

        if self.options.dry_run {
            print_dry_run_plan(&state, scheduler.mover().method_name());
        }
        print_result(&state, &summary);

        let pruned = if !self.options.dry_run && self.options.prune {
            let pruned = prune_empty_directories(input_root);
            info!("已刪除 {pruned} 個空資料夾");
            pruned
        } else {
            0
        };

        if !self.options.dry_run && self.options.eject && !state.was_interrupted() {
            if let Err(e) = eject_volume(input_root) {
                warn!("無法退出磁碟區 {}: {e:#}", input_root.display());
                println!("{} {e:#}", style("無法退出磁碟區:").yellow());
            }
        }

        Ok(Some(ImportReport {
            summary,
            interrupted: state.was_interrupted(),
            pruned,
        }))
    }

    /// 掃描來源資料夾，目標資料夾位於來源內時排除其中的檔案
    fn scan(&self, input_root: &Path) -> Result<Vec<PathBuf>> {
        info!("開始掃描目錄: {}", input_root.display());

        let output_root = &self.options.output_root;
        let output_inside_input = output_root != input_root && output_root.starts_with(input_root);

        let files: Vec<PathBuf> = scan_all_files(input_root)?
            .into_iter()
            .filter(|path| !(output_inside_input && path.starts_with(output_root)))
            .collect();

        info!("掃描到 {} 個待匯入檔案", files.len());
        Ok(files)
    }

    fn confirm_import(&self) -> Result<bool> {
        if self.options.assume_yes || !Term::stdout().is_term() {
            return Ok(true);
        }

        let confirm = Confirm::new()
            .with_prompt("確定要搬移這些檔案嗎？")
            .default(true)
            .interact()?;
        Ok(confirm)
    }

    fn print_category_summary(&self, files: &[PathBuf]) {
        // 統計各分類
        let mut counts: HashMap<MediaCategory, (usize, u64)> = HashMap::new();
        let mut unreadable = 0;
        for path in files {
            // 讀取失敗的檔案在搬移時會記為失敗
            let Ok(file) = MediaFile::read(path) else {
                unreadable += 1;
                continue;
            };
            let category = self.config.file_type_table.classify(&file.extension);

            let entry = counts.entry(category).or_insert((0, 0));
            entry.0 += 1;
            entry.1 += file.size;
        }

        println!();
        println!(
            "{}",
            style(format!("找到 {} 個檔案，分類如下：", files.len())).green()
        );
        println!();

        for category in MediaCategory::all_categories() {
            let Some((count, size)) = counts.get(&category) else {
                continue;
            };
            let size_mb = *size as f64 / 1024.0 / 1024.0;

            println!(
                "  {} {} ({}) - {} 個檔案，{:.2} MB",
                style("→").dim(),
                style(self.options.base_folder(category)).cyan(),
                category.display_name(),
                count,
                size_mb
            );
        }

        if unreadable > 0 {
            println!(
                "  {} {} 個檔案無法讀取資訊",
                style("!").yellow(),
                unreadable
            );
        }

        println!();
        println!(
            "  {} {}",
            style("目標:").dim(),
            self.options.output_root.display()
        );
        println!();
    }
}

fn print_dry_run_plan(state: &RunState, method: &str) {
    println!();
    println!("{}", style("=== 試執行（不會變更任何檔案） ===").cyan().bold());

    for outcome in &state.outcomes {
        match (&outcome.target, &outcome.error) {
            (Some(target), None) => println!(
                "  {} {} {} [{method}]",
                outcome.source.display(),
                style("→").dim(),
                target.display()
            ),
            (_, Some(error)) => println!("  {} {error}", style("✗").red()),
            (None, None) => {}
        }
    }
}

fn print_result(state: &RunState, summary: &RunSummary) {
    println!();
    println!("{}", style("=== 匯入結果 ===").cyan().bold());
    println!("  {summary}");

    if summary.failed > 0 {
        println!("  失敗: {} 個檔案", style(summary.failed).red());
    }

    let warnings: Vec<&str> = state
        .outcomes
        .iter()
        .filter_map(|outcome| outcome.warning.as_deref())
        .collect();
    for warning in warnings {
        println!("  {} {warning}", style("!").yellow());
    }

    if state.was_interrupted() {
        println!("{}", style("操作已中斷").yellow());
    }
}
