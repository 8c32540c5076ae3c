//! 命令列參數
//!
//! ```bash
//! # 預覽匯入結果
//! media-import /Volumes/SD_CARD ~/Media --dry-run
//!
//! # 保留修改時間，4 個檔案同時搬移
//! media-import /Volumes/SD_CARD ~/Media -p -j 4 --log-file import.log
//! ```

use crate::config::{ImportOptions, Settings};
use clap::Parser;
use std::path::PathBuf;

/// 依類型與日期整理相機記憶卡上的媒體檔案
#[derive(Parser, Debug)]
#[command(name = "media-import")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// 來源資料夾（例如記憶卡掛載點）
    pub input: PathBuf,

    /// 目標根目錄
    pub output: PathBuf,

    /// 只顯示預計的搬移結果，不變更任何檔案
    #[arg(long)]
    pub dry_run: bool,

    /// 以複製後刪除的方式搬移，保留修改時間
    #[arg(short, long)]
    pub preserve_timestamps: bool,

    /// 同時進行的搬移數量（預設 1，依序處理）
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// 照片目標資料夾（相對於目標根目錄）
    #[arg(long)]
    pub photo_folder: Option<String>,

    /// 影片目標資料夾
    #[arg(long)]
    pub video_folder: Option<String>,

    /// 音訊目標資料夾
    #[arg(long)]
    pub audio_folder: Option<String>,

    /// 日誌檔案路徑（附加寫入）
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// 設定檔路徑
    #[arg(long, default_value = "settings.json")]
    pub config: PathBuf,

    /// 完成後不退出來源磁碟區
    #[arg(long)]
    pub no_eject: bool,

    /// 完成後不刪除來源中的空資料夾
    #[arg(long)]
    pub no_prune: bool,

    /// 不詢問確認
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// 顯示除錯日誌
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// 命令列參數覆寫設定檔內容
    #[must_use]
    pub fn import_options(&self, settings: &Settings) -> ImportOptions {
        let mut options = ImportOptions::from_settings(settings, &self.input, &self.output);

        options.dry_run = self.dry_run;
        options.preserve_timestamps |= self.preserve_timestamps;
        if let Some(jobs) = self.jobs {
            options.jobs = jobs;
        }
        if let Some(folder) = &self.photo_folder {
            options.photo_folder.clone_from(folder);
        }
        if let Some(folder) = &self.video_folder {
            options.video_folder.clone_from(folder);
        }
        if let Some(folder) = &self.audio_folder {
            options.audio_folder.clone_from(folder);
        }
        options.eject &= !self.no_eject;
        options.prune &= !self.no_prune;
        options.assume_yes = self.yes;
        options.show_progress = true;

        options
    }
}
