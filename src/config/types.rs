use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const DEFAULT_PHOTO_FOLDER: &str = "Photo/Raw";
pub const DEFAULT_VIDEO_FOLDER: &str = "Video/Raw";
pub const DEFAULT_AUDIO_FOLDER: &str = "Audio/Raw";

/// 媒體分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaCategory {
    Photo,
    Video,
    Audio,
}

impl MediaCategory {
    #[must_use]
    pub const fn all_categories() -> [Self; 3] {
        [Self::Photo, Self::Video, Self::Audio]
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Photo => "照片",
            Self::Video => "影片",
            Self::Audio => "音訊",
        }
    }
}

/// 副檔名分類表（不含前導 `.`，一律小寫）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileTypeTable {
    #[serde(rename = "VIDEO_FILE")]
    pub video_file: HashSet<String>,
    #[serde(rename = "AUDIO_FILE")]
    pub audio_file: HashSet<String>,
}

impl FileTypeTable {
    /// 依副檔名分類：影片優先，其次音訊，其餘一律視為照片
    #[must_use]
    pub fn classify(&self, extension: &str) -> MediaCategory {
        let extension = extension.to_lowercase();
        if self.video_file.contains(&extension) {
            MediaCategory::Video
        } else if self.audio_file.contains(&extension) {
            MediaCategory::Audio
        } else {
            MediaCategory::Photo
        }
    }

    /// 同時出現在影片與音訊表中的副檔名（正常情況應為空）
    #[must_use]
    pub fn overlapping_extensions(&self) -> Vec<String> {
        let mut overlap: Vec<String> = self
            .video_file
            .intersection(&self.audio_file)
            .cloned()
            .collect();
        overlap.sort();
        overlap
    }

    #[must_use]
    pub fn normalized(self) -> Self {
        let lower = |set: HashSet<String>| {
            set.into_iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect()
        };
        Self {
            video_file: lower(self.video_file),
            audio_file: lower(self.audio_file),
        }
    }
}

/// 使用者設定（`settings.json`），缺少的欄位使用預設值
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub photo_folder: String,
    pub video_folder: String,
    pub audio_folder: String,
    pub jobs: usize,
    pub preserve_timestamps: bool,
    pub eject: bool,
    pub prune: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            photo_folder: DEFAULT_PHOTO_FOLDER.to_string(),
            video_folder: DEFAULT_VIDEO_FOLDER.to_string(),
            audio_folder: DEFAULT_AUDIO_FOLDER.to_string(),
            jobs: 1,
            preserve_timestamps: false,
            eject: true,
            prune: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub file_type_table: FileTypeTable,
    pub settings: Settings,
}

/// 單次匯入的完整選項，由設定檔與命令列參數合併而來
#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub input_root: PathBuf,
    pub output_root: PathBuf,
    pub dry_run: bool,
    pub preserve_timestamps: bool,
    pub jobs: usize,
    pub photo_folder: String,
    pub video_folder: String,
    pub audio_folder: String,
    pub eject: bool,
    pub prune: bool,
    pub assume_yes: bool,
    pub show_progress: bool,
}

impl ImportOptions {
    /// 以設定檔內容為基礎建立選項
    #[must_use]
    pub fn from_settings(settings: &Settings, input_root: &Path, output_root: &Path) -> Self {
        Self {
            input_root: input_root.to_path_buf(),
            output_root: output_root.to_path_buf(),
            dry_run: false,
            preserve_timestamps: settings.preserve_timestamps,
            jobs: settings.jobs,
            photo_folder: settings.photo_folder.clone(),
            video_folder: settings.video_folder.clone(),
            audio_folder: settings.audio_folder.clone(),
            eject: settings.eject,
            prune: settings.prune,
            assume_yes: false,
            show_progress: false,
        }
    }

    #[must_use]
    pub fn base_folder(&self, category: MediaCategory) -> &str {
        match category {
            MediaCategory::Photo => &self.photo_folder,
            MediaCategory::Video => &self.video_folder,
            MediaCategory::Audio => &self.audio_folder,
        }
    }
}
