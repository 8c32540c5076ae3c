use super::destination::split_name;
use crate::error::MoveError;
use chrono::{DateTime, Local, NaiveDate};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// 掃描到的媒體檔案，讀取後不再變動
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub path: PathBuf,
    pub file_name: String,
    /// 最後一個 `.` 之後的字串，沒有副檔名時為空字串
    pub extension: String,
    /// 修改時間（本地時區）的日期
    pub date: NaiveDate,
    pub size: u64,
}

impl MediaFile {
    pub fn read(path: &Path) -> Result<Self, MoveError> {
        let metadata_error = |source: io::Error| MoveError::Metadata {
            path: path.to_path_buf(),
            source,
        };

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| metadata_error(io::Error::other("路徑沒有檔名")))?;

        let metadata = fs::metadata(path).map_err(metadata_error)?;
        let modified = metadata.modified().map_err(metadata_error)?;

        Ok(Self {
            path: path.to_path_buf(),
            extension: split_name(&file_name).1.to_string(),
            file_name,
            date: DateTime::<Local>::from(modified).date_naive(),
            size: metadata.len(),
        })
    }
}
