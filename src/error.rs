//! 單一檔案搬移失敗的錯誤類型
//!
//! 每個錯誤只影響該檔案本身，排程器會把它轉成失敗結果後繼續處理其他檔案。

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MoveError {
    #[error("無法讀取檔案資訊 {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("無法建立目標資料夾 {path}: {source}")]
    DirCreateFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("複製檔案失敗 {source_path} -> {target}: {source}")]
    CopyFailed {
        source_path: PathBuf,
        target: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("移動檔案失敗 {source_path} -> {target}: {source}")]
    MoveFailed {
        source_path: PathBuf,
        target: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 複製已完成但無法改為最終檔名，暫存副本與原始檔都還在
    #[error("複製後重新命名失敗 {staged} -> {target}: {source}")]
    RenameFailed {
        staged: PathBuf,
        target: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl MoveError {
    /// 是否留下需要人工處理的中間狀態
    #[must_use]
    pub const fn needs_attention(&self) -> bool {
        matches!(self, Self::RenameFailed { .. })
    }
}
