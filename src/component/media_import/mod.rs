//! 媒體匯入元件
//!
//! 從記憶卡等來源資料夾掃描檔案，依副檔名分為照片、影片、音訊，
//! 再依修改日期搬到 `分類/YYYY/YYYY-MM/YYYY-MM-DD` 目標資料夾

pub mod destination;
mod main;
pub mod media_file;
pub mod mover;
pub mod scheduler;
pub mod summary;

pub use destination::{
    NameReservation, NameReservations, plan_directory, resolve_name, resolve_name_with, split_name,
};
pub use main::{ImportReport, MediaImport};
pub use media_file::MediaFile;
pub use mover::{Mover, Transfer};
pub use scheduler::Scheduler;
pub use summary::{MoveOutcome, MoveStatus, RunState, RunSummary, finalize};
