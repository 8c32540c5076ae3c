//! 單一檔案搬移
//!
//! 兩種搬移方式：
//! - 直接 `rename`；跨檔案系統時改為複製後刪除
//! - 保留時間戳記：先複製到暫存檔名並還原修改時間，再改名為最終檔名，最後刪除原始檔

use super::destination::NameReservations;
use super::media_file::MediaFile;
use crate::error::MoveError;
use crate::tools::ensure_directory_exists;
use log::{debug, info, warn};
use std::fs::{self, File, FileTimes};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 搬移成功的結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub target: PathBuf,
    /// 複製成功但原始檔刪除失敗時的警告
    pub warning: Option<String>,
}

pub struct Mover {
    preserve_timestamps: bool,
    dry_run: bool,
    reservations: Arc<NameReservations>,
}

impl Mover {
    #[must_use]
    pub fn new(preserve_timestamps: bool, dry_run: bool) -> Self {
        Self {
            preserve_timestamps,
            dry_run,
            reservations: Arc::new(NameReservations::new()),
        }
    }

    #[must_use]
    pub const fn method_name(&self) -> &'static str {
        if self.preserve_timestamps {
            "copy+delete (preserve timestamps)"
        } else {
            "move"
        }
    }

    /// 將檔案搬到 `destination_dir`，必要時自動加上編號避免覆蓋
    pub fn move_one(&self, file: &MediaFile, destination_dir: &Path) -> Result<Transfer, MoveError> {
        if !self.dry_run {
            ensure_directory_exists(destination_dir).map_err(|source| {
                MoveError::DirCreateFailed {
                    path: destination_dir.to_path_buf(),
                    source,
                }
            })?;
        }

        let reservation = self.reservations.reserve(destination_dir, &file.file_name);
        let target = reservation.target();

        if self.dry_run {
            info!(
                "[dry-run] {} -> {} ({})",
                file.path.display(),
                target.display(),
                self.method_name()
            );
            reservation.persist();
            return Ok(Transfer {
                target,
                warning: None,
            });
        }

        let warning = if self.preserve_timestamps {
            copy_then_rename(&file.path, &target)?
        } else {
            move_file(&file.path, &target)?
        };

        Ok(Transfer { target, warning })
    }
}

fn move_file(source: &Path, target: &Path) -> Result<Option<String>, MoveError> {
    match fs::rename(source, target) {
        Ok(()) => {
            debug!("移動檔案: {} -> {}", source.display(), target.display());
            Ok(None)
        }
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            debug!("跨檔案系統，改用複製後刪除: {}", source.display());
            copy_then_rename(source, target).map_err(|err| match err {
                MoveError::CopyFailed {
                    source_path,
                    target,
                    source,
                } => MoveError::MoveFailed {
                    source_path,
                    target,
                    source,
                },
                other => other,
            })
        }
        Err(source_err) => Err(MoveError::MoveFailed {
            source_path: source.to_path_buf(),
            target: target.to_path_buf(),
            source: source_err,
        }),
    }
}

/// 同資料夾下的暫存檔名，複製完成前不會出現在最終檔名上
fn staging_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{name}.partial"))
}

fn copy_then_rename(source: &Path, target: &Path) -> Result<Option<String>, MoveError> {
    let staged = staging_path(target);

    let copied = fs::copy(source, &staged).and_then(|_| restore_timestamps(source, &staged));
    if let Err(source_err) = copied {
        let _ = fs::remove_file(&staged);
        return Err(MoveError::CopyFailed {
            source_path: source.to_path_buf(),
            target: target.to_path_buf(),
            source: source_err,
        });
    }
    debug!("複製檔案: {} -> {}", source.display(), staged.display());

    fs::rename(&staged, target).map_err(|source_err| MoveError::RenameFailed {
        staged: staged.clone(),
        target: target.to_path_buf(),
        source: source_err,
    })?;
    debug!("重新命名: {} -> {}", staged.display(), target.display());

    match fs::remove_file(source) {
        Ok(()) => {
            debug!("刪除原始檔案: {}", source.display());
            Ok(None)
        }
        Err(e) => {
            let message = format!("已複製但無法刪除原始檔案 {}: {e}", source.display());
            warn!("{message}");
            Ok(Some(message))
        }
    }
}

fn restore_timestamps(source: &Path, copy: &Path) -> io::Result<()> {
    let metadata = fs::metadata(source)?;
    let mut times = FileTimes::new().set_modified(metadata.modified()?);
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    File::options().write(true).open(copy)?.set_times(times)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn media_file(path: &Path) -> MediaFile {
        MediaFile {
            path: path.to_path_buf(),
            file_name: path.file_name().unwrap().to_string_lossy().into_owned(),
            extension: "jpg".to_string(),
            date: NaiveDate::from_ymd_opt(2022, 9, 5).unwrap(),
            size: 0,
        }
    }

    fn write_source(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_move_creates_directory_and_moves() {
        let temp_dir = TempDir::new().unwrap();
        let source = write_source(temp_dir.path(), "a.jpg", "photo");
        let dest = temp_dir.path().join("out/2022/2022-09/2022-09-05");

        let mover = Mover::new(false, false);
        let transfer = mover.move_one(&media_file(&source), &dest).unwrap();

        assert_eq!(transfer.target, dest.join("a.jpg"));
        assert_eq!(transfer.warning, None);
        assert!(!source.exists());
        assert_eq!(fs::read_to_string(dest.join("a.jpg")).unwrap(), "photo");
    }

    #[test]
    fn test_move_renames_on_collision() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("out");
        fs::create_dir_all(&dest).unwrap();
        fs::write(dest.join("a.jpg"), "existing").unwrap();
        let source = write_source(temp_dir.path(), "a.jpg", "new");

        let transfer = Mover::new(false, false)
            .move_one(&media_file(&source), &dest)
            .unwrap();

        assert_eq!(transfer.target, dest.join("a(1).jpg"));
        assert_eq!(fs::read_to_string(dest.join("a.jpg")).unwrap(), "existing");
        assert_eq!(fs::read_to_string(dest.join("a(1).jpg")).unwrap(), "new");
    }

    #[test]
    fn test_preserve_timestamps_copy() {
        let temp_dir = TempDir::new().unwrap();
        let source = write_source(temp_dir.path(), "a.jpg", "photo");
        let modified = SystemTime::UNIX_EPOCH + Duration::from_secs(1_662_379_200);
        File::options()
            .write(true)
            .open(&source)
            .unwrap()
            .set_modified(modified)
            .unwrap();
        let dest = temp_dir.path().join("out");

        let transfer = Mover::new(true, false)
            .move_one(&media_file(&source), &dest)
            .unwrap();

        assert!(!source.exists());
        assert!(!staging_path(&transfer.target).exists());
        let copied = fs::metadata(&transfer.target).unwrap();
        assert_eq!(copied.modified().unwrap(), modified);
        assert_eq!(fs::read_to_string(&transfer.target).unwrap(), "photo");
    }

    #[test]
    fn test_dry_run_does_not_touch_filesystem() {
        let temp_dir = TempDir::new().unwrap();
        let source = write_source(temp_dir.path(), "a.jpg", "photo");
        let dest = temp_dir.path().join("out");

        let mover = Mover::new(true, true);
        let first = mover.move_one(&media_file(&source), &dest).unwrap();
        let second = mover.move_one(&media_file(&source), &dest).unwrap();

        assert_eq!(first.target, dest.join("a.jpg"));
        assert_eq!(second.target, dest.join("a(1).jpg"));
        assert!(source.exists());
        assert!(!dest.exists());
    }

    #[test]
    fn test_missing_source_is_move_failed() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("missing.jpg");
        let dest = temp_dir.path().join("out");

        let result = Mover::new(false, false).move_one(&media_file(&source), &dest);
        assert!(matches!(result, Err(MoveError::MoveFailed { .. })));
    }

    #[test]
    fn test_missing_source_is_copy_failed() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("missing.jpg");
        let dest = temp_dir.path().join("out");

        let result = Mover::new(true, false).move_one(&media_file(&source), &dest);
        assert!(matches!(result, Err(MoveError::CopyFailed { .. })));
        assert!(!staging_path(&dest.join("missing.jpg")).exists());
    }

    #[test]
    fn test_destination_is_a_file_is_dir_create_failed() {
        let temp_dir = TempDir::new().unwrap();
        let source = write_source(temp_dir.path(), "a.jpg", "photo");
        let blocker = write_source(temp_dir.path(), "blocker", "");

        let result = Mover::new(false, false).move_one(&media_file(&source), &blocker.join("sub"));
        assert!(matches!(result, Err(MoveError::DirCreateFailed { .. })));
        assert!(source.exists());
    }

    #[test]
    fn test_staging_path() {
        assert_eq!(
            staging_path(Path::new("/out/a(1).jpg")),
            PathBuf::from("/out/.a(1).jpg.partial")
        );
    }

    #[test]
    fn test_rename_failure_keeps_staged_copy_and_source() {
        let temp_dir = TempDir::new().unwrap();
        let source = write_source(temp_dir.path(), "a.jpg", "photo");
        // 最終檔名被非空資料夾佔住時 rename 必定失敗
        let target = temp_dir.path().join("out/a.jpg");
        fs::create_dir_all(target.join("occupied")).unwrap();

        let result = copy_then_rename(&source, &target);

        assert!(matches!(result, Err(MoveError::RenameFailed { .. })));
        assert!(result.as_ref().unwrap_err().needs_attention());
        assert_eq!(fs::read_to_string(staging_path(&target)).unwrap(), "photo");
        assert!(source.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_source_delete_failure_is_warning() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let card = temp_dir.path().join("card");
        fs::create_dir(&card).unwrap();
        let source = write_source(&card, "a.jpg", "photo");
        let dest = temp_dir.path().join("out");
        fs::create_dir(&dest).unwrap();

        fs::set_permissions(&card, fs::Permissions::from_mode(0o555)).unwrap();
        // root 不受資料夾權限限制，此時無法重現刪除失敗
        if fs::write(card.join("writable"), "").is_ok() {
            fs::set_permissions(&card, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = copy_then_rename(&source, &dest.join("a.jpg"));
        fs::set_permissions(&card, fs::Permissions::from_mode(0o755)).unwrap();

        let warning = result.unwrap();
        assert!(warning.is_some_and(|message| message.contains("a.jpg")));
        assert_eq!(fs::read_to_string(dest.join("a.jpg")).unwrap(), "photo");
        assert!(source.exists());
    }
}
