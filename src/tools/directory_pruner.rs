use log::{debug, warn};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// 由深到淺刪除 `root` 底下已清空的資料夾，`root` 本身永遠保留
///
/// 回傳刪除的資料夾數量；個別刪除失敗只記錄警告。
pub fn prune_empty_directories(root: &Path) -> usize {
    let mut removed = 0;

    let directories = WalkDir::new(root)
        .follow_links(false)
        .min_depth(1)
        .contents_first(true)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_dir());

    for entry in directories {
        let path = entry.path();
        if !is_empty_dir(path) {
            continue;
        }

        match fs::remove_dir(path) {
            Ok(()) => {
                debug!("刪除空資料夾: {}", path.display());
                removed += 1;
            }
            Err(e) => warn!("無法刪除空資料夾 {}: {e}", path.display()),
        }
    }

    removed
}

fn is_empty_dir(path: &Path) -> bool {
    fs::read_dir(path).is_ok_and(|mut entries| entries.next().is_none())
}
