use anyhow::Result;
use log::warn;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 遞迴掃描目錄下所有檔案（不含資料夾），保留檔案系統走訪順序
pub fn scan_all_files(directory: &Path) -> Result<Vec<PathBuf>> {
    let files = WalkDir::new(directory)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("無法讀取目錄項目: {e}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .collect();

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scan_all_files_recursive() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("DCIM/100FUJI");
        fs::create_dir_all(&nested).unwrap();

        fs::write(temp_dir.path().join("top.jpg"), "a").unwrap();
        fs::write(nested.join("DSCF0001.RAF"), "b").unwrap();
        fs::write(nested.join("DSCF0002.MOV"), "c").unwrap();

        let mut files = scan_all_files(temp_dir.path()).unwrap();
        files.sort();

        assert_eq!(files.len(), 3);
        assert!(files.iter().all(|f| f.is_file()));
        assert!(files.contains(&nested.join("DSCF0002.MOV")));
    }

    #[test]
    fn test_scan_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("empty")).unwrap();
        let files = scan_all_files(temp_dir.path()).unwrap();
        assert!(files.is_empty());
    }
}
