//! 目標路徑規劃
//!
//! 依分類與日期決定目標資料夾，並在資料夾內挑出不會覆蓋既有檔案的檔名。

use chrono::{Datelike, NaiveDate};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// 以最後一個 `.` 切分主檔名與副檔名
///
/// 沒有 `.`、或只有開頭的 `.`（例如 `.hidden`）時視為沒有副檔名。
#[must_use]
pub fn split_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        None | Some(0) => (name, ""),
        Some(index) => (&name[..index], &name[index + 1..]),
    }
}

/// `{base}/{YYYY}/{YYYY-MM}/{YYYY-MM-DD}`
#[must_use]
pub fn plan_directory(base_folder: &str, date: NaiveDate) -> PathBuf {
    let (year, month, day) = (date.year(), date.month(), date.day());
    Path::new(base_folder)
        .join(format!("{year:04}"))
        .join(format!("{year:04}-{month:02}"))
        .join(format!("{year:04}-{month:02}-{day:02}"))
}

/// 依序嘗試 `name(1).ext`、`name(2).ext`…，回傳第一個未被佔用的檔名
pub fn resolve_name_with(desired: &str, is_taken: impl Fn(&str) -> bool) -> String {
    if !is_taken(desired) {
        return desired.to_string();
    }

    let (base, extension) = split_name(desired);
    let mut counter: u64 = 1;
    loop {
        let candidate = if extension.is_empty() {
            format!("{base}({counter})")
        } else {
            format!("{base}({counter}).{extension}")
        };
        if !is_taken(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// 針對已知的資料夾內容挑選檔名
#[must_use]
pub fn resolve_name(existing_entries: &HashSet<String>, desired: &str) -> String {
    resolve_name_with(desired, |candidate| existing_entries.contains(candidate))
}

/// 進行中的搬移所保留的檔名，依目標資料夾分組
///
/// 檢查磁碟內容與保留名單在同一把鎖內完成，
/// 兩個並行的搬移不會選到同一個檔名。
#[derive(Debug, Default)]
pub struct NameReservations {
    /// 以小寫比對，避免不分大小寫的檔案系統上兩個搬移拿到同一個實際檔案
    reserved: Mutex<HashMap<PathBuf, HashSet<String>>>,
}

impl NameReservations {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 在 `directory` 中為 `desired` 挑選並保留一個不衝突的檔名
    pub fn reserve(&self, directory: &Path, desired: &str) -> NameReservation<'_> {
        let mut reserved = self.reserved.lock().unwrap_or_else(PoisonError::into_inner);
        let names = reserved.entry(directory.to_path_buf()).or_default();

        let name = resolve_name_with(desired, |candidate| {
            names.contains(&fold_case(candidate))
                || fs::symlink_metadata(directory.join(candidate)).is_ok()
        });
        names.insert(fold_case(&name));

        NameReservation {
            owner: self,
            directory: directory.to_path_buf(),
            name,
            persist: false,
        }
    }

    fn release(&self, directory: &Path, name: &str) {
        let mut reserved = self.reserved.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(names) = reserved.get_mut(directory) {
            names.remove(&fold_case(name));
            if names.is_empty() {
                reserved.remove(directory);
            }
        }
    }

    #[must_use]
    pub fn is_reserved(&self, directory: &Path, name: &str) -> bool {
        self.reserved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(directory)
            .is_some_and(|names| names.contains(&fold_case(name)))
    }
}

fn fold_case(name: &str) -> String {
    name.to_lowercase()
}

/// 保留中的檔名，離開作用域時釋放
#[derive(Debug)]
pub struct NameReservation<'a> {
    owner: &'a NameReservations,
    directory: PathBuf,
    name: String,
    persist: bool,
}

impl NameReservation<'_> {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn target(&self) -> PathBuf {
        self.directory.join(&self.name)
    }

    /// 保留到整個執行結束（試執行不會真的建立檔案時使用）
    pub fn persist(mut self) {
        self.persist = true;
    }
}

impl Drop for NameReservation<'_> {
    fn drop(&mut self) {
        if !self.persist {
            self.owner.release(&self.directory, &self.name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entries(names: &[&str]) -> HashSet<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_split_name() {
        assert_eq!(split_name("a.jpg"), ("a", "jpg"));
        assert_eq!(split_name("archive.tar.gz"), ("archive.tar", "gz"));
        assert_eq!(split_name("report"), ("report", ""));
        assert_eq!(split_name(".hidden"), (".hidden", ""));
        assert_eq!(split_name(".config.json"), (".config", "json"));
    }

    #[test]
    fn test_plan_directory() {
        let date = NaiveDate::from_ymd_opt(2022, 9, 5).unwrap();
        assert_eq!(
            plan_directory("Photo/Raw", date),
            PathBuf::from("Photo/Raw/2022/2022-09/2022-09-05")
        );
    }

    #[test]
    fn test_resolve_name_no_collision() {
        assert_eq!(resolve_name(&entries(&[]), "a.jpg"), "a.jpg");
        assert_eq!(resolve_name(&entries(&["b.jpg"]), "a.jpg"), "a.jpg");
    }

    #[test]
    fn test_resolve_name_single_collision() {
        assert_eq!(resolve_name(&entries(&["a.jpg"]), "a.jpg"), "a(1).jpg");
    }

    #[test]
    fn test_resolve_name_chained_collisions() {
        assert_eq!(
            resolve_name(&entries(&["a.jpg", "a(1).jpg"]), "a.jpg"),
            "a(2).jpg"
        );
        assert_eq!(
            resolve_name(&entries(&["a.jpg", "a(2).jpg"]), "a.jpg"),
            "a(1).jpg"
        );
    }

    #[test]
    fn test_resolve_name_extensionless() {
        assert_eq!(resolve_name(&entries(&["report"]), "report"), "report(1)");
        assert_eq!(resolve_name(&entries(&[".hidden"]), ".hidden"), ".hidden(1)");
    }

    #[test]
    fn test_reservation_checks_disk_and_in_flight_names() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        fs::write(dir.join("a.jpg"), "x").unwrap();

        let reservations = NameReservations::new();
        let first = reservations.reserve(dir, "a.jpg");
        assert_eq!(first.name(), "a(1).jpg");

        let second = reservations.reserve(dir, "a.jpg");
        assert_eq!(second.name(), "a(2).jpg");
        assert_eq!(second.target(), dir.join("a(2).jpg"));

        drop(first);
        assert!(!reservations.is_reserved(dir, "a(1).jpg"));
        assert!(reservations.is_reserved(dir, "a(2).jpg"));

        let third = reservations.reserve(dir, "a.jpg");
        assert_eq!(third.name(), "a(1).jpg");
    }

    #[test]
    fn test_persisted_reservation_is_kept() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("not-created-yet");

        let reservations = NameReservations::new();
        reservations.reserve(&dir, "clip.mov").persist();

        assert!(reservations.is_reserved(&dir, "clip.mov"));
        assert_eq!(reservations.reserve(&dir, "clip.mov").name(), "clip(1).mov");
    }

    #[test]
    fn test_reservations_ignore_case() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();

        let reservations = NameReservations::new();
        let upper = reservations.reserve(dir, "A.JPG");
        let lower = reservations.reserve(dir, "a.jpg");

        assert_eq!(upper.name(), "A.JPG");
        assert_eq!(lower.name(), "a(1).jpg");
        assert!(reservations.is_reserved(dir, "a.jpg"));

        drop(upper);
        assert!(!reservations.is_reserved(dir, "a.jpg"));
        assert!(reservations.is_reserved(dir, "A(1).JPG"));
    }
}
