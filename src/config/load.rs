use crate::config::types::{Config, FileTypeTable, ImportOptions, Settings};
use anyhow::{Context, Result, bail, ensure};
use std::fs;
use std::path::Path;

/// 編譯時嵌入的檔案類型設定（不需要外部檔案）
const FILE_TYPE_TABLE_JSON: &str = include_str!("data/file_type_table.json");

impl Config {
    /// 載入嵌入的副檔名表與使用者設定，設定檔不存在時使用預設值
    pub fn new(settings_path: &Path) -> Result<Self> {
        let file_type_table = Self::load_embedded_file_type_table()?;
        let settings = Self::load_settings(settings_path)?;

        Ok(Self {
            file_type_table,
            settings,
        })
    }

    fn load_settings(path: &Path) -> Result<Settings> {
        if !path.exists() {
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))
    }

    /// 從編譯時嵌入的 JSON 載入檔案類型表
    pub fn load_embedded_file_type_table() -> Result<FileTypeTable> {
        let table: FileTypeTable =
            serde_json::from_str(FILE_TYPE_TABLE_JSON).context("無法解析嵌入的檔案類型設定")?;
        let table = table.normalized();

        let overlap = table.overlapping_extensions();
        if !overlap.is_empty() {
            bail!("副檔名同時屬於影片與音訊: {}", overlap.join(", "));
        }

        Ok(table)
    }
}

impl ImportOptions {
    /// 檢查選項是否合法，任何錯誤都會在移動檔案前中止執行
    pub fn validate(&self) -> Result<()> {
        ensure!(self.jobs >= 1, "並行數量必須至少為 1（目前為 {}）", self.jobs);
        ensure!(
            !same_directory(&self.input_root, &self.output_root),
            "目標根目錄不可與來源資料夾相同: {}",
            self.output_root.display()
        );

        for (name, folder) in [
            ("photo", &self.photo_folder),
            ("video", &self.video_folder),
            ("audio", &self.audio_folder),
        ] {
            ensure!(!folder.trim().is_empty(), "{name} 目標資料夾不可為空");
            ensure!(
                Path::new(folder).is_relative(),
                "{name} 目標資料夾必須是相對路徑: {folder}"
            );
        }

        Ok(())
    }
}

/// 兩個路徑都存在時比較實際位置，否則比較字面路徑
fn same_directory(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
