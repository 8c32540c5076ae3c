use anyhow::{Context, Result};
use chrono::Local;
use env_logger::{Builder, Env, Target};
use log::LevelFilter;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// 初始化日誌
///
/// 指定 `log_file` 時以附加模式寫入該檔案，預設等級為 info；
/// 否則輸出到 stderr，預設只顯示警告。`RUST_LOG` 可覆寫過濾條件。
pub fn init_logger(log_file: Option<&Path>, verbose: bool) -> Result<()> {
    let default_level = if verbose {
        LevelFilter::Debug
    } else if log_file.is_some() {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };

    let mut builder = Builder::new();
    builder
        .filter_level(default_level)
        .parse_env(Env::default())
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        });

    if let Some(path) = log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("無法開啟日誌檔案: {}", path.display()))?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    builder.try_init().context("無法初始化日誌")?;
    Ok(())
}
