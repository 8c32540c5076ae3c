use anyhow::{Context, Result, bail};
use log::info;
use std::path::Path;
use std::process::Command;

/// 退出 `path` 所在的磁碟區
#[cfg(target_os = "macos")]
pub fn eject_volume(path: &Path) -> Result<()> {
    run_command(Command::new("diskutil").arg("eject").arg(path))?;
    info!("已退出磁碟區: {}", path.display());
    Ok(())
}

/// 退出 `path` 所在的磁碟區，優先使用 udisksctl，失敗時改用 umount
#[cfg(target_os = "linux")]
pub fn eject_volume(path: &Path) -> Result<()> {
    let output = Command::new("findmnt")
        .args(["-n", "-o", "SOURCE,TARGET", "--target"])
        .arg(path)
        .output()
        .with_context(|| format!("無法執行 findmnt: {}", path.display()))?;

    if !output.status.success() {
        bail!("找不到掛載點: {}", path.display());
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let Some((device, mount_point)) = parse_findmnt_line(&stdout) else {
        bail!("無法解析 findmnt 輸出: {}", stdout.trim());
    };

    let unmounted = run_command(Command::new("udisksctl").args(["unmount", "-b", device]))
        .or_else(|_| run_command(Command::new("umount").arg(mount_point)));
    unmounted?;

    info!("已卸載磁碟區: {mount_point} ({device})");
    Ok(())
}

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
pub fn eject_volume(path: &Path) -> Result<()> {
    bail!("此平台不支援退出磁碟區: {}", path.display())
}

fn run_command(command: &mut Command) -> Result<()> {
    let program = command.get_program().to_string_lossy().into_owned();
    let output = command
        .output()
        .with_context(|| format!("無法執行 {program}"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("{program} 執行失敗: {}", stderr.trim());
    }
    Ok(())
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_findmnt_line(output: &str) -> Option<(&str, &str)> {
    let line = output.lines().next()?.trim();
    let (device, mount_point) = line.split_once(char::is_whitespace)?;
    Some((device, mount_point.trim()))
}
