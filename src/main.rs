use anyhow::Result;
use clap::Parser;
use console::style;
use log::{error, info};
use media_import::cli::Cli;
use media_import::component::MediaImport;
use media_import::config::Config;
use media_import::init::init_logger;
use media_import::signal::setup_shutdown_signal;
use std::process::ExitCode;

/// 有檔案搬移失敗
const EXIT_FILE_FAILURES: u8 = 1;
/// 搬移開始前的錯誤（路徑、設定等）
const EXIT_RUN_ERROR: u8 = 2;
const EXIT_INTERRUPTED: u8 = 130;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            error!("匯入失敗: {e:#}");
            eprintln!("{} {e:#}", style("錯誤:").red().bold());
            ExitCode::from(EXIT_RUN_ERROR)
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    init_logger(cli.log_file.as_deref(), cli.verbose)?;
    let shutdown_signal = setup_shutdown_signal()?;

    let config = Config::new(&cli.config)?;
    let options = cli.import_options(&config.settings);

    let Some(report) = MediaImport::new(config, options, shutdown_signal).run()? else {
        info!("使用者取消匯入");
        return Ok(ExitCode::SUCCESS);
    };

    if report.interrupted {
        return Ok(ExitCode::from(EXIT_INTERRUPTED));
    }
    if report.summary.failed > 0 {
        return Ok(ExitCode::from(EXIT_FILE_FAILURES));
    }
    Ok(ExitCode::SUCCESS)
}
