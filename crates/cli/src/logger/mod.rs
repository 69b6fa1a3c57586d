use std::{
    fs::{self, OpenOptions},
    path::Path,
};

use chrono::Local;
use eyre::WrapErr;
use tracing_appender::{non_blocking, non_blocking::WorkerGuard};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Tracing guards를 보관하는 구조체
/// 이 구조체가 drop되기 전까지 로깅이 계속 작동합니다
pub struct TracingGuards {
    _file: WorkerGuard,
    _console: WorkerGuard,
}

/// Tracing 초기화
/// 파일 로깅과 콘솔 로깅을 모두 설정합니다. stdout은 응답 본문 출력용이라 콘솔 로그는 stderr로 보낸다.
pub fn init_tracing(log_dir: &Path) -> eyre::Result<TracingGuards> {
    let (file_writer, file_guard) = daily_file_appender(log_dir, "bfx")?;
    let (console_writer, console_guard) = non_blocking(std::io::stderr());

    // 콘솔: RUST_LOG (기본 warn)
    let console_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // 파일: 요청 URL/봉투까지 남기도록 debug
    let file_filter = EnvFilter::new("info,bitfinex=debug");

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer)
                .with_filter(file_filter),
        )
        .with(
            fmt::layer()
                .with_writer(console_writer)
                .with_ansi(true)
                .with_filter(console_filter),
        )
        .init();

    Ok(TracingGuards {
        _file: file_guard,
        _console: console_guard,
    })
}

/// 날짜별 로그 파일 생성
/// `logs/bfx.2025-11-29.log` 형식으로 파일을 생성합니다
fn daily_file_appender(
    base_dir: &Path,
    prefix: &str,
) -> eyre::Result<(non_blocking::NonBlocking, WorkerGuard)> {
    fs::create_dir_all(base_dir)
        .wrap_err_with(|| format!("Failed to create log dir {}", base_dir.display()))?;

    let date = Local::now().format("%Y-%m-%d").to_string();
    let path = base_dir.join(format!("{prefix}.{date}.log"));

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .wrap_err_with(|| format!("Failed to open log file {}", path.display()))?;

    Ok(non_blocking(file))
}
