//! 可观测性模块
//!
//! 结构化日志初始化：环境变量过滤、JSON/文本格式、可选的按日滚动文件输出。

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::config::LoggingConfig;
use crate::error::{AppError, Result};

/// 日志文件名前缀
const LOG_FILE_PREFIX: &str = "profile-desk.log";

/// 构建日志过滤器
///
/// `RUST_LOG` 优先，其次使用配置中的级别。
pub fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    match std::env::var("RUST_LOG") {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(directives)
            .map_err(|e| AppError::Logging(format!("invalid RUST_LOG: {}", e))),
        _ => EnvFilter::try_new(&config.level)
            .map_err(|e| AppError::Logging(format!("invalid log level '{}': {}", config.level, e))),
    }
}

/// 初始化结构化日志
///
/// 配置了日志目录时写入按日滚动的文件，返回的 guard 需在进程生命周期内保持存活。
pub fn init_tracing(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = build_env_filter(config)?;

    let (writer, guard) = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (fmt::writer::BoxMakeWriter::new(writer), Some(guard))
        }
        None => (fmt::writer::BoxMakeWriter::new(std::io::stderr), None),
    };

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = if config.structured {
        registry
            .with(fmt::layer().json().with_target(true).with_writer(writer))
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(writer),
            )
            .try_init()
    };
    result.map_err(|e| AppError::Logging(e.to_string()))?;

    Ok(guard)
}
