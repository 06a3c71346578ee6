//! Trivium - OpenAI API 中继服务
//!
//! 一个轻量级的 HTTP 中继服务，将三类请求转发到 OpenAI API：
//! 文本生成、文本翻译、代码补全。
//!
//! # 功能特性
//!
//! - 三个操作端点：`/api/generate_text`、`/api/translate_text`、`/api/complete_code`
//! - 响应归一化：从上游响应中提取单一字段，返回单键 JSON
//! - 统一的失败映射：上游错误 / 传输错误 / 内部错误均返回 HTTP 500
//!
//! # 命令行接口
//!
//! - `serve`: 启动 API 服务器
//! - `test`: 向本地服务器发送测试请求

mod commands;
mod config;
mod gateway;
mod providers;
mod service;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Trivium CLI
#[derive(Parser)]
#[command(name = "trivium")]
#[command(about = "OpenAI API Relay Service", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// 可用的命令
#[derive(Subcommand)]
enum Commands {
    /// 启动 API 中继服务器
    Serve,
    /// 向本地服务器发送测试请求
    Test,
}

#[tokio::main]
async fn main() -> Result<()> {
    // 加载 .env 文件（如果存在）
    if let Ok(dotenv_path) = std::env::var("TRIVIUM_ENV_FILE") {
        dotenvy::from_path(&dotenv_path).ok();
    } else {
        dotenvy::dotenv().ok();
    }

    // 初始化日志系统
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trivium=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();

    // 解析命令行参数和配置
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // 执行相应的命令
    match cli.command {
        Commands::Serve => commands::serve_command(config).await,
        Commands::Test => commands::test_command(config).await,
    }
}
