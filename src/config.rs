//! 应用配置模块
//!
//! 负责从环境变量加载应用配置，包括：
//! - 服务器监听地址和端口
//! - OpenAI API 凭证和上游地址

use anyhow::{Context, Result};

/// OpenAI 上游的默认地址
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

/// 应用配置
///
/// 包含服务器运行所需的所有配置项
#[derive(Debug, Clone)]
pub struct Config {
    /// 服务器监听地址（如 "0.0.0.0" 或 "127.0.0.1"）
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
    /// OpenAI 上游配置
    pub openai: OpenAiSettings,
}

/// OpenAI 上游配置
///
/// 进程启动时构造一次，之后以引用的方式传入 Provider 构造函数，
/// 不使用进程级全局凭证状态
#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    /// API 凭证（Bearer token）
    pub api_key: String,
    /// 上游基础地址（可覆盖，用于测试替身）
    pub base_url: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// # 环境变量
    ///
    /// - `TRIVIUM_HOST`: 服务器监听地址（默认: "0.0.0.0"）
    /// - `TRIVIUM_PORT`: 服务器监听端口（默认: 8080）
    /// - `OPENAI_API_KEY`: OpenAI API 凭证（**必需**）
    /// - `OPENAI_BASE_URL`: OpenAI 上游地址（默认: `https://api.openai.com`）
    ///
    /// # 错误
    ///
    /// - 如果 `OPENAI_API_KEY` 未设置（进程快速失败，不会带病启动）
    /// - 如果 `TRIVIUM_PORT` 不是有效的端口号
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("TRIVIUM_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = std::env::var("TRIVIUM_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .context("TRIVIUM_PORT must be a valid port number")?;

        let api_key = std::env::var("OPENAI_API_KEY")
            .context("OPENAI_API_KEY environment variable is required")?;

        let base_url = std::env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.to_string());

        Ok(Self {
            host,
            port,
            openai: OpenAiSettings { api_key, base_url },
        })
    }
}
