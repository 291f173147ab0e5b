//! 配置管理模块
//! 支持从环境变量和配置文件加载配置

use std::env::VarError;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::mnemonic::ChecksumPolicy;

/// 应用配置结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub logging: LoggingConfig,
    #[serde(default)]
    pub derivation: DerivationConfig,
    #[serde(default)]
    pub wallet: WalletFileConfig,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "text"
}

/// 派生配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DerivationConfig {
    #[serde(default)]
    pub checksum_policy: ChecksumPolicy,
    /// 未指定数量时派生的地址个数
    pub default_count: u32,
    /// 窗口小于该值时在调用线程上顺序派生
    pub parallel_threshold: u32,
    pub max_workers: usize,
}

/// 钱包文件配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletFileConfig {
    pub path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            format: std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".into()),
        }
    }
}

impl Default for DerivationConfig {
    fn default() -> Self {
        Self {
            checksum_policy: ChecksumPolicy::default(),
            default_count: 5,
            parallel_threshold: 16,
            max_workers: default_workers(),
        }
    }
}

impl DerivationConfig {
    /// 从环境变量读取，未设置的项使用默认值，无法解析的值直接报错
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key))
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let defaults = Self::default();
        Ok(Self {
            checksum_policy: parse_var(&lookup, "BIS_CHECKSUM_POLICY")?
                .unwrap_or(defaults.checksum_policy),
            default_count: parse_var(&lookup, "BIS_DEFAULT_COUNT")?
                .unwrap_or(defaults.default_count),
            parallel_threshold: parse_var(&lookup, "BIS_PARALLEL_THRESHOLD")?
                .unwrap_or(defaults.parallel_threshold),
            max_workers: parse_var(&lookup, "BIS_MAX_WORKERS")?.unwrap_or(defaults.max_workers),
        })
    }
}

/// 未设置返回 None
fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Result<String, VarError>,
{
    let raw = match lookup(key) {
        Ok(raw) => raw,
        Err(VarError::NotPresent) => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("Failed to read {}", key)),
    };
    raw.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|e| anyhow::anyhow!("{}", e))
        .with_context(|| format!("Invalid value for {}: {:?}", key, raw))
}

impl Default for WalletFileConfig {
    fn default() -> Self {
        Self {
            path: std::env::var("BIS_WALLET_FILE").unwrap_or_else(|_| "wallet.json".into()),
        }
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

impl Config {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            logging: LoggingConfig::default(),
            derivation: DerivationConfig::from_env()?,
            wallet: WalletFileConfig::default(),
        })
    }

    /// 从配置文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse config file as TOML")?;

        Ok(config)
    }

    /// 从环境变量和配置文件合并加载（配置文件优先级更高）
    pub fn from_env_and_file<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let mut config = Self::from_env()?;

        if let Some(path) = path {
            if path.as_ref().exists() {
                config = Self::from_file(path)?;
            }
        }

        Ok(config)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<()> {
        // 验证日志级别
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            anyhow::bail!("LOG_LEVEL must be one of: {:?}", valid_levels);
        }

        // 验证日志格式
        if self.logging.format != "json" && self.logging.format != "text" {
            anyhow::bail!("LOG_FORMAT must be 'json' or 'text'");
        }

        if self.derivation.max_workers == 0 {
            anyhow::bail!("BIS_MAX_WORKERS must be at least 1");
        }

        if self.wallet.path.trim().is_empty() {
            anyhow::bail!("BIS_WALLET_FILE must not be empty");
        }

        Ok(())
    }
}
