// crates/gf_config/src/fence_config.rs

//! FenceConfig - 围栏服务配置
//!
//! 围栏文件中的顶点来自百度墨卡托反投影，默认属于 BD09；
//! GPS 设备上报的查询点默认属于 WGS84。判断前查询点会被转换到围栏坐标系。

use gf_geo::Datum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::ConfigError;

/// 支持的日志级别
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// 围栏服务配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FenceConfig {
    /// 围栏文件路径
    ///
    /// 通过 [`FenceConfig::from_file`] 加载时，相对路径以配置文件所在目录为基准。
    #[serde(default)]
    pub fences: PathBuf,

    /// 围栏顶点所属坐标系
    #[serde(default = "default_fence_datum")]
    pub fence_datum: Datum,

    /// 查询点所属坐标系
    #[serde(default = "default_query_datum")]
    pub query_datum: Datum,

    /// 是否先用 R-tree 筛选候选围栏
    #[serde(default = "default_use_index")]
    pub use_index: bool,

    /// 日志级别
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_fence_datum() -> Datum { Datum::Bd09 }
fn default_query_datum() -> Datum { Datum::Wgs84 }
fn default_use_index() -> bool { true }
fn default_log_level() -> String { "info".to_string() }

impl Default for FenceConfig {
    fn default() -> Self {
        Self {
            fences: PathBuf::new(),
            fence_datum: default_fence_datum(),
            query_datum: default_query_datum(),
            use_index: default_use_index(),
            log_level: default_log_level(),
        }
    }
}

impl FenceConfig {
    /// 以围栏文件路径创建默认配置
    pub fn with_fences(path: impl Into<PathBuf>) -> Self {
        Self {
            fences: path.into(),
            ..Self::default()
        }
    }

    /// 从文件加载配置并验证
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_json_str(&content)?;

        if config.fences.is_relative() && !config.fences.as_os_str().is_empty() {
            if let Some(dir) = path.parent() {
                config.fences = dir.join(&config.fences);
            }
        }
        debug!(config = %path.display(), fences = %config.fences.display(), "配置已加载");

        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 字符串解析（不做验证）
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// 序列化为格式化的 JSON
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fences.as_os_str().is_empty() {
            return Err(ConfigError::Missing("fences".to_string()));
        }

        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::invalid_value(
                "log_level",
                &self.log_level,
                format!("必须为 {} 之一", LOG_LEVELS.join("/")),
            ));
        }

        Ok(())
    }

    /// 查询点是否需要转换坐标系
    pub fn needs_conversion(&self) -> bool {
        self.fence_datum != self.query_datum
    }

    /// 把查询点 `(纬度, 经度)` 转换到围栏坐标系
    pub fn to_fence_datum(&self, lat: f64, lon: f64) -> (f64, f64) {
        self.query_datum.convert(self.fence_datum, lat, lon)
    }
}
