// crates/gf_config/src/lib.rs

//! GeoFence 配置层
//!
//! 从 JSON 文件加载围栏服务配置：围栏文件位置、围栏顶点与查询点所属的坐标系、
//! 是否启用空间索引以及日志级别。
//!
//! # 模块概览
//!
//! - [`fence_config`]: FenceConfig 围栏配置
//! - [`error`]: 配置错误类型
//!
//! # 示例
//!
//! ```
//! use gf_config::FenceConfig;
//! use gf_geo::Datum;
//!
//! let config = FenceConfig::from_json_str(r#"{ "fences": "poi.txt", "query_datum": "gcj02" }"#).unwrap();
//! assert_eq!(config.fence_datum, Datum::Bd09);
//! assert_eq!(config.query_datum, Datum::Gcj02);
//! assert!(config.use_index);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod fence_config;

// 重导出核心类型
pub use error::ConfigError;
pub use fence_config::{FenceConfig, LOG_LEVELS};
