// geofence\crates\gf_geo\src\lib.rs
//! GeoFence 地理计算引擎
//!
//! 提供中国常用坐标系互转与多边形电子围栏判断。
//!
//! # 模块
//!
//! - `transform`: WGS84 / GCJ02 / BD09 互转（纯函数，`(纬度, 经度)` 元组）
//! - `datum`: 带坐标系标记的类型安全坐标点，以及运行时坐标系枚举
//! - `mercator`: 百度墨卡托投影坐标与 BD09 经纬度互转
//! - `geometry`: 几何原语 (Point, Line, BoundingBox)
//! - `polygon`: 多边形构建器与射线法包含判断
//! - `error`: 错误类型
//!
//! # 示例
//!
//! ```
//! use gf_geo::prelude::*;
//!
//! // 百度坐标 -> GPS 坐标
//! let wgs = Bd09Point::new(18.26101537329914, 109.4974007831044).to_wgs84();
//!
//! // 围栏以 WGS84 顶点构建
//! let fence = Polygon::builder()
//!     .add_vertex_xy(109.48, 18.25)
//!     .add_vertex_xy(109.48, 18.26)
//!     .add_vertex_xy(109.50, 18.26)
//!     .add_vertex_xy(109.50, 18.25)
//!     .build()
//!     .unwrap();
//!
//! assert!(fence.contains(wgs.to_point()));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod datum;
pub mod error;
pub mod geometry;
pub mod mercator;
pub mod polygon;
pub mod transform;

/// 预导入模块
pub mod prelude {
    pub use crate::datum::{Bd09Point, Datum, Gcj02Point, GeoPoint, Wgs84Point};
    pub use crate::error::{GeoError, GeoResult};
    pub use crate::geometry::{BoundingBox, Line, Point};
    pub use crate::polygon::{Polygon, PolygonBuilder, RingState};
}

// 重导出常用类型
pub use datum::{Bd09, Bd09Point, Datum, DatumKind, Gcj02, Gcj02Point, GeoPoint, Wgs84, Wgs84Point};
pub use error::{GeoError, GeoResult};
pub use geometry::{BoundingBox, Line, Point};
pub use polygon::{Polygon, PolygonBuilder, RingState};
