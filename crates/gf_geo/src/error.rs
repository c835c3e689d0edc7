// geofence\crates\gf_geo\src\error.rs

//! 地理计算错误类型
//!
//! 包含多边形构建、百度墨卡托反投影和坐标校验相关的错误。
//!
//! # 错误分类
//!
//! - **构建错误**：多边形顶点不足 3 个
//! - **查表错误**：墨卡托纬度不落在任何系数带内
//! - **校验错误**：坐标为 NaN 或无穷大
//!
//! 坐标系转换函数本身是全函数，不会返回错误；NaN/Inf 输入会原样传播。

use thiserror::Error;

/// Geo 模块结果类型
pub type GeoResult<T> = Result<T, GeoError>;

/// 地理计算错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    /// 多边形顶点不足
    #[error("polygon must have at least 3 points (当前环只有 {count} 个顶点)")]
    TooFewVertices {
        /// 当前环的顶点数
        count: usize,
    },

    /// 墨卡托坐标不在任何纬度带内
    #[error("墨卡托坐标 ({x}, {y}) 不在任何纬度带内，无法反投影")]
    MercatorOutOfBand {
        /// 墨卡托 x
        x: f64,
        /// 墨卡托 y
        y: f64,
    },

    /// 坐标值无效（NaN 或无穷大）
    #[error("无效的{name}: {value}")]
    InvalidCoordinate {
        /// 坐标名称（如"纬度"、"经度"）
        name: &'static str,
        /// 实际值
        value: f64,
    },
}

impl GeoError {
    /// 创建顶点不足错误
    #[inline]
    pub fn too_few_vertices(count: usize) -> Self {
        Self::TooFewVertices { count }
    }

    /// 创建墨卡托查表失败错误
    #[inline]
    pub fn mercator_out_of_band(x: f64, y: f64) -> Self {
        Self::MercatorOutOfBand { x, y }
    }

    /// 创建无效坐标错误
    #[inline]
    pub fn invalid_coordinate(name: &'static str, value: f64) -> Self {
        Self::InvalidCoordinate { name, value }
    }

    /// 检查条件，不满足则返回错误
    #[inline]
    pub fn ensure(cond: bool, err: Self) -> Result<(), Self> {
        if cond {
            Ok(())
        } else {
            Err(err)
        }
    }

    /// 验证坐标是有限值
    #[inline]
    pub fn check_finite(name: &'static str, value: f64) -> Result<(), Self> {
        Self::ensure(value.is_finite(), Self::invalid_coordinate(name, value))
    }
}
