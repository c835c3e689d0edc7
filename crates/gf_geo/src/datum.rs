// geofence\crates\gf_geo\src\datum.rs

//! 带坐标系标记的经纬度点
//!
//! [`transform`](crate::transform) 中的函数只接受裸 `(纬度, 经度)` 元组，
//! 元组属于哪个坐标系完全由调用方记忆。本模块用零大小标记类型把坐标系
//! 编码进类型：`Wgs84Point` 只能调用 `to_gcj02` / `to_bd09`，
//! 不可能把 GCJ02 坐标误当作 WGS84 再偏移一次。
//!
//! 运行时才知道坐标系的场景（配置文件、命令行参数）使用 [`Datum`] 枚举。
//!
//! # 示例
//!
//! ```
//! use gf_geo::datum::{Bd09Point, Datum};
//!
//! let bd = Bd09Point::new(18.26101537329914, 109.4974007831044);
//! let wgs = bd.to_wgs84();
//! assert_eq!(wgs.to_tuple(), (18.254770497679118, 109.48868774344767));
//!
//! let datum: Datum = "baidu".parse().unwrap();
//! assert_eq!(datum, Datum::Bd09);
//! ```

use crate::error::{GeoError, GeoResult};
use crate::geometry::Point;
use crate::transform;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

// ============================================================================
// Datum - 运行时坐标系
// ============================================================================

/// 坐标系（运行时值）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Datum {
    /// GPS 国际标准
    #[default]
    Wgs84,
    /// 国测局坐标（火星坐标）
    Gcj02,
    /// 百度坐标
    Bd09,
}

impl Datum {
    /// 全部坐标系
    pub const ALL: [Datum; 3] = [Datum::Wgs84, Datum::Gcj02, Datum::Bd09];

    /// 规范名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::Wgs84 => "wgs84",
            Self::Gcj02 => "gcj02",
            Self::Bd09 => "bd09",
        }
    }

    /// 把 `self` 坐标系下的 `(纬度, 经度)` 转换到 `to` 坐标系
    ///
    /// 相同坐标系时原样返回。
    #[must_use]
    pub fn convert(self, to: Datum, lat: f64, lon: f64) -> (f64, f64) {
        use Datum::{Bd09, Gcj02, Wgs84};
        match (self, to) {
            (Wgs84, Wgs84) | (Gcj02, Gcj02) | (Bd09, Bd09) => (lat, lon),
            (Wgs84, Gcj02) => transform::wgs84_to_gcj02(lat, lon),
            (Wgs84, Bd09) => transform::wgs84_to_bd09(lat, lon),
            (Gcj02, Wgs84) => transform::gcj02_to_wgs84(lat, lon),
            (Gcj02, Bd09) => transform::gcj02_to_bd09(lat, lon),
            (Bd09, Wgs84) => transform::bd09_to_wgs84(lat, lon),
            (Bd09, Gcj02) => transform::bd09_to_gcj02(lat, lon),
        }
    }
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 坐标系名称解析错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatumParseError(String);

impl FromStr for Datum {
    type Err = DatumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "wgs84" | "gps" => Ok(Self::Wgs84),
            "gcj02" | "mars" | "amap" => Ok(Self::Gcj02),
            "bd09" | "baidu" => Ok(Self::Bd09),
            _ => Err(DatumParseError(s.to_string())),
        }
    }
}

impl fmt::Display for DatumParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "无效的坐标系: '{}', 期望 'wgs84'、'gcj02' 或 'bd09'",
            self.0
        )
    }
}

impl std::error::Error for DatumParseError {}

// ============================================================================
// 标记类型
// ============================================================================

mod sealed {
    pub trait Sealed {}
}

/// 坐标系标记 trait（不可在 crate 外实现）
pub trait DatumKind:
    sealed::Sealed + Copy + Default + fmt::Debug + PartialEq + Send + Sync + 'static
{
    /// 对应的运行时坐标系
    const DATUM: Datum;
}

/// WGS84 标记
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Wgs84;

/// GCJ02 标记
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Gcj02;

/// BD09 标记
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Bd09;

impl sealed::Sealed for Wgs84 {}
impl sealed::Sealed for Gcj02 {}
impl sealed::Sealed for Bd09 {}

impl DatumKind for Wgs84 {
    const DATUM: Datum = Datum::Wgs84;
}

impl DatumKind for Gcj02 {
    const DATUM: Datum = Datum::Gcj02;
}

impl DatumKind for Bd09 {
    const DATUM: Datum = Datum::Bd09;
}

// ============================================================================
// GeoPoint
// ============================================================================

/// 属于坐标系 `D` 的经纬度点
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint<D: DatumKind> {
    /// 纬度
    pub lat: f64,
    /// 经度
    pub lon: f64,
    _datum: PhantomData<D>,
}

/// WGS84 点
pub type Wgs84Point = GeoPoint<Wgs84>;
/// GCJ02 点
pub type Gcj02Point = GeoPoint<Gcj02>;
/// BD09 点
pub type Bd09Point = GeoPoint<Bd09>;

impl<D: DatumKind> GeoPoint<D> {
    /// 创建点（不做校验）
    #[inline]
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            _datum: PhantomData,
        }
    }

    /// 创建点，拒绝 NaN 和无穷大
    pub fn try_new(lat: f64, lon: f64) -> GeoResult<Self> {
        GeoError::check_finite("纬度", lat)?;
        GeoError::check_finite("经度", lon)?;
        Ok(Self::new(lat, lon))
    }

    /// 所属坐标系
    #[inline]
    pub fn datum(&self) -> Datum {
        D::DATUM
    }

    /// `(纬度, 经度)` 元组
    #[inline]
    pub fn to_tuple(self) -> (f64, f64) {
        (self.lat, self.lon)
    }

    /// 转为平面点（经度为 x，纬度为 y），用于构建多边形
    #[inline]
    pub fn to_point(self) -> Point {
        Point::new(self.lon, self.lat)
    }

    /// 转换到任意坐标系
    #[must_use]
    pub fn convert<T: DatumKind>(self) -> GeoPoint<T> {
        let (lat, lon) = D::DATUM.convert(T::DATUM, self.lat, self.lon);
        GeoPoint::new(lat, lon)
    }
}

impl Wgs84Point {
    /// WGS84 -> GCJ02
    #[must_use]
    pub fn to_gcj02(self) -> Gcj02Point {
        let (lat, lon) = transform::wgs84_to_gcj02(self.lat, self.lon);
        GeoPoint::new(lat, lon)
    }

    /// WGS84 -> BD09
    #[must_use]
    pub fn to_bd09(self) -> Bd09Point {
        let (lat, lon) = transform::wgs84_to_bd09(self.lat, self.lon);
        GeoPoint::new(lat, lon)
    }
}

impl Gcj02Point {
    /// GCJ02 -> WGS84（近似逆变换）
    #[must_use]
    pub fn to_wgs84(self) -> Wgs84Point {
        let (lat, lon) = transform::gcj02_to_wgs84(self.lat, self.lon);
        GeoPoint::new(lat, lon)
    }

    /// GCJ02 -> BD09
    #[must_use]
    pub fn to_bd09(self) -> Bd09Point {
        let (lat, lon) = transform::gcj02_to_bd09(self.lat, self.lon);
        GeoPoint::new(lat, lon)
    }
}

impl Bd09Point {
    /// BD09 -> GCJ02
    #[must_use]
    pub fn to_gcj02(self) -> Gcj02Point {
        let (lat, lon) = transform::bd09_to_gcj02(self.lat, self.lon);
        GeoPoint::new(lat, lon)
    }

    /// BD09 -> WGS84
    #[must_use]
    pub fn to_wgs84(self) -> Wgs84Point {
        let (lat, lon) = transform::bd09_to_wgs84(self.lat, self.lon);
        GeoPoint::new(lat, lon)
    }
}

impl<D: DatumKind> From<GeoPoint<D>> for Point {
    fn from(p: GeoPoint<D>) -> Self {
        p.to_point()
    }
}

impl<D: DatumKind> fmt::Display for GeoPoint<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(lat={}, lon={})", D::DATUM, self.lat, self.lon)
    }
}
