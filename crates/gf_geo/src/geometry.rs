// geofence\crates\gf_geo\src\geometry.rs

//! 几何类型定义
//!
//! 提供多边形包含判断所需的平面几何原语：
//!
//! - [`Point`]: 经纬度点（不可变值类型）
//! - [`Line`]: 有向线段，派生斜率/截距或标记为竖直线
//! - [`BoundingBox`]: 由顶点流逐步扩展的轴对齐包围盒
//!
//! 所有类型都按值使用，精确浮点比较（无容差），调用方需要自行量化。

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Point - 经纬度点
// ============================================================================

/// 经纬度点
///
/// `lng` 对应平面 x 轴，`lat` 对应平面 y 轴。相等比较为精确浮点比较。
///
/// # 示例
///
/// ```
/// use gf_geo::geometry::Point;
///
/// let p = Point::new(116.404, 39.915);
/// assert_eq!(p.lng, 116.404);
/// assert_eq!(p, Point::from((116.404, 39.915)));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// 经度（x）
    pub lng: f64,
    /// 纬度（y）
    pub lat: f64,
}

impl Point {
    /// 创建新的点
    #[inline]
    #[must_use]
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

impl From<(f64, f64)> for Point {
    fn from((lng, lat): (f64, f64)) -> Self {
        Self::new(lng, lat)
    }
}

impl From<[f64; 2]> for Point {
    fn from(arr: [f64; 2]) -> Self {
        Self::new(arr[0], arr[1])
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Point(lng={}, lat={})", self.lng, self.lat)
    }
}

// ============================================================================
// Line - 有向线段
// ============================================================================

/// 有向线段
///
/// 构造时派生直线方程 `lat = slope * lng + intercept`；
/// 起止点经度相同时为竖直线，此时斜率和截距均为 NaN。
/// 相等性只比较起止点，其余字段由起止点决定。
#[derive(Clone, Copy, Debug)]
pub struct Line {
    start: Point,
    end: Point,
    slope: f64,
    intercept: f64,
    vertical: bool,
}

impl Line {
    /// 由起点和终点创建线段
    #[must_use]
    pub fn new(start: Point, end: Point) -> Self {
        let dx = end.lng - start.lng;
        if dx != 0.0 {
            let slope = (end.lat - start.lat) / dx;
            let intercept = start.lat - slope * start.lng;
            Self {
                start,
                end,
                slope,
                intercept,
                vertical: false,
            }
        } else {
            Self {
                start,
                end,
                slope: f64::NAN,
                intercept: f64::NAN,
                vertical: true,
            }
        }
    }

    /// 起点
    #[inline]
    #[must_use]
    pub fn start(&self) -> Point {
        self.start
    }

    /// 终点
    #[inline]
    #[must_use]
    pub fn end(&self) -> Point {
        self.end
    }

    /// 斜率（竖直线为 NaN）
    #[inline]
    #[must_use]
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// 截距（竖直线为 NaN）
    #[inline]
    #[must_use]
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// 是否为竖直线（平行于纬度轴）
    #[inline]
    #[must_use]
    pub fn is_vertical(&self) -> bool {
        self.vertical
    }

    /// 点是否落在线段自身的轴对齐范围内（四边均为闭区间）
    ///
    /// 这只是范围检查而不是严格的"点在线段上"判断，
    /// 只有在点已经是两条直线的交点时才有意义。
    #[must_use]
    pub fn is_inside(&self, point: Point) -> bool {
        let max_x = self.start.lng.max(self.end.lng);
        let min_x = self.start.lng.min(self.end.lng);
        let max_y = self.start.lat.max(self.end.lat);
        let min_y = self.start.lat.min(self.end.lat);

        point.lng >= min_x && point.lng <= max_x && point.lat >= min_y && point.lat <= max_y
    }
}

impl PartialEq for Line {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

// ============================================================================
// BoundingBox - 包围盒
// ============================================================================

/// 轴对齐包围盒
///
/// 在加入第一个顶点之前所有边界均为 `-∞`（哨兵值，见 [`BoundingBox::EMPTY`]）。
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// 最小经度
    pub x_min: f64,
    /// 最大经度
    pub x_max: f64,
    /// 最小纬度
    pub y_min: f64,
    /// 最大纬度
    pub y_max: f64,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl BoundingBox {
    /// 未初始化的包围盒
    pub const EMPTY: Self = Self {
        x_min: f64::NEG_INFINITY,
        x_max: f64::NEG_INFINITY,
        y_min: f64::NEG_INFINITY,
        y_max: f64::NEG_INFINITY,
    };

    /// 由单个点创建退化包围盒
    #[must_use]
    pub const fn from_point(point: Point) -> Self {
        Self {
            x_min: point.lng,
            x_max: point.lng,
            y_min: point.lat,
            y_max: point.lat,
        }
    }

    /// 用新的点扩展包围盒
    pub fn extend(&mut self, point: Point) {
        if point.lng > self.x_max {
            self.x_max = point.lng;
        } else if point.lng < self.x_min {
            self.x_min = point.lng;
        }
        if point.lat > self.y_max {
            self.y_max = point.lat;
        } else if point.lat < self.y_min {
            self.y_min = point.lat;
        }
    }

    /// 点是否在包围盒内（闭区间）
    #[must_use]
    pub fn contains_point(&self, point: Point) -> bool {
        !(point.lng < self.x_min
            || point.lng > self.x_max
            || point.lat < self.y_min
            || point.lat > self.y_max)
    }

    /// 经度方向宽度
    #[must_use]
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// 纬度方向高度
    #[must_use]
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// 左下角
    #[must_use]
    pub fn min_corner(&self) -> Point {
        Point::new(self.x_min, self.y_min)
    }

    /// 右上角
    #[must_use]
    pub fn max_corner(&self) -> Point {
        Point::new(self.x_max, self.y_max)
    }
}

// ============================================================================
// 测试
// ============================================================================
