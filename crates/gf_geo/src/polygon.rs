// geofence\crates\gf_geo\src\polygon.rs

//! 多边形构建与点包含判断
//!
//! [`PolygonBuilder`] 按绘制顺序接收顶点，逐边生成 [`Line`] 并扩展 [`BoundingBox`]；
//! [`Polygon`] 构建完成后不可变，可在多线程间无锁共享读取。
//!
//! # 环状态机
//!
//! ```text
//! Empty ──add_vertex──> Open ──close──> Closed ──add_vertex──> Open(新环) ...
//! ```
//!
//! 关闭后再添加顶点会开启一个新环（例如回字形的内环），所有环的边累积到同一个多边形中，
//! 包含判断把所有边当成一个整体做射线奇偶计数，不会单独扣除内环。
//!
//! # 示例
//!
//! ```
//! use gf_geo::geometry::Point;
//! use gf_geo::polygon::PolygonBuilder;
//!
//! let square = PolygonBuilder::new()
//!     .add_vertex_xy(0.0, 0.0)
//!     .add_vertex_xy(0.0, 1.0)
//!     .add_vertex_xy(1.0, 1.0)
//!     .add_vertex_xy(1.0, 0.0)
//!     .build()
//!     .unwrap();
//!
//! assert!(square.contains(Point::new(0.5, 0.5)));
//! assert!(!square.contains(Point::new(2.0, 2.0)));
//! ```

use crate::error::{GeoError, GeoResult};
use crate::geometry::{BoundingBox, Line, Point};
use tracing::{debug, trace};

/// 构建多边形所需的最少顶点数
pub const MIN_VERTICES: usize = 3;

/// 射线起点相对包围盒宽度的外移比例
const RAY_OFFSET_DIVISOR: f64 = 10_000_000.0;

// ============================================================================
// 构建器
// ============================================================================

/// 当前环的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RingState {
    /// 还没有任何顶点
    #[default]
    Empty,
    /// 正在接收顶点
    Open,
    /// 当前环已闭合，下一个顶点将开启新环
    Closed,
}

/// 多边形构建器
///
/// 单线程、单所有者的可变累加器，内部不做同步。
#[derive(Debug, Clone, Default)]
pub struct PolygonBuilder {
    ring: Vec<Point>,
    sides: Vec<Line>,
    bounding_box: Option<BoundingBox>,
    state: RingState,
}

impl PolygonBuilder {
    /// 创建空构建器
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前环的状态
    #[must_use]
    pub fn ring_state(&self) -> RingState {
        self.state
    }

    /// 当前环已接收的顶点数
    #[must_use]
    pub fn ring_len(&self) -> usize {
        self.ring.len()
    }

    /// 已生成的边数（所有环）
    #[must_use]
    pub fn side_count(&self) -> usize {
        self.sides.len()
    }

    /// 添加顶点
    ///
    /// 顶点必须按绘制顺序依次添加。若当前环已闭合，先清空顶点缓冲开始新环。
    pub fn add_vertex(&mut self, point: Point) -> &mut Self {
        if self.state == RingState::Closed {
            self.ring.clear();
        }

        match self.bounding_box.as_mut() {
            Some(bbox) => bbox.extend(point),
            None => self.bounding_box = Some(BoundingBox::from_point(point)),
        }

        if let Some(&previous) = self.ring.last() {
            self.sides.push(Line::new(previous, point));
        }
        self.ring.push(point);
        self.state = RingState::Open;
        self
    }

    /// 以经纬度分量添加顶点
    pub fn add_vertex_xy(&mut self, lng: f64, lat: f64) -> &mut Self {
        self.add_vertex(Point::new(lng, lat))
    }

    /// 闭合当前环：添加一条从最后一个顶点回到第一个顶点的边
    ///
    /// 对已闭合的环重复调用不会再添加边（重复的闭合边会翻转奇偶判断）。
    ///
    /// # Errors
    ///
    /// 当前环少于 3 个顶点时返回 [`GeoError::TooFewVertices`]。
    pub fn close(&mut self) -> GeoResult<&mut Self> {
        self.validate()?;
        if self.state == RingState::Open {
            self.close_ring();
        }
        Ok(self)
    }

    /// 构建不可变多边形
    ///
    /// 若当前环尚未闭合则自动闭合。构建器随后仍可继续使用。
    ///
    /// # Errors
    ///
    /// 当前环少于 3 个顶点时返回 [`GeoError::TooFewVertices`]。
    pub fn build(&mut self) -> GeoResult<Polygon> {
        self.validate()?;
        if self.state == RingState::Open {
            self.close_ring();
        }

        let bounding_box = self.bounding_box.unwrap_or_default();
        debug!(
            sides = self.sides.len(),
            x_min = bounding_box.x_min,
            x_max = bounding_box.x_max,
            y_min = bounding_box.y_min,
            y_max = bounding_box.y_max,
            "多边形构建完成"
        );

        Ok(Polygon {
            sides: self.sides.clone(),
            bounding_box,
        })
    }

    fn close_ring(&mut self) {
        if let (Some(&first), Some(&last)) = (self.ring.first(), self.ring.last()) {
            self.sides.push(Line::new(last, first));
        }
        self.state = RingState::Closed;
        trace!(vertices = self.ring.len(), "环已闭合");
    }

    fn validate(&self) -> GeoResult<()> {
        GeoError::ensure(
            self.ring.len() >= MIN_VERTICES,
            GeoError::too_few_vertices(self.ring.len()),
        )
    }
}

// ============================================================================
// 多边形
// ============================================================================

/// 不可变多边形
///
/// 由首尾相接的边和整体包围盒组成。
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    sides: Vec<Line>,
    bounding_box: BoundingBox,
}

impl Polygon {
    /// 获取构建器
    #[must_use]
    pub fn builder() -> PolygonBuilder {
        PolygonBuilder::new()
    }

    /// 由单个顶点序列直接构建（自动闭合）
    ///
    /// # Errors
    ///
    /// 顶点少于 3 个时返回 [`GeoError::TooFewVertices`]。
    pub fn from_vertices<I>(vertices: I) -> GeoResult<Self>
    where
        I: IntoIterator<Item = Point>,
    {
        let mut builder = PolygonBuilder::new();
        for vertex in vertices {
            builder.add_vertex(vertex);
        }
        builder.build()
    }

    /// 所有边
    #[must_use]
    pub fn sides(&self) -> &[Line] {
        &self.sides
    }

    /// 整体包围盒
    #[must_use]
    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }

    /// 点是否在多边形内
    ///
    /// 先用包围盒快速排除；再从包围盒左下角稍外侧向查询点作射线，
    /// 统计与各边的交点数，奇数即在内部。
    ///
    /// 边上的点按同一规则计数，结果取决于具体几何，而非统一视为"在内"。
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        if !self.bounding_box.contains_point(point) {
            return false;
        }

        let ray = self.create_ray(point);
        let intersections = self
            .sides
            .iter()
            .filter(|side| intersect(&ray, side))
            .count();

        intersections % 2 != 0
    }

    /// 以经纬度分量判断包含
    #[must_use]
    pub fn contains_xy(&self, lng: f64, lat: f64) -> bool {
        self.contains(Point::new(lng, lat))
    }

    // 包围盒宽度为 0 时 epsilon 为 0，射线起点正好落在边界上
    fn create_ray(&self, point: Point) -> Line {
        let epsilon = (self.bounding_box.x_max - self.bounding_box.x_min) / RAY_OFFSET_DIVISOR;
        let outside = Point::new(
            self.bounding_box.x_min - epsilon,
            self.bounding_box.y_min,
        );
        Line::new(outside, point)
    }
}

/// 射线与边是否相交
///
/// 交点需同时落在两条线段各自的范围内才计数；两条竖直线或斜率相同的直线不相交。
fn intersect(ray: &Line, side: &Line) -> bool {
    let crossing = match (ray.is_vertical(), side.is_vertical()) {
        (false, false) => {
            if ray.slope() - side.slope() == 0.0 {
                return false;
            }
            let x = (side.intercept() - ray.intercept()) / (ray.slope() - side.slope());
            let y = side.slope() * x + side.intercept();
            Point::new(x, y)
        }
        (true, false) => {
            let x = ray.start().lng;
            Point::new(x, side.slope() * x + side.intercept())
        }
        (false, true) => {
            let x = side.start().lng;
            Point::new(x, ray.slope() * x + ray.intercept())
        }
        (true, true) => return false,
    };

    side.is_inside(crossing) && ray.is_inside(crossing)
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Polygon {
        Polygon::from_vertices([
            Point::new(0.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_builder_state_machine() {
        let mut builder = PolygonBuilder::new();
        assert_eq!(builder.ring_state(), RingState::Empty);

        builder.add_vertex_xy(0.0, 0.0);
        assert_eq!(builder.ring_state(), RingState::Open);
        builder.add_vertex_xy(0.0, 1.0).add_vertex_xy(1.0, 1.0);
        assert_eq!(builder.side_count(), 2);

        builder.close().unwrap();
        assert_eq!(builder.ring_state(), RingState::Closed);
        assert_eq!(builder.side_count(), 3);

        // 新环从空缓冲开始，不会与上一环连边
        builder.add_vertex_xy(5.0, 5.0);
        assert_eq!(builder.ring_state(), RingState::Open);
        assert_eq!(builder.ring_len(), 1);
        assert_eq!(builder.side_count(), 3);
    }

    #[test]
    fn test_close_requires_three_vertices() {
        let mut builder = PolygonBuilder::new();
        builder.add_vertex_xy(0.0, 0.0).add_vertex_xy(1.0, 1.0);
        let err = builder.close().unwrap_err();
        assert_eq!(err, GeoError::TooFewVertices { count: 2 });
    }

    #[test]
    fn test_build_with_two_vertices_fails() {
        let mut builder = PolygonBuilder::new();
        builder.add_vertex_xy(0.0, 0.0).add_vertex_xy(1.0, 0.0);
        assert!(matches!(
            builder.build(),
            Err(GeoError::TooFewVertices { count: 2 })
        ));
    }

    #[test]
    fn test_build_empty_fails() {
        assert!(matches!(
            PolygonBuilder::new().build(),
            Err(GeoError::TooFewVertices { count: 0 })
        ));
    }

    #[test]
    fn test_new_ring_with_too_few_vertices_fails() {
        let mut builder = PolygonBuilder::new();
        builder
            .add_vertex_xy(0.0, 0.0)
            .add_vertex_xy(0.0, 1.0)
            .add_vertex_xy(1.0, 1.0);
        builder.close().unwrap();
        builder.add_vertex_xy(0.2, 0.2).add_vertex_xy(0.3, 0.3);
        assert!(builder.build().is_err());
    }

    #[test]
    fn test_double_close_adds_single_side() {
        let mut builder = PolygonBuilder::new();
        builder
            .add_vertex_xy(0.0, 0.0)
            .add_vertex_xy(0.0, 1.0)
            .add_vertex_xy(1.0, 1.0);
        builder.close().unwrap();
        builder.close().unwrap();
        assert_eq!(builder.side_count(), 3);
    }

    #[test]
    fn test_build_auto_closes() {
        let polygon = unit_square();
        let sides = polygon.sides();
        assert_eq!(sides.len(), 4);
        assert_eq!(sides[3].start(), Point::new(1.0, 0.0));
        assert_eq!(sides[3].end(), Point::new(0.0, 0.0));
        // 相邻边首尾相接
        for pair in sides.windows(2) {
            assert_eq!(pair[0].end(), pair[1].start());
        }
    }

    #[test]
    fn test_build_after_close_does_not_duplicate_side() {
        let mut builder = PolygonBuilder::new();
        builder
            .add_vertex_xy(0.0, 0.0)
            .add_vertex_xy(0.0, 1.0)
            .add_vertex_xy(1.0, 1.0);
        builder.close().unwrap();
        assert_eq!(builder.build().unwrap().sides().len(), 3);
    }

    #[test]
    fn test_polygon_with_vertical_sides_equals_itself() {
        let polygon = unit_square();
        assert!(polygon.sides().iter().any(Line::is_vertical));
        assert_eq!(polygon, polygon.clone());
        assert_eq!(polygon, unit_square());
    }

    #[test]
    fn test_bounding_box_accumulates() {
        let polygon = unit_square();
        let bbox = polygon.bounding_box();
        assert_eq!(bbox.x_min, 0.0);
        assert_eq!(bbox.x_max, 1.0);
        assert_eq!(bbox.y_min, 0.0);
        assert_eq!(bbox.y_max, 1.0);
    }

    #[test]
    fn test_unit_square_contains() {
        let square = unit_square();
        assert!(square.contains(Point::new(0.5, 0.5)));
        assert!(square.contains(Point::new(0.25, 0.75)));
        assert!(square.contains(Point::new(0.999, 0.001)));
        assert!(!square.contains(Point::new(2.0, 2.0)));
        assert!(!square.contains_xy(-0.5, 0.5));
    }

    #[test]
    fn test_unit_square_boundary_points_follow_parity() {
        let square = unit_square();
        // 左边和下边上的点各与射线恰好相交一次
        assert!(square.contains(Point::new(0.0, 0.5)));
        assert!(square.contains(Point::new(0.5, 0.0)));
        assert!(square.contains(Point::new(0.0, 0.0)));
        // 右边和上边上的点相交次数为偶数
        assert!(!square.contains(Point::new(1.0, 0.5)));
        assert!(!square.contains(Point::new(0.5, 1.0)));
        assert!(!square.contains(Point::new(1.0, 1.0)));
    }

    #[test]
    fn test_concave_polygon() {
        // 顶部有 V 形缺口
        let polygon = Polygon::from_vertices([
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
            Point::new(2.0, 2.0),
            Point::new(0.0, 4.0),
        ])
        .unwrap();

        assert!(polygon.contains(Point::new(1.0, 1.0)));
        assert!(polygon.contains(Point::new(3.0, 1.0)));
        assert!(polygon.contains(Point::new(2.0, 1.99)));
        assert!(!polygon.contains(Point::new(2.0, 3.0)));
        assert!(!polygon.contains(Point::new(1.0, 3.5)));
    }

    #[test]
    fn test_two_rings_share_parity() {
        let mut builder = PolygonBuilder::new();
        builder
            .add_vertex_xy(0.0, 0.0)
            .add_vertex_xy(0.0, 10.0)
            .add_vertex_xy(10.0, 10.0)
            .add_vertex_xy(10.0, 0.0);
        builder.close().unwrap();
        builder
            .add_vertex_xy(4.0, 4.0)
            .add_vertex_xy(4.0, 6.0)
            .add_vertex_xy(6.0, 6.0)
            .add_vertex_xy(6.0, 4.0);
        let donut = builder.build().unwrap();

        assert_eq!(donut.sides().len(), 8);
        assert!(donut.contains(Point::new(2.0, 2.0)));
        assert!(donut.contains(Point::new(8.0, 5.0)));
        assert!(donut.contains(Point::new(5.0, 8.0)));
        // 内环中的点射线穿过两个环，计数为偶数
        assert!(!donut.contains(Point::new(5.0, 5.0)));
        assert!(!donut.contains(Point::new(4.0, 5.0)));
    }

    #[test]
    fn test_zero_width_polygon() {
        let polygon = Polygon::from_vertices([
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(0.0, 5.0),
        ])
        .unwrap();
        assert_eq!(polygon.bounding_box().width(), 0.0);
        assert!(!polygon.contains(Point::new(0.0, 2.0)));
        assert!(!polygon.contains(Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_intersect_parallel_lines() {
        let a = Line::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
        let b = Line::new(Point::new(0.0, 1.0), Point::new(1.0, 2.0));
        assert!(!intersect(&a, &b));
    }

    #[test]
    fn test_intersect_both_vertical() {
        let a = Line::new(Point::new(0.0, 0.0), Point::new(0.0, 1.0));
        let b = Line::new(Point::new(0.0, 0.5), Point::new(0.0, 2.0));
        assert!(!intersect(&a, &b));
    }

    #[test]
    fn test_intersect_vertical_ray() {
        let ray = Line::new(Point::new(1.0, -1.0), Point::new(1.0, 3.0));
        let side = Line::new(Point::new(0.0, 1.0), Point::new(2.0, 1.0));
        assert!(intersect(&ray, &side));

        let short_side = Line::new(Point::new(2.0, 1.0), Point::new(3.0, 1.0));
        assert!(!intersect(&ray, &short_side));
    }

    #[test]
    fn test_polygon_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Polygon>();
    }
}
