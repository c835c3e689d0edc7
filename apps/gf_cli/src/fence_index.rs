// geofence\apps\gf_cli\src\fence_index.rs
//! 围栏空间索引
//!
//! 以各围栏多边形的包围盒建立 R-tree。查询时先取包围盒覆盖查询点的候选围栏，
//! 再逐个做射线法精确判断。

use gf_geo::{BoundingBox, Point, Polygon};
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::fence_file::FenceRecord;

/// 命名围栏
#[derive(Debug, Clone)]
pub struct Fence {
    /// 名称
    pub name: String,
    /// 级别
    pub level: String,
    /// 多边形
    pub polygon: Polygon,
}

impl From<FenceRecord> for Fence {
    fn from(record: FenceRecord) -> Self {
        Self {
            name: record.name,
            level: record.level,
            polygon: record.polygon,
        }
    }
}

// ============================================================================
// R-tree 条目
// ============================================================================

/// 围栏包围盒条目
#[derive(Debug, Clone)]
struct FenceEnvelope {
    /// 围栏在 `FenceIndex::fences` 中的位置
    fence: usize,
    bbox: BoundingBox,
}

impl RTreeObject for FenceEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.bbox.x_min, self.bbox.y_min],
            [self.bbox.x_max, self.bbox.y_max],
        )
    }
}

impl PointDistance for FenceEnvelope {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = if point[0] < self.bbox.x_min {
            self.bbox.x_min - point[0]
        } else if point[0] > self.bbox.x_max {
            point[0] - self.bbox.x_max
        } else {
            0.0
        };

        let dy = if point[1] < self.bbox.y_min {
            self.bbox.y_min - point[1]
        } else if point[1] > self.bbox.y_max {
            point[1] - self.bbox.y_max
        } else {
            0.0
        };

        dx * dx + dy * dy
    }

    fn contains_point(&self, point: &[f64; 2]) -> bool {
        self.bbox.contains_point(Point::new(point[0], point[1]))
    }
}

// ============================================================================
// FenceIndex
// ============================================================================

/// 围栏集合及其 R-tree 索引
pub struct FenceIndex {
    fences: Vec<Fence>,
    tree: RTree<FenceEnvelope>,
}

impl FenceIndex {
    /// 批量构建索引
    pub fn new(fences: Vec<Fence>) -> Self {
        let entries = fences
            .iter()
            .enumerate()
            .map(|(fence, f)| FenceEnvelope {
                fence,
                bbox: *f.polygon.bounding_box(),
            })
            .collect();
        Self {
            fences,
            tree: RTree::bulk_load(entries),
        }
    }

    /// 围栏数量
    pub fn len(&self) -> usize {
        self.fences.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.fences.is_empty()
    }

    /// 包围盒覆盖 `point` 的候选围栏（按文件顺序）
    pub fn candidates(&self, point: Point) -> Vec<&Fence> {
        let mut hits: Vec<usize> = self
            .tree
            .locate_all_at_point(&[point.lng, point.lat])
            .map(|entry| entry.fence)
            .collect();
        hits.sort_unstable();
        hits.into_iter().map(|i| &self.fences[i]).collect()
    }

    /// 包含 `point` 的围栏（先查索引再精确判断）
    pub fn locate(&self, point: Point) -> Vec<&Fence> {
        self.candidates(point)
            .into_iter()
            .filter(|fence| fence.polygon.contains(point))
            .collect()
    }

    /// 不使用索引，逐个判断所有围栏
    pub fn locate_linear(&self, point: Point) -> Vec<&Fence> {
        self.fences
            .iter()
            .filter(|fence| fence.polygon.contains(point))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(name: &str, x0: f64, y0: f64, size: f64) -> Fence {
        let polygon = Polygon::from_vertices([
            Point::new(x0, y0),
            Point::new(x0, y0 + size),
            Point::new(x0 + size, y0 + size),
            Point::new(x0 + size, y0),
        ])
        .unwrap();
        Fence {
            name: name.to_string(),
            level: "1".to_string(),
            polygon,
        }
    }

    fn triangle(name: &str) -> Fence {
        // 斜边 y = x 以上为外部
        let polygon = Polygon::from_vertices([
            Point::new(20.0, 20.0),
            Point::new(30.0, 20.0),
            Point::new(30.0, 30.0),
        ])
        .unwrap();
        Fence {
            name: name.to_string(),
            level: "2".to_string(),
            polygon,
        }
    }

    fn names(fences: &[&Fence]) -> Vec<String> {
        fences.iter().map(|f| f.name.clone()).collect()
    }

    fn sample_index() -> FenceIndex {
        FenceIndex::new(vec![
            square("A", 0.0, 0.0, 10.0),
            square("B", 5.0, 5.0, 10.0),
            square("C", 100.0, 100.0, 1.0),
            triangle("T"),
        ])
    }

    #[test]
    fn test_len() {
        let index = sample_index();
        assert_eq!(index.len(), 4);
        assert!(!index.is_empty());
        assert!(FenceIndex::new(Vec::new()).is_empty());
    }

    #[test]
    fn test_candidates_by_envelope() {
        let index = sample_index();
        assert_eq!(names(&index.candidates(Point::new(7.0, 7.0))), ["A", "B"]);
        assert_eq!(names(&index.candidates(Point::new(2.0, 2.0))), ["A"]);
        assert!(index.candidates(Point::new(50.0, 50.0)).is_empty());
        // 包围盒闭区间
        assert_eq!(names(&index.candidates(Point::new(101.0, 101.0))), ["C"]);
    }

    #[test]
    fn test_locate_filters_by_polygon() {
        let index = sample_index();
        // 在三角形包围盒内但在斜边外侧
        let outside = Point::new(22.0, 28.0);
        assert_eq!(names(&index.candidates(outside)), ["T"]);
        assert!(index.locate(outside).is_empty());

        let inside = Point::new(28.0, 22.0);
        assert_eq!(names(&index.locate(inside)), ["T"]);
    }

    #[test]
    fn test_locate_matches_linear() {
        let index = sample_index();
        let points = [
            Point::new(7.0, 7.0),
            Point::new(2.0, 2.0),
            Point::new(12.0, 12.0),
            Point::new(100.5, 100.5),
            Point::new(28.0, 22.0),
            Point::new(22.0, 28.0),
            Point::new(-1.0, -1.0),
        ];
        for p in points {
            assert_eq!(names(&index.locate(p)), names(&index.locate_linear(p)), "{p}");
        }
    }

    #[test]
    fn test_envelope_distance() {
        let entry = FenceEnvelope {
            fence: 0,
            bbox: *square("A", 0.0, 0.0, 10.0).polygon.bounding_box(),
        };
        assert_eq!(entry.distance_2(&[5.0, 5.0]), 0.0);
        assert!((entry.distance_2(&[13.0, 14.0]) - 25.0).abs() < 1e-12);
        assert!(entry.contains_point(&[10.0, 0.0]));
        assert!(!entry.contains_point(&[10.5, 0.0]));
    }
}
