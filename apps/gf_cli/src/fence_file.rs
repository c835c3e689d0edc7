// geofence\apps\gf_cli\src\fence_file.rs

//! 围栏文件读取
//!
//! 每行一个围栏，名称与数据之间以制表符分隔：
//!
//! ```text
//! 名称<TAB>级别|x1,y1;x2,y2|n-x,y,x,y,...;
//! ```
//!
//! - 第二段是百度墨卡托外包矩形的两个角点
//! - 第三段是 `顶点数-` 加展平的墨卡托顶点序列，末尾可带一个 `;`
//!
//! 每个墨卡托坐标经 [`try_mercator_to_bd09`] 反投影为 BD09，再转换到目标坐标系。
//! 空行和 `#` 开头的注释行被跳过。

use anyhow::{anyhow, bail, Context, Result};
use gf_geo::mercator::try_mercator_to_bd09;
use gf_geo::{BoundingBox, Datum, Point, Polygon, PolygonBuilder};
use std::path::Path;
use tracing::debug;

/// 围栏文件中的一条记录
#[derive(Debug, Clone)]
pub struct FenceRecord {
    /// 所在行号（从 1 开始）
    pub line: usize,
    /// 围栏名称
    pub name: String,
    /// 级别字段（原样保留）
    pub level: String,
    /// 文件中声明的外包矩形
    pub envelope: BoundingBox,
    /// 文件中声明的顶点数
    pub declared_vertices: usize,
    /// 实际读到的顶点数
    pub vertex_count: usize,
    /// 围栏多边形
    pub polygon: Polygon,
}

/// 有效数据行：`(行号, 内容)`，跳过空行和注释
pub fn data_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
}

/// 读取围栏文件，顶点转换到 `datum` 坐标系
///
/// 遇到第一条无效记录即返回错误，错误信息带文件名和行号。
pub fn read_fences(path: &Path, datum: Datum) -> Result<Vec<FenceRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("无法读取围栏文件: {}", path.display()))?;

    let mut records = Vec::new();
    for (line_no, line) in data_lines(&content) {
        let record = parse_fence_line(line_no, line, datum)
            .with_context(|| format!("{}:{}", path.display(), line_no))?;
        records.push(record);
    }

    debug!(path = %path.display(), fences = records.len(), %datum, "围栏文件已加载");
    Ok(records)
}

/// 解析一行围栏记录
pub fn parse_fence_line(line_no: usize, line: &str, datum: Datum) -> Result<FenceRecord> {
    let (name, data) = line
        .split_once('\t')
        .ok_or_else(|| anyhow!("缺少制表符分隔的名称"))?;
    let name = name.trim();
    if name.is_empty() {
        bail!("围栏名称为空");
    }

    let fields: Vec<&str> = data.trim().split('|').collect();
    if fields.len() != 3 {
        bail!("应有 3 个以 '|' 分隔的字段，实际 {} 个", fields.len());
    }
    let level = fields[0].trim().to_string();

    let corners = parse_envelope(fields[1], datum)?;
    let mut envelope = BoundingBox::from_point(corners[0]);
    envelope.extend(corners[1]);

    let ring = fields[2].trim();
    let ring = ring.strip_suffix(';').unwrap_or(ring);
    let (count, coords) = ring
        .split_once('-')
        .ok_or_else(|| anyhow!("顶点段缺少 '<顶点数>-' 前缀"))?;
    let declared_vertices: usize = count
        .trim()
        .parse()
        .with_context(|| format!("无效的顶点数: '{}'", count.trim()))?;

    let values = parse_numbers(coords, ',')?;
    if values.len() % 2 != 0 {
        bail!("顶点坐标个数为奇数 ({})", values.len());
    }

    let mut builder = PolygonBuilder::new();
    for pair in values.chunks_exact(2) {
        builder.add_vertex(deproject(pair[0], pair[1], datum)?);
    }
    let vertex_count = builder.ring_len();
    let polygon = builder
        .build()
        .with_context(|| format!("围栏 '{name}' 无法构建多边形"))?;

    Ok(FenceRecord {
        line: line_no,
        name: name.to_string(),
        level,
        envelope,
        declared_vertices,
        vertex_count,
        polygon,
    })
}

/// 外包矩形段 `x1,y1;x2,y2`
fn parse_envelope(field: &str, datum: Datum) -> Result<[Point; 2]> {
    let corners: Vec<&str> = field.trim().split(';').collect();
    if corners.len() != 2 {
        bail!("外包矩形应为两个角点，实际 {} 个", corners.len());
    }

    let mut points = [Point::default(); 2];
    for (slot, corner) in points.iter_mut().zip(&corners) {
        let xy = parse_numbers(corner, ',')?;
        if xy.len() != 2 {
            bail!("无效的角点: '{corner}'");
        }
        *slot = deproject(xy[0], xy[1], datum)?;
    }
    Ok(points)
}

fn parse_numbers(text: &str, sep: char) -> Result<Vec<f64>> {
    text.split(sep)
        .map(|s| -> Result<f64> {
            let s = s.trim();
            let value: f64 = s.parse().with_context(|| format!("无效的数值: '{s}'"))?;
            if !value.is_finite() {
                bail!("无效的数值: '{s}'");
            }
            Ok(value)
        })
        .collect()
}

/// 墨卡托 -> BD09 -> 目标坐标系
fn deproject(x: f64, y: f64, datum: Datum) -> Result<Point> {
    let bd = try_mercator_to_bd09(x, y)?;
    let (lat, lon) = Datum::Bd09.convert(datum, bd.lat, bd.lng);
    Ok(Point::new(lon, lat))
}
