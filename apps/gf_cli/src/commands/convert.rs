// geofence\apps\gf_cli\src\commands\convert.rs

//! 坐标系转换命令
//!
//! 输出 `纬度,经度`，保留完整的双精度位数。

use anyhow::{Context, Result};
use clap::Args;
use gf_geo::{Datum, GeoError};
use tracing::{info, warn};

/// 转换参数
#[derive(Args)]
pub struct ConvertArgs {
    /// 源坐标系 (wgs84/gps, gcj02/mars/amap, bd09/baidu)
    #[arg(short, long)]
    pub from: Datum,

    /// 目标坐标系
    #[arg(short, long)]
    pub to: Datum,

    /// 纬度
    #[arg(allow_negative_numbers = true)]
    pub lat: f64,

    /// 经度
    #[arg(allow_negative_numbers = true)]
    pub lon: f64,
}

/// 执行转换命令
pub fn execute(args: ConvertArgs) -> Result<()> {
    GeoError::check_finite("纬度", args.lat)
        .and_then(|()| GeoError::check_finite("经度", args.lon))
        .context("输入坐标无效")?;

    if args.from != args.to && gf_geo::transform::out_of_china(args.lat, args.lon) {
        warn!(lat = args.lat, lon = args.lon, "坐标在中国境外，GCJ02 偏移不生效");
    }

    let (lat, lon) = args.from.convert(args.to, args.lat, args.lon);
    info!("{} -> {}", args.from, args.to);
    println!("{lat},{lon}");
    Ok(())
}
