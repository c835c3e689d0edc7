// geofence\apps\gf_cli\src\commands\demercator.rs

//! 百度墨卡托反投影命令

use anyhow::{Context, Result};
use clap::Args;
use gf_geo::mercator::{bd09_to_mercator, try_mercator_to_bd09};
use gf_geo::Datum;
use tracing::info;

/// 反投影参数
#[derive(Args)]
pub struct DemercatorArgs {
    /// 墨卡托 x
    #[arg(allow_negative_numbers = true)]
    pub x: f64,

    /// 墨卡托 y
    #[arg(allow_negative_numbers = true)]
    pub y: f64,

    /// 输出坐标系
    #[arg(short, long, default_value = "bd09")]
    pub to: Datum,

    /// 改为正向投影：参数视为 BD09 的经度、纬度，输出墨卡托 `x,y`
    #[arg(long)]
    pub forward: bool,
}

/// 执行反投影命令
pub fn execute(args: DemercatorArgs) -> Result<()> {
    if args.forward {
        let mc = bd09_to_mercator(args.x, args.y)
            .with_context(|| format!("无法投影 BD09 坐标 ({}, {})", args.x, args.y))?;
        info!("bd09 -> 百度墨卡托");
        println!("{},{}", mc.lng, mc.lat);
        return Ok(());
    }

    let bd = try_mercator_to_bd09(args.x, args.y)?;
    let (lat, lon) = Datum::Bd09.convert(args.to, bd.lat, bd.lng);
    info!("百度墨卡托 -> {}", args.to);
    println!("{lat},{lon}");
    Ok(())
}
