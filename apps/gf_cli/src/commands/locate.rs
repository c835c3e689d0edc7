// geofence\apps\gf_cli\src\commands\locate.rs

//! 围栏判断命令
//!
//! 加载围栏文件，把查询点转换到围栏坐标系，输出包含该点的围栏（`名称<TAB>级别`，每行一个）。

use anyhow::{bail, Context, Result};
use clap::Args;
use gf_config::FenceConfig;
use gf_geo::{Datum, GeoError, Point};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::fence_file::read_fences;
use crate::fence_index::{Fence, FenceIndex};

/// 围栏判断参数
#[derive(Args)]
pub struct LocateArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 围栏文件路径（覆盖配置文件中的 fences）
    #[arg(short, long)]
    pub fences: Option<PathBuf>,

    /// 查询点纬度
    #[arg(allow_negative_numbers = true)]
    pub lat: f64,

    /// 查询点经度
    #[arg(allow_negative_numbers = true)]
    pub lon: f64,

    /// 查询点坐标系（覆盖配置文件中的 query_datum）
    #[arg(short, long)]
    pub datum: Option<Datum>,

    /// 不使用空间索引，逐个判断
    #[arg(long)]
    pub no_index: bool,
}

/// 执行围栏判断命令
pub fn execute(args: LocateArgs) -> Result<()> {
    let config = resolve_config(&args)?;
    let point = query_point(&config, args.lat, args.lon)?;

    let start = Instant::now();
    let records = read_fences(&config.fences, config.fence_datum)?;
    let index = FenceIndex::new(records.into_iter().map(Fence::from).collect());
    info!(
        fences = index.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "围栏已加载"
    );
    if index.is_empty() {
        warn!(path = %config.fences.display(), "围栏文件中没有任何围栏");
    }

    let use_index = config.use_index && !args.no_index;
    let hits = if use_index {
        debug!(candidates = index.candidates(point).len(), "索引筛选");
        index.locate(point)
    } else {
        index.locate_linear(point)
    };

    if hits.is_empty() {
        info!("{} 未命中任何围栏", point);
    }
    for fence in hits {
        println!("{}\t{}", fence.name, fence.level);
    }
    Ok(())
}

/// 合并配置文件与命令行参数
fn resolve_config(args: &LocateArgs) -> Result<FenceConfig> {
    let mut config = match (&args.config, &args.fences) {
        (Some(path), _) => FenceConfig::from_file(path)
            .with_context(|| format!("无法加载配置文件: {}", path.display()))?,
        (None, Some(fences)) => FenceConfig::with_fences(fences),
        (None, None) => bail!("需要指定 --config 或 --fences"),
    };

    if let Some(fences) = &args.fences {
        config.fences = fences.clone();
    }
    if let Some(datum) = args.datum {
        config.query_datum = datum;
    }
    config.validate()?;
    Ok(config)
}

/// 查询点转换到围栏坐标系
fn query_point(config: &FenceConfig, lat: f64, lon: f64) -> Result<Point> {
    GeoError::check_finite("纬度", lat)?;
    GeoError::check_finite("经度", lon)?;

    let (lat, lon) = config.to_fence_datum(lat, lon);
    debug!(
        from = %config.query_datum,
        to = %config.fence_datum,
        lat,
        lon,
        "查询点已转换"
    );
    Ok(Point::new(lon, lat))
}
