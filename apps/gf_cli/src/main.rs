// geofence\apps\gf_cli\src\main.rs

//! GeoFence 命令行界面
//!
//! 提供坐标系转换、百度墨卡托反投影和电子围栏判断的命令行工具。
//! 坐标输出统一为 `纬度,经度`（墨卡托正向投影输出 `x,y`），写到标准输出；日志写到标准错误。

mod commands;
mod fence_file;
mod fence_index;

use clap::{Parser, Subcommand};
use gf_config::FenceConfig;
use std::path::Path;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// GeoFence 坐标转换与电子围栏命令行工具
#[derive(Parser)]
#[command(name = "gf_cli")]
#[command(author = "GeoFence Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "WGS84 / GCJ02 / BD09 coordinate conversion and polygon geofencing", long_about = None)]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)，未指定时取配置文件中的 log_level
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 坐标系转换
    Convert(commands::convert::ConvertArgs),
    /// 百度墨卡托反投影
    Demercator(commands::demercator::DemercatorArgs),
    /// 判断点所在的围栏
    Locate(commands::locate::LocateArgs),
    /// 验证配置
    Validate(commands::validate::ValidateArgs),
}

impl Commands {
    fn config_path(&self) -> Option<&Path> {
        match self {
            Self::Locate(args) => args.config.as_deref(),
            Self::Validate(args) => args.config.as_deref(),
            Self::Convert(_) | Self::Demercator(_) => None,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日志
    let level_name = cli
        .log_level
        .clone()
        .or_else(|| {
            // 配置文件错误留给子命令报告
            let config = FenceConfig::from_file(cli.command.config_path()?).ok()?;
            Some(config.log_level)
        })
        .unwrap_or_else(|| "info".to_string());

    let level = match level_name.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // 执行命令
    match cli.command {
        Commands::Convert(args) => commands::convert::execute(args),
        Commands::Demercator(args) => commands::demercator::execute(args),
        Commands::Locate(args) => commands::locate::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
    }
}
