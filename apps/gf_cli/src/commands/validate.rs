// geofence\apps\gf_cli\src\commands\validate.rs

//! 配置验证命令
//!
//! 验证配置文件和围栏文件的正确性。

use anyhow::{bail, Context, Result};
use clap::Args;
use gf_config::{FenceConfig, LOG_LEVELS};
use gf_geo::Datum;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::fence_file::{data_lines, parse_fence_line, FenceRecord};

/// 配置文件中可识别的键
const KNOWN_KEYS: [&str; 5] = ["fences", "fence_datum", "query_datum", "use_index", "log_level"];

/// 验证参数
#[derive(Args)]
pub struct ValidateArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 围栏文件路径
    #[arg(short, long)]
    pub fences: Option<PathBuf>,

    /// 严格模式（警告也视为错误）
    #[arg(long)]
    pub strict: bool,
}

/// 问题来源
#[derive(Debug, Clone, PartialEq, Eq)]
enum Origin {
    /// 配置文件
    Config,
    /// 围栏文件整体
    FenceFile,
    /// 围栏文件中的某一行，能解析出名称时附带围栏名称
    Fence { line: usize, name: Option<String> },
}

/// 单条检查问题
#[derive(Debug, Clone)]
struct Issue {
    origin: Origin,
    message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.origin {
            Origin::Config => write!(f, "配置: {}", self.message),
            Origin::FenceFile => write!(f, "围栏文件: {}", self.message),
            Origin::Fence { line, name: Some(name) } => {
                write!(f, "第 {} 行 [{}]: {}", line, name, self.message)
            }
            Origin::Fence { line, name: None } => write!(f, "第 {} 行: {}", line, self.message),
        }
    }
}

/// 验证报告
#[derive(Default)]
struct ValidationReport {
    errors: Vec<Issue>,
    warnings: Vec<Issue>,
    /// 解析成功的围栏数
    fences_ok: usize,
    /// 解析失败的围栏行数
    fences_failed: usize,
}

impl ValidationReport {
    fn error(&mut self, origin: Origin, msg: impl Into<String>) {
        self.errors.push(Issue {
            origin,
            message: msg.into(),
        });
    }

    fn warning(&mut self, origin: Origin, msg: impl Into<String>) {
        self.warnings.push(Issue {
            origin,
            message: msg.into(),
        });
    }

    fn passed(&self, strict: bool) -> bool {
        self.errors.is_empty() && (!strict || self.warnings.is_empty())
    }
}

/// 围栏行的名称（制表符之前的部分），用于给解析失败的行标注名称
fn fence_name(line: &str) -> Option<String> {
    let (name, _) = line.split_once('\t')?;
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// 执行验证命令
pub fn execute(args: ValidateArgs) -> Result<()> {
    info!("=== GeoFence 配置验证 ===");

    if args.config.is_none() && args.fences.is_none() {
        println!("用法: gf_cli validate --config <配置文件> [--fences <围栏文件>]");
        println!("      gf_cli validate --fences <围栏文件>");
        return Ok(());
    }

    let mut report = ValidationReport::default();
    let mut fence_datum = Datum::Bd09;
    let mut fences = args.fences.clone();

    if let Some(config_path) = &args.config {
        if let Some(config) = validate_config(config_path, &mut report)? {
            fence_datum = config.fence_datum;
            if fences.is_none() {
                fences = Some(config.fences);
            }
        }
    }

    if let Some(fences_path) = &fences {
        validate_fences(fences_path, fence_datum, &mut report)?;
    }

    print_report(&report, args.strict)
}

fn validate_config(path: &Path, report: &mut ValidationReport) -> Result<Option<FenceConfig>> {
    println!("\n检查配置文件: {}", path.display());

    if !path.exists() {
        report.error(Origin::Config, format!("文件不存在: {}", path.display()));
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).context("无法读取配置文件")?;

    let json: serde_json::Value = match serde_json::from_str(&content) {
        Ok(v) => v,
        Err(e) => {
            report.error(Origin::Config, format!("JSON 解析错误: {}", e));
            return Ok(None);
        }
    };
    validate_config_fields(&json, report);

    let config = match FenceConfig::from_file(path) {
        Ok(config) => config,
        Err(e) => {
            report.error(Origin::Config, e.to_string());
            return Ok(None);
        }
    };

    if !config.needs_conversion() {
        info!("查询点与围栏坐标系相同 ({})，不做转换", config.fence_datum);
    }
    if !config.use_index {
        report.warning(Origin::Config, "已禁用空间索引，围栏较多时查询会变慢");
    }

    println!("  ✓ 配置文件格式有效");
    Ok(Some(config))
}

fn validate_config_fields(json: &serde_json::Value, report: &mut ValidationReport) {
    let Some(object) = json.as_object() else {
        report.error(Origin::Config, "顶层应为 JSON 对象");
        return;
    };

    for key in object.keys() {
        if !KNOWN_KEYS.contains(&key.as_str()) {
            report.warning(Origin::Config, format!("未知的配置项: {}", key));
        }
    }

    for key in ["fence_datum", "query_datum"] {
        if let Some(value) = object.get(key) {
            match value.as_str() {
                Some(s) if s.parse::<Datum>().is_ok() && s != s.to_lowercase() => {
                    report.warning(Origin::Config, format!("{} = {} 应使用小写", key, s));
                }
                Some(_) => {}
                None => report.error(Origin::Config, format!("{} 字段应为字符串", key)),
            }
        }
    }

    if let Some(level) = object.get("log_level").and_then(|v| v.as_str()) {
        if !LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            report.warning(Origin::Config, format!("未知的日志级别: {}", level));
        }
    }
}

fn validate_fences(path: &Path, datum: Datum, report: &mut ValidationReport) -> Result<()> {
    println!("\n检查围栏文件: {}", path.display());

    if !path.exists() {
        report.error(Origin::FenceFile, format!("文件不存在: {}", path.display()));
        return Ok(());
    }

    let content = std::fs::read_to_string(path).context("无法读取围栏文件")?;

    let mut names = HashSet::new();
    for (line_no, line) in data_lines(&content) {
        match parse_fence_line(line_no, line, datum) {
            Ok(record) => {
                check_record(&record, report);
                if !names.insert(record.name.clone()) {
                    report.warning(record_origin(&record), "围栏名称重复");
                }
                report.fences_ok += 1;
            }
            Err(e) => {
                let origin = Origin::Fence {
                    line: line_no,
                    name: fence_name(line),
                };
                report.error(origin, format!("{:#}", e));
                report.fences_failed += 1;
            }
        }
    }

    if report.fences_ok == 0 && report.fences_failed == 0 {
        report.warning(Origin::FenceFile, "没有任何围栏");
    }

    println!(
        "  ✓ 读取 {} 个有效围栏，{} 行解析失败",
        report.fences_ok, report.fences_failed
    );
    Ok(())
}

fn record_origin(record: &FenceRecord) -> Origin {
    Origin::Fence {
        line: record.line,
        name: Some(record.name.clone()),
    }
}

fn check_record(record: &FenceRecord, report: &mut ValidationReport) {
    if record.declared_vertices != record.vertex_count {
        report.warning(
            record_origin(record),
            format!(
                "声明 {} 个顶点，实际 {} 个",
                record.declared_vertices, record.vertex_count
            ),
        );
    }

    let bbox = record.polygon.bounding_box();
    let env = &record.envelope;
    if !(env.contains_point(bbox.min_corner()) && env.contains_point(bbox.max_corner())) {
        report.warning(record_origin(record), "外包矩形未覆盖全部顶点");
    }
}

fn print_issues(title: &str, issues: &[Issue], symbol: &str) {
    if issues.is_empty() {
        return;
    }
    println!("\n{} ({}):", title, issues.len());
    for issue in issues {
        println!("  {} {}", symbol, issue);
    }
}

fn print_report(report: &ValidationReport, strict: bool) -> Result<()> {
    println!("\n=== 验证结果 ===");

    for issue in &report.errors {
        error!("{}", issue);
    }
    for issue in &report.warnings {
        warn!("{}", issue);
    }
    print_issues("错误", &report.errors, "✗");
    print_issues("警告", &report.warnings, "⚠");

    if report.passed(strict) {
        println!("\n✓ 验证通过");
        Ok(())
    } else {
        println!("\n✗ 验证失败");
        bail!(
            "验证失败：发现 {} 个错误，{} 个警告",
            report.errors.len(),
            report.warnings.len()
        )
    }
}
