// geofence\crates\gf_geo\src\mercator.rs

//! 百度墨卡托坐标与 BD09 经纬度互转
//!
//! 百度地图内部使用一种分纬度带拟合的墨卡托投影，接口返回的 `(x, y)`
//! 是以米为单位的投影坐标。本模块用两张 6×10 系数表做分段多项式逼近：
//!
//! - `MC2LL`：墨卡托 -> BD09，按 `MCBAND` 选带，结果保留 6 位小数
//! - `LL2MC`：BD09 -> 墨卡托，按 `LLBAND` 选带，结果保留 2 位小数
//!
//! 保留小数的步骤必须是"先按定点格式舍入，再解析回浮点"，
//! 下游参考数据依赖这一结果，不能改成直接返回原始双精度值。
//!
//! # 示例
//!
//! ```
//! use gf_geo::mercator::{bd09_to_mercator, mercator_to_bd09};
//! use gf_geo::geometry::Point;
//!
//! let bd = mercator_to_bd09(12958160.97, 4825923.77).unwrap();
//! assert_eq!(bd, Point::new(116.403874, 39.915));
//!
//! let mc = bd09_to_mercator(116.404, 39.915).unwrap();
//! assert_eq!(mc, Point::new(12958175.0, 4825923.77));
//!
//! // 南纬墨卡托 y 不在任何系数带内
//! assert!(mercator_to_bd09(1.0, -5.0).is_none());
//! ```

use crate::error::{GeoError, GeoResult};
use crate::geometry::Point;
use tracing::debug;

/// 墨卡托 y 方向的纬度带下界
pub const MCBAND: [f64; 6] = [1.289059486e7, 8362377.87, 5591021.0, 3481989.83, 1678043.12, 0.0];

/// 纬度带下界（度）
pub const LLBAND: [f64; 6] = [75.0, 60.0, 45.0, 30.0, 15.0, 0.0];

/// 正向投影的纬度截断范围
const LAT_LIMIT: f64 = 74.0;

/// 反投影输出小数位数
const MC2LL_DECIMALS: u32 = 6;

/// 正向投影输出小数位数
const LL2MC_DECIMALS: u32 = 2;

/// 有限 `f64` 的十进制展开最多 1074 位小数
pub const MAX_EXACT_DECIMALS: u32 = 1074;

#[rustfmt::skip]
#[allow(clippy::excessive_precision, clippy::unreadable_literal)]
const MC2LL: [[f64; 10]; 6] = [
    [1.410526172116255e-8, 8.98305509648872e-6, -1.9939833816331, 200.9824383106796, -187.2403703815547, 91.6087516669843, -23.38765649603339, 2.57121317296198, -0.03801003308653, 1.73379812e7],
    [-7.435856389565537e-9, 8.983055097726239e-6, -0.78625201886289, 96.32687599759846, -1.85204757529826, -59.36935905485877, 47.40033549296737, -16.50741931063887, 2.28786674699375, 1.026014486e7],
    [-3.030883460898826e-8, 8.98305509983578e-6, 0.30071316287616, 59.74293618442277, 7.357984074871, -25.38371002664745, 13.45380521110908, -3.29883767235584, 0.32710905363475, 6856817.37],
    [-1.981981304930552e-8, 8.983055099779535e-6, 0.03278182852591, 40.31678527705744, 0.65659298677277, -4.44255534477492, 0.85341911805263, 0.12923347998204, -0.04625736007561, 4482777.06],
    [3.09191371068437e-9, 8.983055096812155e-6, 6.995724062e-5, 23.10934304144901, -2.3663490511e-4, -0.6321817810242, -0.00663494467273, 0.03430082397953, -0.00466043876332, 2555164.4],
    [2.890871144776878e-9, 8.983055095805407e-6, -3.068298e-8, 7.47137025468032, -3.53937994e-6, -0.02145144861037, -1.234426596e-5, 1.0322952773e-4, -3.23890364e-6, 826088.5],
];

#[rustfmt::skip]
#[allow(clippy::excessive_precision, clippy::unreadable_literal)]
const LL2MC: [[f64; 10]; 6] = [
    [-0.0015702102444, 111320.7020616939, 1.704480524535203e15, -1.0338987376042340e16, 2.611266785660388e16, -3.51496691766537e16, 2.659570071840392e16, -1.072501245418824e16, 1.800819912950474e15, 82.5],
    [8.277824516172526e-4, 111320.7020463578, 6.477955746671607e8, -4.082003173641316e9, 1.077490566351142e10, -1.517187553151559e10, 1.205306533862167e10, -5.124939663577472e9, 9.133119359512032e8, 67.5],
    [0.00337398766765, 111320.7020202162, 4481351.045890365, -2.339375119931662e7, 7.968221547186455e7, -1.159649932797253e8, 9.723671115602145e7, -4.366194633752821e7, 8477230.501135234, 52.5],
    [0.00220636496208, 111320.7020209128, 51751.86112841131, 3796837.749470245, 992013.7397791013, -1221952.21711287, 1340652.697009075, -620943.6990984312, 144416.9293806241, 37.5],
    [-3.441963504368392e-4, 111320.7020576856, 278.2353980772752, 2485758.690035394, 6070.750963243378, 54821.18345352118, 9540.606633304236, -2710.55326746645, 1405.483844121726, 22.5],
    [-3.218135878613132e-4, 111320.7020701615, 0.00369383431289, 823725.6402795718, 0.46104986909093, 2351.343141331292, 1.58060784298199, 8.77738589078284, 0.37238884252424, 7.45],
];

// ============================================================================
// 公共接口
// ============================================================================

/// 百度墨卡托 -> BD09 经纬度
///
/// 选取第一个满足 `y >= MCBAND[i]` 的带；`y` 为负或 NaN 时没有可用的带，
/// 返回 `None`。结果保留 6 位小数。
#[must_use]
pub fn mercator_to_bd09(x: f64, y: f64) -> Option<Point> {
    let Some(band) = MCBAND.iter().position(|&lower| y >= lower) else {
        debug!(x, y, "墨卡托 y 不在任何纬度带内");
        return None;
    };
    Some(apply_factor(x, y, &MC2LL[band], MC2LL_DECIMALS))
}

/// 与 [`mercator_to_bd09`] 相同，查表失败时返回错误
pub fn try_mercator_to_bd09(x: f64, y: f64) -> GeoResult<Point> {
    mercator_to_bd09(x, y).ok_or_else(|| GeoError::mercator_out_of_band(x, y))
}

/// BD09 经纬度 -> 百度墨卡托
///
/// 经度先折算到 `[-180, 180]`，纬度截断到 `[-74, 74]`。北半球取第一个满足
/// `lat >= LLBAND[i]` 的带；南半球从赤道带开始反向查找 `lat <= -LLBAND[i]`，
/// 因此所有南纬都落在赤道带。结果保留 2 位小数。
/// NaN 或经度为无穷大时返回 `None`。
#[must_use]
pub fn bd09_to_mercator(lng: f64, lat: f64) -> Option<Point> {
    if !lng.is_finite() || lat.is_nan() {
        debug!(lng, lat, "无效的 BD09 坐标");
        return None;
    }
    let lng = wrap_longitude(lng);
    let lat = lat.clamp(-LAT_LIMIT, LAT_LIMIT);

    let band = LLBAND
        .iter()
        .position(|&lower| lat >= lower)
        .or_else(|| LLBAND.iter().rposition(|&lower| lat <= -lower))?;
    Some(apply_factor(lng, lat, &LL2MC[band], LL2MC_DECIMALS))
}

/// 保留 `decimals` 位小数，按定点格式舍入（0.5 远离零）后解析回浮点
///
/// 舍入基于浮点数的精确二进制值：`1.005` 实际略小于 1.005，保留两位得 `1.0`。
/// 超过 [`MAX_EXACT_DECIMALS`] 位时任何有限值都已精确表示，原样返回。
#[must_use]
pub fn round_to_decimals(value: f64, decimals: u32) -> f64 {
    if decimals > MAX_EXACT_DECIMALS || !value.is_finite() {
        return value;
    }
    // 恰好落在两个候选值正中间，当且仅当 value * 2^(decimals+1) 为奇数
    let scaled = value * 2f64.powi(decimals as i32 + 1);
    let is_tie = scaled.is_finite() && scaled.fract() == 0.0 && (scaled % 2.0).abs() == 1.0;
    // 格式化按半数取偶；中点处改用远离零一侧的相邻浮点数，它仍在上方候选值之内
    let value = if is_tie {
        f64::from_bits(value.to_bits() + 1)
    } else {
        value
    };
    format!("{value:.prec$}", prec = decimals as usize)
        .parse()
        .unwrap_or(value)
}

// ============================================================================
// 内部实现
// ============================================================================

/// 用一行系数做分段多项式逼近
///
/// 经度分量为线性缩放，纬度分量为 `|y| / factor[9]` 的 6 次多项式；
/// 符号取自输入值。
fn apply_factor(x: f64, y: f64, factor: &[f64; 10], decimals: u32) -> Point {
    let mut out_x = factor[0] + factor[1] * x.abs();

    let t = y.abs() / factor[9];
    let mut out_y = factor[2]
        + factor[3] * t
        + factor[4] * t * t
        + factor[5] * t * t * t
        + factor[6] * t * t * t * t
        + factor[7] * t * t * t * t * t
        + factor[8] * t * t * t * t * t * t;

    if x < 0.0 {
        out_x = -out_x;
    }
    if y < 0.0 {
        out_y = -out_y;
    }
    Point::new(
        round_to_decimals(out_x, decimals),
        round_to_decimals(out_y, decimals),
    )
}

/// 经度折算到 `[-180, 180]`
///
/// 大于 180 的值落在 `(-180, 180]`，小于 -180 的值落在 `[-180, 180)`，
/// 与逐次加减 360 的结果一致。
fn wrap_longitude(lng: f64) -> f64 {
    if lng > 180.0 {
        180.0 - (180.0 - lng).rem_euclid(360.0)
    } else if lng < -180.0 {
        (lng + 180.0).rem_euclid(360.0) - 180.0
    } else {
        lng
    }
}

// ============================================================================
// 测试
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mercator_to_bd09_known_values() {
        assert_eq!(
            mercator_to_bd09(12958160.97, 4825923.77),
            Some(Point::new(116.403874, 39.915))
        );
        assert_eq!(
            mercator_to_bd09(12959238.56, 4825605.34),
            Some(Point::new(116.413554, 39.912797))
        );
        assert_eq!(
            mercator_to_bd09(13520000.0, 3600000.0),
            Some(Point::new(121.450905, 30.918399))
        );
    }

    #[test]
    fn test_mercator_sign_restored_from_input() {
        let east = mercator_to_bd09(12958160.97, 4825923.77).unwrap();
        let west = mercator_to_bd09(-12958160.97, 4825923.77).unwrap();
        assert_eq!(west.lng, -east.lng);
        assert_eq!(west.lat, east.lat);
    }

    #[test]
    fn test_mercator_top_band() {
        let p = mercator_to_bd09(100.0, 1.289059486e7).unwrap();
        assert_eq!(p, Point::new(0.000898, 75.01325));
    }

    #[test]
    fn test_mercator_band_failure() {
        assert!(mercator_to_bd09(1.0, -5.0).is_none());
        assert!(mercator_to_bd09(1.0, f64::NAN).is_none());
        // 零属于赤道带
        assert!(mercator_to_bd09(12958160.97, 0.0).is_some());
    }

    #[test]
    fn test_try_mercator_to_bd09_error() {
        match try_mercator_to_bd09(1.0, -5.0) {
            Err(GeoError::MercatorOutOfBand { x, y }) => {
                assert_eq!(x, 1.0);
                assert_eq!(y, -5.0);
            }
            _ => panic!("错误的错误类型"),
        }
        assert!(try_mercator_to_bd09(13520000.0, 3600000.0).is_ok());
    }

    #[test]
    fn test_bd09_to_mercator_known_values() {
        assert_eq!(
            bd09_to_mercator(116.404, 39.915),
            Some(Point::new(12958175.0, 4825923.77))
        );
        assert_eq!(
            bd09_to_mercator(121.4737, 31.2304),
            Some(Point::new(13522537.56, 3640349.71))
        );
        assert_eq!(
            bd09_to_mercator(-73.98, 40.75),
            Some(Point::new(-8235505.54, 4947382.48))
        );
    }

    #[test]
    fn test_bd09_to_mercator_wraps_and_clamps() {
        let base = bd09_to_mercator(116.404, 39.915);
        assert_eq!(bd09_to_mercator(476.404, 39.915), base);
        assert_eq!(bd09_to_mercator(-243.596, 39.915), base);
        assert_eq!(bd09_to_mercator(100.0, 80.0), bd09_to_mercator(100.0, 74.0));
        assert_eq!(
            bd09_to_mercator(100.0, 80.0),
            Some(Point::new(11132070.21, 12474104.17))
        );
    }

    #[test]
    fn test_bd09_to_mercator_southern_hemisphere_uses_equator_band() {
        assert_eq!(
            bd09_to_mercator(116.4, -33.0),
            Some(Point::new(12957729.72, -3871472.38))
        );
        // 与北纬不对称
        assert_eq!(
            bd09_to_mercator(116.4, 33.0),
            Some(Point::new(12957729.72, 3871817.5))
        );
    }

    #[test]
    fn test_bd09_to_mercator_nan() {
        assert!(bd09_to_mercator(f64::NAN, 39.9).is_none());
        assert!(bd09_to_mercator(116.4, f64::NAN).is_none());
    }

    #[test]
    fn test_mercator_round_trip() {
        for &(lng, lat) in &[(116.404, 39.915), (121.4737, 31.2304), (-73.98, 40.75)] {
            let mc = bd09_to_mercator(lng, lat).unwrap();
            let back = mercator_to_bd09(mc.lng, mc.lat).unwrap();
            assert!((back.lng - lng).abs() < 1e-5, "lng {lng} -> {}", back.lng);
            assert!((back.lat - lat).abs() < 1e-5, "lat {lat} -> {}", back.lat);
        }
    }

    #[test]
    fn test_round_to_decimals() {
        assert_eq!(round_to_decimals(116.40387396550283, 6), 116.403874);
        assert_eq!(round_to_decimals(-8235505.537713493, 2), -8235505.54);
        // 精确二进制值略小于 1.005
        assert_eq!(round_to_decimals(1.005, 2), 1.0);
    }

    #[test]
    fn test_round_ties_away_from_zero() {
        // 1/128 = 0.0078125，恰为 6 位小数的中点
        assert_eq!(round_to_decimals(0.0078125, 6), 0.007813);
        assert_eq!(round_to_decimals(-0.0078125, 6), -0.007813);
        assert_eq!(round_to_decimals(0.125, 2), 0.13);
        assert_eq!(round_to_decimals(-0.125, 2), -0.13);
        assert_eq!(round_to_decimals(2.5, 0), 3.0);
    }

    #[test]
    fn test_round_many_decimals() {
        assert_eq!(round_to_decimals(1.5, 31), 1.5);
        assert_eq!(round_to_decimals(0.1, 40), 0.1);
        assert_eq!(round_to_decimals(-2.25, MAX_EXACT_DECIMALS), -2.25);
        assert_eq!(round_to_decimals(1.5, MAX_EXACT_DECIMALS + 1), 1.5);
        assert_eq!(round_to_decimals(1.5, u32::MAX), 1.5);
        // 2^-40 的十进制展开恰有 40 位，保留 39 位为中点
        let tiny = 2f64.powi(-40);
        assert_eq!(round_to_decimals(tiny, 39), tiny);
        assert_eq!(round_to_decimals(tiny, 12), 1e-12);
    }

    #[test]
    fn test_wrap_longitude() {
        assert_eq!(wrap_longitude(180.0), 180.0);
        assert_eq!(wrap_longitude(-180.0), -180.0);
        assert_eq!(wrap_longitude(540.0), 180.0);
        assert_eq!(wrap_longitude(-540.0), -180.0);
        assert_eq!(wrap_longitude(181.0), -179.0);
        assert_eq!(wrap_longitude(-181.0), 179.0);
        assert_eq!(wrap_longitude(1e13), -80.0);
        let far = wrap_longitude(f64::MAX);
        assert!((-180.0..=180.0).contains(&far));
    }

    #[test]
    fn test_bd09_to_mercator_huge_longitude() {
        assert_eq!(bd09_to_mercator(1e13, 40.0), bd09_to_mercator(-80.0, 40.0));
        assert!(bd09_to_mercator(f64::MAX, 40.0).is_some());
        assert!(bd09_to_mercator(-f64::MAX, -40.0).is_some());
    }

    #[test]
    fn test_round_non_finite_passes_through() {
        assert!(round_to_decimals(f64::NAN, 6).is_nan());
        assert_eq!(round_to_decimals(f64::INFINITY, 2), f64::INFINITY);
    }
}
