// geofence\apps\gf_cli\src\commands\mod.rs

//! 子命令实现

pub mod convert;
pub mod demercator;
pub mod locate;
pub mod validate;
