//! 仪表盘统计

pub mod responses;
