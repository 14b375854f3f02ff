//! 批量导入导出的公共模型

pub mod requests;
pub mod responses;
