use super::entities::FeeStatus;
use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

// 批量生成学费请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct GenerateFeesRequest {
    pub program_id: i64,
    pub class_id: Option<i64>,
    pub semester: i32,
    pub title: String,
    // 缺省取专业的每学期学费
    pub amount: Option<i64>,
    pub due_date: String,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct RecordPaymentRequest {
    pub amount: i64,
    pub remarks: Option<String>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct WaiveFeeRequest {
    pub remarks: Option<String>,
}

// 学费查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct FeeQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub student_id: Option<i64>,
    pub status: Option<FeeStatus>,
    pub semester: Option<i32>,
}

// 学费列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct FeeListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub student_id: Option<i64>,
    pub status: Option<FeeStatus>,
    pub semester: Option<i32>,
}

/// 存储层批量写入的单条学费
#[derive(Debug, Clone)]
pub struct NewFee {
    pub student_id: i64,
    pub title: String,
    pub semester: i32,
    pub amount: i64,
    pub due_date: String,
}
