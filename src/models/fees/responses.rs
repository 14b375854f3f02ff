use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct GenerateFeesResponse {
    pub total: usize,
    pub created: usize,
    pub skipped: usize,
}
