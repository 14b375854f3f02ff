use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 导出文件格式
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/import.ts")]
pub enum ExportFormat {
    #[default]
    Csv,
    Xlsx,
}

crate::impl_string_enum!(ExportFormat {
    Csv => "csv",
    Xlsx => "xlsx",
});

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    pub fn extension(&self) -> &'static str {
        self.as_str()
    }
}

// 导出 / 模板下载参数
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/import.ts")]
pub struct ExportParams {
    #[serde(default)]
    pub format: ExportFormat,
}
