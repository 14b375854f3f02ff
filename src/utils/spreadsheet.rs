//! 表格文件读写
//!
//! 导入支持 `.xlsx` 与 `.csv`，表头大小写不敏感；导出与模板下载
//! 共用同一套写入函数。

use actix_web::HttpResponse;
use calamine::{Data, Reader, Xlsx};
use rust_xlsxwriter::{Format, Workbook};
use std::collections::HashMap;
use std::io::Cursor;

use crate::errors::{CollegeHubError, Result};
use crate::models::ErrorCode;
use crate::models::imports::requests::ExportFormat;

/// 表格解析错误
#[derive(Debug)]
pub enum SheetError {
    MissingColumn(String),
    ParseFailed(String),
    EmptyFile,
}

impl SheetError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::MissingColumn(_) => ErrorCode::ImportFileMissingColumn,
            Self::ParseFailed(_) => ErrorCode::ImportFileParseFailed,
            Self::EmptyFile => ErrorCode::ImportFileDataInvalid,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::MissingColumn(col) => format!("缺少必需列: {col}"),
            Self::ParseFailed(msg) => msg.clone(),
            Self::EmptyFile => "文件中没有数据".to_string(),
        }
    }
}

/// 表格中的一行
#[derive(Debug, Clone)]
pub struct SheetRow {
    // 文件中的行号（表头为第 1 行）
    pub row_num: usize,
    cells: Vec<String>,
}

/// 解析后的表格
#[derive(Debug)]
pub struct SheetTable {
    headers: HashMap<String, usize>,
    pub rows: Vec<SheetRow>,
}

impl SheetTable {
    /// 按文件名后缀选择解析器，默认按 CSV 处理
    pub fn parse(data: &[u8], file_name: &str) -> std::result::Result<Self, SheetError> {
        if file_name.to_lowercase().ends_with(".xlsx") {
            Self::parse_xlsx(data)
        } else {
            Self::parse_csv(data)
        }
    }

    pub fn parse_csv(data: &[u8]) -> std::result::Result<Self, SheetError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(Cursor::new(data));

        let headers = rdr
            .headers()
            .map_err(|e| SheetError::ParseFailed(format!("读取表头失败: {e}")))?
            .iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(SheetError::EmptyFile);
        }

        let mut rows = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| {
                SheetError::ParseFailed(format!("第 {} 行解析失败: {e}", idx + 2))
            })?;
            let cells: Vec<String> = record.iter().map(|c| c.trim().to_string()).collect();
            if cells.iter().all(|c| c.is_empty()) {
                continue;
            }
            rows.push(SheetRow {
                row_num: idx + 2,
                cells,
            });
        }

        Ok(Self::from_parts(headers, rows))
    }

    pub fn parse_xlsx(data: &[u8]) -> std::result::Result<Self, SheetError> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(data))
            .map_err(|e| SheetError::ParseFailed(format!("打开 XLSX 失败: {e}")))?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| SheetError::ParseFailed("工作簿中没有工作表".to_string()))?;

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| SheetError::ParseFailed(format!("读取工作表失败: {e}")))?;

        let mut rows_iter = range.rows();
        let headers = rows_iter
            .next()
            .ok_or(SheetError::EmptyFile)?
            .iter()
            .map(cell_to_string)
            .collect::<Vec<_>>();

        let mut rows = Vec::new();
        for (idx, row) in rows_iter.enumerate() {
            let cells: Vec<String> = row.iter().map(cell_to_string).collect();
            if cells.iter().all(|c| c.is_empty()) {
                continue;
            }
            rows.push(SheetRow {
                row_num: idx + 2,
                cells,
            });
        }

        Ok(Self::from_parts(headers, rows))
    }

    fn from_parts(headers: Vec<String>, rows: Vec<SheetRow>) -> Self {
        let headers = headers
            .into_iter()
            .enumerate()
            .map(|(i, h)| (h.trim().to_lowercase(), i))
            .collect();
        Self { headers, rows }
    }

    /// 检查必需列是否齐全
    pub fn require_columns(&self, columns: &[&str]) -> std::result::Result<(), SheetError> {
        match columns.iter().find(|c| !self.headers.contains_key(**c)) {
            Some(missing) => Err(SheetError::MissingColumn(missing.to_string())),
            None => Ok(()),
        }
    }

    /// 读取单元格，列不存在或为空时返回空串
    pub fn cell<'a>(&self, row: &'a SheetRow, column: &str) -> &'a str {
        self.headers
            .get(column)
            .and_then(|&i| row.cells.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// 读取可选单元格，空串视为 None
    pub fn optional(&self, row: &SheetRow, column: &str) -> Option<String> {
        let value = self.cell(row, column);
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        // Excel 中的整数会以浮点读出，去掉多余的 ".0"
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        // 日期单元格按 1900 日期系统换算
        Data::DateTime(dt) => chrono::NaiveDate::from_ymd_opt(1899, 12, 30)
            .and_then(|epoch| {
                epoch.checked_add_signed(chrono::Duration::days(dt.as_f64().trunc() as i64))
            })
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        other => other.to_string().trim().to_string(),
    }
}

/// 写出 CSV 字节
pub fn write_csv(headers: &[&str], rows: &[Vec<String>]) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(headers)?;
    for row in rows {
        wtr.write_record(row)?;
    }
    wtr.into_inner()
        .map_err(|e| CollegeHubError::file_operation(format!("CSV 生成失败: {e}")))
}

/// 写出 XLSX 字节，表头加粗
pub fn write_xlsx(headers: &[&str], rows: &[Vec<String>]) -> Result<Vec<u8>> {
    let xlsx_err = |e: rust_xlsxwriter::XlsxError| {
        CollegeHubError::file_operation(format!("XLSX 写入失败: {e}"))
    };

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let header_format = Format::new().set_bold();

    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(xlsx_err)?;
    }
    for (row_idx, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            worksheet
                .write_string((row_idx + 1) as u32, col as u16, value)
                .map_err(xlsx_err)?;
        }
    }

    workbook.save_to_buffer().map_err(xlsx_err)
}

/// 生成下载响应
pub fn file_response(
    format: ExportFormat,
    base_name: &str,
    headers: &[&str],
    rows: &[Vec<String>],
) -> Result<HttpResponse> {
    let data = match format {
        ExportFormat::Csv => write_csv(headers, rows)?,
        ExportFormat::Xlsx => write_xlsx(headers, rows)?,
    };

    Ok(HttpResponse::Ok()
        .content_type(format.content_type())
        .insert_header((
            "Content-Disposition",
            format!(
                "attachment; filename=\"{base_name}.{}\"",
                format.extension()
            ),
        ))
        .body(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_case_insensitive_headers() {
        let data = b"Username,EMAIL,password\nalice01,a@x.io,Secret123\n,,\nbob_02,b@x.io,Secret456\n";
        let table = SheetTable::parse(data, "students.csv").unwrap();
        table
            .require_columns(&["username", "email", "password"])
            .unwrap();

        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.cell(&table.rows[0], "username"), "alice01");
        assert_eq!(table.rows[1].row_num, 4);
        assert_eq!(table.optional(&table.rows[1], "phone"), None);
    }

    #[test]
    fn test_missing_column() {
        let table = SheetTable::parse_csv(b"username,email\nalice01,a@x.io\n").unwrap();
        match table.require_columns(&["username", "password"]) {
            Err(SheetError::MissingColumn(col)) => assert_eq!(col, "password"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_xlsx_written_then_parsed() {
        let rows = vec![vec!["T001".to_string(), "Jane".to_string()]];
        let bytes = write_xlsx(&["employee_id", "display_name"], &rows).unwrap();
        let table = SheetTable::parse(&bytes, "teachers.xlsx").unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.cell(&table.rows[0], "employee_id"), "T001");
    }

    #[test]
    fn test_invalid_xlsx() {
        let err = SheetTable::parse(b"not a zip", "x.xlsx").unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::ImportFileParseFailed);
    }
}
