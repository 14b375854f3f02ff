//! 师生批量导入的公共流程
//!
//! 读取上传文件、解析表格、校验账号字段，以及在阻塞线程中哈希密码。

use actix_multipart::Multipart;
use actix_web::HttpResponse;
use futures_util::StreamExt;
use std::collections::HashSet;

use crate::config::AppConfig;
use crate::models::imports::responses::{ImportResponse, ImportRowError};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::bad_request;
use crate::utils::password::hash_password;
use crate::utils::spreadsheet::{SheetRow, SheetTable};
use crate::utils::validate::{validate_email, validate_password_simple, validate_username};

/// 读取 multipart 中名为 `file` 的字段
pub(crate) async fn read_upload(payload: &mut Multipart) -> Result<(Vec<u8>, String), String> {
    let max_size = AppConfig::get().import.max_file_size;
    let mut file_bytes = Vec::new();
    let mut file_name = String::new();

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| format!("读取字段失败: {e}"))?;

        if field.name() != Some("file") {
            continue;
        }
        file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .unwrap_or("upload.csv")
            .to_string();

        while let Some(chunk) = field.next().await {
            let data = chunk.map_err(|e| format!("读取数据失败: {e}"))?;
            if file_bytes.len() + data.len() > max_size {
                return Err(format!("文件超过大小限制 {max_size} 字节"));
            }
            file_bytes.extend_from_slice(&data);
        }
    }

    if file_bytes.is_empty() {
        return Err("未找到文件字段或文件为空".to_string());
    }

    Ok((file_bytes, file_name))
}

/// 读取并解析上传的表格，失败时返回可直接响应的错误
pub(crate) async fn load_sheet(
    payload: &mut Multipart,
    required: &[&str],
) -> Result<SheetTable, HttpResponse> {
    let (bytes, file_name) = read_upload(payload)
        .await
        .map_err(|e| bad_request(ErrorCode::FileUploadFailed, e))?;

    let table = SheetTable::parse(&bytes, &file_name)
        .map_err(|e| bad_request(e.error_code(), e.message()))?;
    table
        .require_columns(required)
        .map_err(|e| bad_request(e.error_code(), e.message()))?;

    if table.rows.is_empty() {
        return Err(bad_request(
            ErrorCode::ImportFileDataInvalid,
            "文件中没有数据行",
        ));
    }
    let max_rows = AppConfig::get().import.max_rows;
    if table.rows.len() > max_rows {
        return Err(bad_request(
            ErrorCode::ImportFileDataInvalid,
            format!("单次导入最多支持 {max_rows} 行"),
        ));
    }

    Ok(table)
}

/// 一行中的账号字段
#[derive(Debug, Clone)]
pub(crate) struct AccountFields {
    pub username: String,
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
}

impl AccountFields {
    pub fn read(table: &SheetTable, row: &SheetRow) -> Self {
        Self {
            username: table.cell(row, "username").to_string(),
            email: table.cell(row, "email").to_string(),
            password: table.cell(row, "password").to_string(),
            display_name: table.optional(row, "display_name"),
        }
    }

    pub fn validate(&self, row: usize, errors: &mut Vec<ImportRowError>) {
        if let Err(msg) = validate_username(&self.username) {
            errors.push(ImportRowError::new(row, "username", msg));
        }
        if let Err(msg) = validate_email(&self.email) {
            errors.push(ImportRowError::new(row, "email", msg));
        }
        if let Err(msg) = validate_password_simple(&self.password) {
            errors.push(ImportRowError::new(row, "password", msg));
        }
    }
}

/// 已存在或在本文件中重复的唯一键
#[derive(Debug, Default)]
pub(crate) struct TakenKeys {
    usernames: HashSet<String>,
    emails: HashSet<String>,
    codes: HashSet<String>,
}

impl TakenKeys {
    pub fn new(usernames: Vec<String>, emails: Vec<String>, codes: Vec<String>) -> Self {
        Self {
            usernames: usernames.into_iter().collect(),
            emails: emails.into_iter().collect(),
            codes: codes.into_iter().collect(),
        }
    }

    /// 返回冲突的字段名；未冲突时登记这些键
    pub fn claim(
        &mut self,
        account: &AccountFields,
        code_field: &'static str,
        code: &str,
    ) -> Option<&'static str> {
        if self.usernames.contains(&account.username) {
            return Some("username");
        }
        if self.emails.contains(&account.email) {
            return Some("email");
        }
        if self.codes.contains(code) {
            return Some(code_field);
        }
        self.usernames.insert(account.username.clone());
        self.emails.insert(account.email.clone());
        self.codes.insert(code.to_string());
        None
    }
}

/// 在阻塞线程中哈希密码
pub(crate) async fn hash_in_background(password: String) -> Result<String, String> {
    match tokio::task::spawn_blocking(move || hash_password(&password)).await {
        Ok(Ok(hash)) => Ok(hash),
        Ok(Err(e)) => Err(format!("密码哈希失败: {e}")),
        Err(e) => Err(format!("密码处理失败: {e}")),
    }
}

pub(crate) fn import_response(result: ImportResponse) -> HttpResponse {
    let message = format!(
        "导入完成：成功 {} 条，跳过 {} 条，失败 {} 条",
        result.success, result.skipped, result.failed
    );
    HttpResponse::Ok().json(ApiResponse::success(result, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(username: &str, email: &str) -> AccountFields {
        AccountFields {
            username: username.to_string(),
            email: email.to_string(),
            password: "Secret123".to_string(),
            display_name: None,
        }
    }

    #[test]
    fn test_taken_keys_detects_existing_and_in_file_duplicates() {
        let mut keys = TakenKeys::new(
            vec!["alice01".to_string()],
            vec![],
            vec!["R-001".to_string()],
        );

        assert_eq!(
            keys.claim(&account("alice01", "a@x.io"), "roll_number", "R-100"),
            Some("username")
        );
        assert_eq!(
            keys.claim(&account("bob_02", "b@x.io"), "roll_number", "R-001"),
            Some("roll_number")
        );
        assert_eq!(
            keys.claim(&account("bob_02", "b@x.io"), "roll_number", "R-002"),
            None
        );
        // 同一文件中的重复行
        assert_eq!(
            keys.claim(&account("carol03", "b@x.io"), "roll_number", "R-003"),
            Some("email")
        );
    }

    #[test]
    fn test_account_validation_collects_all_errors() {
        let mut errors = Vec::new();
        AccountFields {
            username: "ab".to_string(),
            email: "not-an-email".to_string(),
            password: "x".to_string(),
            display_name: None,
        }
        .validate(3, &mut errors);

        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["username", "email", "password"]);
        assert!(errors.iter().all(|e| e.row == 3));
    }
}
