//! 教师批量导入

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;
use tracing::{info, warn};

use super::{TeacherService, validate_profile};
use crate::models::imports::responses::{ImportResponse, ImportRowError};
use crate::models::teachers::requests::CreateTeacherRequest;
use crate::services::imports::{
    AccountFields, TakenKeys, hash_in_background, import_response, load_sheet,
};

pub const REQUIRED_COLUMNS: &[&str] = &["username", "email", "password", "employee_id"];

pub const TEMPLATE_COLUMNS: &[&str] = &[
    "username",
    "email",
    "password",
    "employee_id",
    "department_code",
    "designation",
    "qualification",
    "display_name",
    "phone",
    "joining_date",
];

struct TeacherRow {
    row_num: usize,
    account: AccountFields,
    employee_id: String,
    department_id: Option<i64>,
    designation: Option<String>,
    qualification: Option<String>,
    phone: Option<String>,
    joining_date: Option<String>,
}

pub async fn import_teachers(
    service: &TeacherService,
    request: &HttpRequest,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let table = match load_sheet(&mut payload, REQUIRED_COLUMNS).await {
        Ok(table) => table,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    let mut result = ImportResponse {
        total: table.rows.len(),
        ..Default::default()
    };

    // 1. 逐行校验，院系代码按文件内缓存解析
    let mut departments: HashMap<String, Option<i64>> = HashMap::new();
    let mut candidates = Vec::new();
    for row in &table.rows {
        let account = AccountFields::read(&table, row);
        let employee_id = table.cell(row, "employee_id").to_string();
        let joining_date = table.optional(row, "joining_date");

        let mut errors = Vec::new();
        account.validate(row.row_num, &mut errors);
        if let Err(msg) = validate_profile(Some(&employee_id), joining_date.as_deref()) {
            errors.push(ImportRowError::new(row.row_num, "employee_id/joining_date", msg));
        }

        let department_id = match table.optional(row, "department_code") {
            Some(code) => {
                let code = code.to_uppercase();
                let id = match departments.get(&code) {
                    Some(cached) => *cached,
                    None => {
                        let id = storage.get_department_by_code(&code).await?.map(|d| d.id);
                        departments.insert(code.clone(), id);
                        id
                    }
                };
                if id.is_none() {
                    errors.push(ImportRowError::new(
                        row.row_num,
                        "department_code",
                        format!("院系 '{code}' 不存在"),
                    ));
                }
                id
            }
            None => None,
        };

        if !errors.is_empty() {
            result.failed += 1;
            result.errors.append(&mut errors);
            continue;
        }

        candidates.push(TeacherRow {
            row_num: row.row_num,
            account,
            employee_id,
            department_id,
            designation: table.optional(row, "designation"),
            qualification: table.optional(row, "qualification"),
            phone: table.optional(row, "phone"),
            joining_date,
        });
    }

    // 2. 批量查询已存在的唯一键
    let usernames: Vec<String> = candidates.iter().map(|r| r.account.username.clone()).collect();
    let emails: Vec<String> = candidates.iter().map(|r| r.account.email.clone()).collect();
    let employee_ids: Vec<String> = candidates.iter().map(|r| r.employee_id.clone()).collect();
    let mut taken = TakenKeys::new(
        storage.check_usernames_exist(&usernames).await?,
        storage.check_emails_exist(&emails).await?,
        storage.check_employee_ids_exist(&employee_ids).await?,
    );

    // 3. 逐条创建，每条独立事务
    for row in candidates {
        if let Some(field) = taken.claim(&row.account, "employee_id", &row.employee_id) {
            result.skipped += 1;
            result
                .errors
                .push(ImportRowError::new(row.row_num, field, "已存在，跳过"));
            continue;
        }

        let password = match hash_in_background(row.account.password).await {
            Ok(hash) => hash,
            Err(msg) => {
                result.failed += 1;
                result
                    .errors
                    .push(ImportRowError::new(row.row_num, "password", msg));
                continue;
            }
        };

        let create = CreateTeacherRequest {
            username: row.account.username,
            email: row.account.email,
            password,
            display_name: row.account.display_name,
            employee_id: row.employee_id,
            department_id: row.department_id,
            designation: row.designation,
            qualification: row.qualification,
            phone: row.phone,
            joining_date: row.joining_date,
        };
        match storage.create_teacher(create).await {
            Ok(_) => result.success += 1,
            Err(e) => {
                warn!("Teacher import row {} failed: {}", row.row_num, e);
                result.failed += 1;
                result
                    .errors
                    .push(ImportRowError::new(row.row_num, "row", e.message()));
            }
        }
    }

    info!(
        "Teacher import finished: {} created, {} skipped, {} failed",
        result.success, result.skipped, result.failed
    );
    Ok(import_response(result))
}
