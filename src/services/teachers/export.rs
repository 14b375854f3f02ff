//! 教师导出与导入模板

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;

use super::TeacherService;
use super::import::TEMPLATE_COLUMNS;
use crate::config::AppConfig;
use crate::models::imports::requests::ExportParams;
use crate::models::teachers::requests::TeacherExportParams;
use crate::utils::spreadsheet::file_response;

const EXPORT_COLUMNS: &[&str] = &[
    "employee_id",
    "username",
    "email",
    "display_name",
    "department_code",
    "designation",
    "qualification",
    "phone",
    "joining_date",
    "status",
];

pub async fn export_teachers(
    service: &TeacherService,
    request: &HttpRequest,
    params: TeacherExportParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let limit = AppConfig::get().import.export_limit;

    let teachers = storage
        .list_teachers_for_export(limit, params.department_id)
        .await?;

    let mut department_codes: HashMap<i64, String> = HashMap::new();
    let mut rows = Vec::with_capacity(teachers.len());
    for detail in teachers {
        let department_code = match detail.teacher.department_id {
            Some(id) => match department_codes.get(&id) {
                Some(code) => code.clone(),
                None => {
                    let code = storage
                        .get_department_by_id(id)
                        .await?
                        .map(|d| d.code)
                        .unwrap_or_default();
                    department_codes.insert(id, code.clone());
                    code
                }
            },
            None => String::new(),
        };

        let t = detail.teacher;
        rows.push(vec![
            t.employee_id,
            detail.user.username,
            detail.user.email,
            detail.user.display_name.unwrap_or_default(),
            department_code,
            t.designation.unwrap_or_default(),
            t.qualification.unwrap_or_default(),
            t.phone.unwrap_or_default(),
            t.joining_date.unwrap_or_default(),
            detail.user.status.to_string(),
        ]);
    }

    let filename = format!("teachers_{}", chrono::Local::now().format("%Y%m%d%H%M%S"));
    Ok(file_response(params.format, &filename, EXPORT_COLUMNS, &rows)?)
}

pub async fn download_template(params: ExportParams) -> ActixResult<HttpResponse> {
    let example = vec![
        "jdoe_01",
        "jdoe@example.edu",
        "Passw0rd!",
        "EMP-001",
        "CS",
        "Lecturer",
        "MSc Computer Science",
        "John Doe",
        "+1-555-0100",
        "2024-08-01",
    ]
    .into_iter()
    .map(str::to_string)
    .collect();

    Ok(file_response(
        params.format,
        "teacher_import_template",
        TEMPLATE_COLUMNS,
        &[example],
    )?)
}
