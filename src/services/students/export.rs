//! 学生导出与导入模板

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;

use super::StudentService;
use super::import::TEMPLATE_COLUMNS;
use crate::config::AppConfig;
use crate::models::imports::requests::ExportParams;
use crate::models::students::requests::{StudentExportParams, StudentListQuery};
use crate::utils::spreadsheet::file_response;

const EXPORT_COLUMNS: &[&str] = &[
    "roll_number",
    "username",
    "email",
    "display_name",
    "program_code",
    "class_code",
    "section",
    "guardian_name",
    "phone",
    "address",
    "date_of_birth",
    "admission_date",
    "status",
];

pub async fn export_students(
    service: &StudentService,
    request: &HttpRequest,
    params: StudentExportParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let limit = AppConfig::get().import.export_limit;

    let query = StudentListQuery {
        program_id: params.program_id,
        class_id: params.class_id,
        section_id: params.section_id,
        status: params.status,
        ..Default::default()
    };
    let students = storage.list_students_for_export(limit, query).await?;

    // id -> 代码/名称
    let mut programs: HashMap<i64, String> = HashMap::new();
    let mut classes: HashMap<i64, String> = HashMap::new();
    let mut sections: HashMap<i64, String> = HashMap::new();

    let mut rows = Vec::with_capacity(students.len());
    for detail in students {
        let s = &detail.student;

        if !programs.contains_key(&s.program_id) {
            let code = storage
                .get_program_by_id(s.program_id)
                .await?
                .map(|p| p.code)
                .unwrap_or_default();
            programs.insert(s.program_id, code);
        }
        if let Some(class_id) = s.class_id
            && !classes.contains_key(&class_id)
        {
            let code = storage
                .get_class_by_id(class_id)
                .await?
                .map(|c| c.code)
                .unwrap_or_default();
            classes.insert(class_id, code);
        }
        if let Some(section_id) = s.section_id
            && !sections.contains_key(&section_id)
        {
            let name = storage
                .get_section_by_id(section_id)
                .await?
                .map(|sec| sec.name)
                .unwrap_or_default();
            sections.insert(section_id, name);
        }

        let lookup = |map: &HashMap<i64, String>, id: Option<i64>| {
            id.and_then(|id| map.get(&id).cloned()).unwrap_or_default()
        };
        let program_code = lookup(&programs, Some(s.program_id));
        let class_code = lookup(&classes, s.class_id);
        let section = lookup(&sections, s.section_id);

        let status = s.status.to_string();
        let s = detail.student;
        rows.push(vec![
            s.roll_number,
            detail.user.username,
            detail.user.email,
            detail.user.display_name.unwrap_or_default(),
            program_code,
            class_code,
            section,
            s.guardian_name.unwrap_or_default(),
            s.phone.unwrap_or_default(),
            s.address.unwrap_or_default(),
            s.date_of_birth.unwrap_or_default(),
            s.admission_date.unwrap_or_default(),
            status,
        ]);
    }

    let filename = format!("students_{}", chrono::Local::now().format("%Y%m%d%H%M%S"));
    Ok(file_response(params.format, &filename, EXPORT_COLUMNS, &rows)?)
}

pub async fn download_template(params: ExportParams) -> ActixResult<HttpResponse> {
    let example = vec![
        "asmith_01",
        "asmith@students.edu",
        "Passw0rd!",
        "BSCS-2026-001",
        "BSCS",
        "BSCS-26F",
        "A",
        "Alice Smith",
        "Robert Smith",
        "+1-555-0101",
        "12 College Road",
        "2006-03-14",
        "2026-08-20",
    ]
    .into_iter()
    .map(str::to_string)
    .collect();

    Ok(file_response(
        params.format,
        "student_import_template",
        TEMPLATE_COLUMNS,
        &[example],
    )?)
}
