//! 学生批量导入

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use super::{EnrollmentError, StudentService, validate_profile};
use crate::errors::Result;
use crate::models::imports::responses::{ImportResponse, ImportRowError};
use crate::models::students::requests::CreateStudentRequest;
use crate::services::imports::{
    AccountFields, TakenKeys, hash_in_background, import_response, load_sheet,
};
use crate::storage::Storage;
use crate::utils::spreadsheet::{SheetRow, SheetTable};

pub const REQUIRED_COLUMNS: &[&str] = &[
    "username",
    "email",
    "password",
    "roll_number",
    "program_code",
];

pub const TEMPLATE_COLUMNS: &[&str] = &[
    "username",
    "email",
    "password",
    "roll_number",
    "program_code",
    "class_code",
    "section",
    "display_name",
    "guardian_name",
    "phone",
    "address",
    "date_of_birth",
    "admission_date",
];

struct StudentRow {
    row_num: usize,
    account: AccountFields,
    roll_number: String,
    program_id: i64,
    class_id: Option<i64>,
    section_id: Option<i64>,
    guardian_name: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    date_of_birth: Option<String>,
    admission_date: Option<String>,
}

/// 分班容量与已占名额，含本次导入新增
#[derive(Debug, Clone, Copy)]
struct Seats {
    capacity: u64,
    used: u64,
}

/// 文件内复用的代码解析结果
struct Lookup {
    storage: Arc<dyn Storage>,
    programs: HashMap<String, Option<i64>>,
    // class_code -> (class_id, program_id)
    classes: HashMap<String, Option<(i64, i64)>>,
    sections: HashMap<(i64, String), Option<i64>>,
    seats: HashMap<i64, Seats>,
}

impl Lookup {
    fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            programs: HashMap::new(),
            classes: HashMap::new(),
            sections: HashMap::new(),
            seats: HashMap::new(),
        }
    }

    async fn program(&mut self, code: &str) -> Result<Option<i64>> {
        if let Some(id) = self.programs.get(code) {
            return Ok(*id);
        }
        let id = self.storage.get_program_by_code(code).await?.map(|p| p.id);
        self.programs.insert(code.to_string(), id);
        Ok(id)
    }

    async fn class(&mut self, code: &str) -> Result<Option<(i64, i64)>> {
        if let Some(class) = self.classes.get(code) {
            return Ok(*class);
        }
        let class = self
            .storage
            .get_class_by_code(code)
            .await?
            .map(|c| (c.id, c.program_id));
        self.classes.insert(code.to_string(), class);
        Ok(class)
    }

    async fn section(&mut self, class_id: i64, name: &str) -> Result<Option<i64>> {
        let key = (class_id, name.to_string());
        if let Some(id) = self.sections.get(&key) {
            return Ok(*id);
        }
        let section = self.storage.get_section_by_name(class_id, name).await?;
        let id = match section {
            Some(section) => {
                let used = self.storage.count_students_in_section(section.id).await?;
                self.seats.insert(
                    section.id,
                    Seats {
                        capacity: section.capacity.max(0) as u64,
                        used,
                    },
                );
                Some(section.id)
            }
            None => None,
        };
        self.sections.insert(key, id);
        Ok(id)
    }

    /// 占用一个名额，已满时返回容量
    fn take_seat(&mut self, section_id: i64) -> std::result::Result<(), u64> {
        match self.seats.get_mut(&section_id) {
            Some(seats) if seats.used >= seats.capacity => Err(seats.capacity),
            Some(seats) => {
                seats.used += 1;
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn release_seat(&mut self, section_id: i64) {
        if let Some(seats) = self.seats.get_mut(&section_id) {
            seats.used = seats.used.saturating_sub(1);
        }
    }

    /// 解析专业、班级、分班，错误写入 `errors`
    async fn enrollment(
        &mut self,
        table: &SheetTable,
        row: &SheetRow,
        errors: &mut Vec<ImportRowError>,
    ) -> Result<Option<(i64, Option<i64>, Option<i64>)>> {
        let program_code = table.cell(row, "program_code").to_uppercase();
        let Some(program_id) = self.program(&program_code).await? else {
            errors.push(ImportRowError::new(
                row.row_num,
                "program_code",
                format!("专业 '{program_code}' 不存在"),
            ));
            return Ok(None);
        };

        let section_name = table.optional(row, "section");
        let Some(class_code) = table.optional(row, "class_code").map(|c| c.to_uppercase()) else {
            if section_name.is_some() {
                errors.push(ImportRowError::new(
                    row.row_num,
                    "section",
                    EnrollmentError::SectionWithoutClass.message(),
                ));
                return Ok(None);
            }
            return Ok(Some((program_id, None, None)));
        };

        let class_id = match self.class(&class_code).await? {
            Some((class_id, owner)) if owner == program_id => class_id,
            Some(_) => {
                errors.push(ImportRowError::new(
                    row.row_num,
                    "class_code",
                    EnrollmentError::ClassNotInProgram.message(),
                ));
                return Ok(None);
            }
            None => {
                errors.push(ImportRowError::new(
                    row.row_num,
                    "class_code",
                    format!("班级 '{class_code}' 不存在"),
                ));
                return Ok(None);
            }
        };

        let Some(section_name) = section_name else {
            return Ok(Some((program_id, Some(class_id), None)));
        };
        match self.section(class_id, &section_name).await? {
            Some(section_id) => Ok(Some((program_id, Some(class_id), Some(section_id)))),
            None => {
                errors.push(ImportRowError::new(
                    row.row_num,
                    "section",
                    format!("分班 '{section_name}' 不存在"),
                ));
                Ok(None)
            }
        }
    }
}

pub async fn import_students(
    service: &StudentService,
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

    // 1. 逐行校验并解析归属
    let mut lookup = Lookup::new(storage.clone());
    let mut candidates = Vec::new();
    for row in &table.rows {
        let account = AccountFields::read(&table, row);
        let roll_number = table.cell(row, "roll_number").to_string();
        let date_of_birth = table.optional(row, "date_of_birth");
        let admission_date = table.optional(row, "admission_date");

        let mut errors = Vec::new();
        account.validate(row.row_num, &mut errors);
        if let Err(msg) = validate_profile(
            Some(&roll_number),
            date_of_birth.as_deref(),
            admission_date.as_deref(),
        ) {
            errors.push(ImportRowError::new(row.row_num, "roll_number/dates", msg));
        }
        let enrollment = lookup.enrollment(&table, row, &mut errors).await?;

        let Some((program_id, class_id, section_id)) = enrollment.filter(|_| errors.is_empty())
        else {
            result.failed += 1;
            result.errors.append(&mut errors);
            continue;
        };

        candidates.push(StudentRow {
            row_num: row.row_num,
            account,
            roll_number,
            program_id,
            class_id,
            section_id,
            guardian_name: table.optional(row, "guardian_name"),
            phone: table.optional(row, "phone"),
            address: table.optional(row, "address"),
            date_of_birth,
            admission_date,
        });
    }

    // 2. 批量查询已存在的唯一键
    let usernames: Vec<String> = candidates.iter().map(|r| r.account.username.clone()).collect();
    let emails: Vec<String> = candidates.iter().map(|r| r.account.email.clone()).collect();
    let roll_numbers: Vec<String> = candidates.iter().map(|r| r.roll_number.clone()).collect();
    let mut taken = TakenKeys::new(
        storage.check_usernames_exist(&usernames).await?,
        storage.check_emails_exist(&emails).await?,
        storage.check_roll_numbers_exist(&roll_numbers).await?,
    );

    // 3. 逐条创建，每条独立事务
    for row in candidates {
        if let Some(field) = taken.claim(&row.account, "roll_number", &row.roll_number) {
            result.skipped += 1;
            result
                .errors
                .push(ImportRowError::new(row.row_num, field, "已存在，跳过"));
            continue;
        }

        if let Some(section_id) = row.section_id
            && let Err(capacity) = lookup.take_seat(section_id)
        {
            result.failed += 1;
            result.errors.push(ImportRowError::new(
                row.row_num,
                "section",
                format!("分班已满（容量 {capacity}）"),
            ));
            continue;
        }

        let password = match hash_in_background(row.account.password).await {
            Ok(hash) => hash,
            Err(msg) => {
                if let Some(section_id) = row.section_id {
                    lookup.release_seat(section_id);
                }
                result.failed += 1;
                result
                    .errors
                    .push(ImportRowError::new(row.row_num, "password", msg));
                continue;
            }
        };

        let create = CreateStudentRequest {
            username: row.account.username,
            email: row.account.email,
            password,
            display_name: row.account.display_name,
            roll_number: row.roll_number,
            program_id: row.program_id,
            class_id: row.class_id,
            section_id: row.section_id,
            guardian_name: row.guardian_name,
            phone: row.phone,
            address: row.address,
            date_of_birth: row.date_of_birth,
            admission_date: row.admission_date,
        };
        match storage.create_student(create).await {
            Ok(_) => result.success += 1,
            Err(e) => {
                warn!("Student import row {} failed: {}", row.row_num, e);
                if let Some(section_id) = row.section_id {
                    lookup.release_seat(section_id);
                }
                result.failed += 1;
                result
                    .errors
                    .push(ImportRowError::new(row.row_num, "row", e.message()));
            }
        }
    }

    info!(
        "Student import finished: {} created, {} skipped, {} failed",
        result.success, result.skipped, result.failed
    );
    Ok(import_response(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use crate::storage::sea_orm_storage::students::tests::seed_academics;

    #[tokio::test]
    async fn test_seats_count_rows_added_during_import() {
        let sea = SeaOrmStorage::in_memory().await;
        let (_, class_id, section_id) = seed_academics(&sea).await;
        let mut lookup = Lookup::new(Arc::new(sea));

        assert_eq!(lookup.section(class_id, "A").await.unwrap(), Some(section_id));
        assert_eq!(lookup.section(class_id, "Z").await.unwrap(), None);

        // 缩小容量以便测试
        lookup.seats.insert(
            section_id,
            Seats {
                capacity: 2,
                used: 1,
            },
        );
        assert_eq!(lookup.take_seat(section_id), Ok(()));
        assert_eq!(lookup.take_seat(section_id), Err(2));
        lookup.release_seat(section_id);
        assert_eq!(lookup.take_seat(section_id), Ok(()));
    }

    #[tokio::test]
    async fn test_codes_resolve_through_cache() {
        let sea = SeaOrmStorage::in_memory().await;
        let (program_id, class_id, _) = seed_academics(&sea).await;
        let mut lookup = Lookup::new(Arc::new(sea));

        assert_eq!(lookup.program("BSCS").await.unwrap(), Some(program_id));
        assert_eq!(lookup.program("NOPE").await.unwrap(), None);
        assert_eq!(
            lookup.class("BSCS-26F").await.unwrap(),
            Some((class_id, program_id))
        );
    }
}
