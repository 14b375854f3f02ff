use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::FeeService;
use crate::models::fees::requests::{GenerateFeesRequest, NewFee};
use crate::models::fees::responses::GenerateFeesResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::bad_request;
use crate::utils::validate::{parse_date, validate_required};

pub async fn generate_fees(
    service: &FeeService,
    request: &HttpRequest,
    data: GenerateFeesRequest,
) -> ActixResult<HttpResponse> {
    let title = data.title.trim().to_string();
    if let Err(msg) = validate_required("title", &title, 100) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }
    let due_date = match parse_date(&data.due_date) {
        Ok(date) => date.format("%Y-%m-%d").to_string(),
        Err(msg) => return Ok(bad_request(ErrorCode::ValidationFailed, msg)),
    };

    let storage = service.get_storage(request)?;

    let Some(program) = storage.get_program_by_id(data.program_id).await? else {
        return Ok(bad_request(ErrorCode::ProgramNotFound, "Program does not exist"));
    };
    if data.semester < 1 || data.semester > program.duration_semesters {
        return Ok(bad_request(
            ErrorCode::ValidationFailed,
            format!(
                "Semester must be between 1 and {}",
                program.duration_semesters
            ),
        ));
    }
    if let Some(class_id) = data.class_id {
        match storage.get_class_by_id(class_id).await? {
            Some(class) if class.program_id == program.id => {}
            Some(_) => {
                return Ok(bad_request(
                    ErrorCode::ValidationFailed,
                    "Class does not belong to the program",
                ));
            }
            None => return Ok(bad_request(ErrorCode::ClassNotFound, "Class does not exist")),
        }
    }

    let amount = data.amount.unwrap_or(program.fee_per_semester);
    if amount <= 0 {
        return Ok(bad_request(
            ErrorCode::FeeInvalidAmount,
            "Fee amount must be greater than 0",
        ));
    }

    let student_ids = storage
        .list_active_student_ids(program.id, data.class_id)
        .await?;
    let total = student_ids.len();
    let fees = student_ids
        .into_iter()
        .map(|student_id| NewFee {
            student_id,
            title: title.clone(),
            semester: data.semester,
            amount,
            due_date: due_date.clone(),
        })
        .collect();

    let (created, skipped) = storage.generate_fees(fees).await?;
    info!(
        "Generated fee '{}' for program {}: {} created, {} skipped",
        title, program.code, created, skipped
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        GenerateFeesResponse {
            total,
            created,
            skipped,
        },
        "Fees generated successfully",
    )))
}
