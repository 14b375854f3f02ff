use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{FeeService, rejection_code};
use crate::models::fees::entities::{FeeStatus, PaymentRejection, apply_payment};
use crate::models::fees::requests::RecordPaymentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, conflict, current_user, not_found};

pub async fn record_payment(
    service: &FeeService,
    request: &HttpRequest,
    id: i64,
    data: RecordPaymentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;

    let Some(fee) = storage.get_fee_by_id(id).await? else {
        return Ok(not_found(ErrorCode::FeeNotFound, "Fee not found"));
    };

    // 逾期只是展示状态，按已缴金额还原
    let stored_status = match fee.status {
        FeeStatus::Overdue if fee.paid_amount > 0 => FeeStatus::Partial,
        FeeStatus::Overdue => FeeStatus::Pending,
        other => other,
    };

    let (new_paid, new_status) =
        match apply_payment(fee.amount, fee.paid_amount, stored_status, data.amount) {
            Ok(next) => next,
            Err(rejection) => {
                let code = rejection_code(&rejection);
                let message = rejection.to_string();
                return Ok(match rejection {
                    PaymentRejection::AlreadyPaid | PaymentRejection::Waived => {
                        conflict(code, message)
                    }
                    _ => bad_request(code, message),
                });
            }
        };

    let Some(updated) = storage
        .apply_fee_payment(id, fee.paid_amount, new_paid, new_status, data.remarks)
        .await?
    else {
        return Ok(conflict(
            ErrorCode::Conflict,
            "Fee was modified concurrently, please retry",
        ));
    };

    info!(
        "Payment of {} recorded on fee {} by {} ({} -> {})",
        data.amount, id, user.username, fee.paid_amount, new_paid
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        updated,
        "Payment recorded successfully",
    )))
}
