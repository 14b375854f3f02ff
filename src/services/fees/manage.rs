use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::FeeService;
use crate::models::fees::entities::FeeStatus;
use crate::models::fees::requests::WaiveFeeRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{conflict, not_found};

pub async fn waive_fee(
    service: &FeeService,
    request: &HttpRequest,
    id: i64,
    data: WaiveFeeRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let Some(fee) = storage.get_fee_by_id(id).await? else {
        return Ok(not_found(ErrorCode::FeeNotFound, "Fee not found"));
    };
    if let Some(resp) = waive_rejection(fee.status) {
        return Ok(resp);
    }

    // 写入带状态条件，期间被缴清或减免时按最新状态拒绝
    match storage.waive_fee(id, data.remarks).await? {
        Some(fee) => {
            info!("Fee {} waived with balance {}", fee.id, fee.balance);
            Ok(HttpResponse::Ok().json(ApiResponse::success(fee, "Fee waived successfully")))
        }
        None => match storage.get_fee_by_id(id).await? {
            Some(fee) => Ok(waive_rejection(fee.status).unwrap_or_else(|| {
                conflict(ErrorCode::Conflict, "Fee was modified concurrently, please retry")
            })),
            None => Ok(not_found(ErrorCode::FeeNotFound, "Fee not found")),
        },
    }
}

/// 已缴清或已减免的学费不可减免
pub(super) fn waive_rejection(status: FeeStatus) -> Option<HttpResponse> {
    match status {
        FeeStatus::Paid => Some(conflict(
            ErrorCode::FeeAlreadyPaid,
            "Fee is already paid in full",
        )),
        FeeStatus::Waived => Some(conflict(ErrorCode::FeeWaived, "Fee is already waived")),
        _ => None,
    }
}

pub async fn delete_fee(
    service: &FeeService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let Some(fee) = storage.get_fee_by_id(id).await? else {
        return Ok(not_found(ErrorCode::FeeNotFound, "Fee not found"));
    };
    if fee.paid_amount > 0 {
        return Ok(conflict(
            ErrorCode::FeeHasPayments,
            "Fees with recorded payments cannot be deleted",
        ));
    }

    if !storage.delete_fee(id).await? {
        return Ok(not_found(ErrorCode::FeeNotFound, "Fee not found"));
    }
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Fee deleted successfully")))
}
