pub mod generate;
pub mod manage;
pub mod payment;
pub mod query;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::ErrorCode;
use crate::models::fees::entities::PaymentRejection;
use crate::models::fees::requests::{
    FeeQueryParams, GenerateFeesRequest, RecordPaymentRequest, WaiveFeeRequest,
};

super::lazy_storage_service!(FeeService);

impl FeeService {
    // 按专业（可细化到班级）为在读学生批量生成学费
    pub async fn generate_fees(
        &self,
        request: &HttpRequest,
        data: GenerateFeesRequest,
    ) -> ActixResult<HttpResponse> {
        generate::generate_fees(self, request, data).await
    }

    pub async fn list_fees(
        &self,
        request: &HttpRequest,
        query: FeeQueryParams,
    ) -> ActixResult<HttpResponse> {
        query::list_fees(self, request, query).await
    }

    pub async fn get_fee(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        query::get_fee(self, request, id).await
    }

    pub async fn my_fees(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        query::my_fees(self, request).await
    }

    pub async fn record_payment(
        &self,
        request: &HttpRequest,
        id: i64,
        data: RecordPaymentRequest,
    ) -> ActixResult<HttpResponse> {
        payment::record_payment(self, request, id, data).await
    }

    pub async fn waive_fee(
        &self,
        request: &HttpRequest,
        id: i64,
        data: WaiveFeeRequest,
    ) -> ActixResult<HttpResponse> {
        manage::waive_fee(self, request, id, data).await
    }

    pub async fn delete_fee(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        manage::delete_fee(self, request, id).await
    }
}

pub(crate) fn rejection_code(rejection: &PaymentRejection) -> ErrorCode {
    match rejection {
        PaymentRejection::InvalidAmount => ErrorCode::FeeInvalidAmount,
        PaymentRejection::AlreadyPaid => ErrorCode::FeeAlreadyPaid,
        PaymentRejection::Waived => ErrorCode::FeeWaived,
        PaymentRejection::Overpayment { .. } => ErrorCode::FeeOverpayment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_codes() {
        assert_eq!(
            rejection_code(&PaymentRejection::Overpayment { balance: 10 }),
            ErrorCode::FeeOverpayment
        );
        assert_eq!(
            rejection_code(&PaymentRejection::Waived),
            ErrorCode::FeeWaived
        );
        assert_eq!(
            rejection_code(&PaymentRejection::InvalidAmount),
            ErrorCode::FeeInvalidAmount
        );
    }

    #[test]
    fn test_waive_rejection_by_status() {
        use crate::models::fees::entities::FeeStatus;

        assert_eq!(manage::waive_rejection(FeeStatus::Paid).unwrap().status(), 409);
        assert_eq!(manage::waive_rejection(FeeStatus::Waived).unwrap().status(), 409);
        assert!(manage::waive_rejection(FeeStatus::Partial).is_none());
        assert!(manage::waive_rejection(FeeStatus::Overdue).is_none());
    }
}
