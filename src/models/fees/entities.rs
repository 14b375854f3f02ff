//! 学费记录与缴费状态流转
//!
//! 金额一律以最小货币单位（分）存储。`overdue` 不落库，
//! 由 `pending` / `partial` 且已过截止日期推导得出。

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 学费状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub enum FeeStatus {
    Pending, // 待缴
    Partial, // 部分缴纳
    Paid,    // 已结清
    Waived,  // 已减免
    Overdue, // 逾期（推导）
}

crate::impl_string_enum!(FeeStatus {
    Pending => "pending",
    Partial => "partial",
    Paid => "paid",
    Waived => "waived",
    Overdue => "overdue",
});

impl FeeStatus {
    /// 对外展示的状态
    pub fn effective(self, due_date: NaiveDate, today: NaiveDate) -> FeeStatus {
        match self {
            FeeStatus::Pending | FeeStatus::Partial if due_date < today => FeeStatus::Overdue,
            other => other,
        }
    }

    pub fn is_open(self) -> bool {
        matches!(self, FeeStatus::Pending | FeeStatus::Partial | FeeStatus::Overdue)
    }
}

// 学费记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct Fee {
    pub id: i64,
    pub student_id: i64,
    pub title: String,
    pub semester: i32,
    pub amount: i64,
    pub paid_amount: i64,
    // 未缴余额
    pub balance: i64,
    pub due_date: String,
    // 已含逾期推导
    pub status: FeeStatus,
    pub paid_at: Option<chrono::DateTime<chrono::Utc>>,
    pub remarks: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 缴费被拒绝的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentRejection {
    InvalidAmount,
    AlreadyPaid,
    Waived,
    Overpayment { balance: i64 },
}

impl std::fmt::Display for PaymentRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAmount => write!(f, "缴费金额必须大于 0"),
            Self::AlreadyPaid => write!(f, "该学费已结清"),
            Self::Waived => write!(f, "该学费已减免"),
            Self::Overpayment { balance } => write!(f, "缴费金额超出未缴余额 {balance}"),
        }
    }
}

/// 计算一次缴费后的已缴金额与状态
pub fn apply_payment(
    amount: i64,
    paid_amount: i64,
    status: FeeStatus,
    payment: i64,
) -> Result<(i64, FeeStatus), PaymentRejection> {
    match status {
        FeeStatus::Paid => return Err(PaymentRejection::AlreadyPaid),
        FeeStatus::Waived => return Err(PaymentRejection::Waived),
        _ => {}
    }
    if payment <= 0 {
        return Err(PaymentRejection::InvalidAmount);
    }

    let balance = amount - paid_amount;
    if payment > balance {
        return Err(PaymentRejection::Overpayment { balance });
    }

    let new_paid = paid_amount + payment;
    let new_status = if new_paid >= amount {
        FeeStatus::Paid
    } else {
        FeeStatus::Partial
    };
    Ok((new_paid, new_status))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_effective_status_overdue() {
        let today = d("2025-03-10");
        assert_eq!(FeeStatus::Pending.effective(d("2025-03-09"), today), FeeStatus::Overdue);
        assert_eq!(FeeStatus::Partial.effective(d("2025-01-01"), today), FeeStatus::Overdue);
        assert_eq!(FeeStatus::Pending.effective(d("2025-03-10"), today), FeeStatus::Pending);
        assert_eq!(FeeStatus::Paid.effective(d("2025-01-01"), today), FeeStatus::Paid);
        assert_eq!(FeeStatus::Waived.effective(d("2025-01-01"), today), FeeStatus::Waived);
    }

    #[test]
    fn test_partial_then_paid() {
        let (paid, status) = apply_payment(50_000, 0, FeeStatus::Pending, 20_000).unwrap();
        assert_eq!((paid, status), (20_000, FeeStatus::Partial));

        let (paid, status) = apply_payment(50_000, paid, status, 30_000).unwrap();
        assert_eq!((paid, status), (50_000, FeeStatus::Paid));
    }

    #[test]
    fn test_payment_rejections() {
        assert_eq!(
            apply_payment(100, 0, FeeStatus::Pending, 0),
            Err(PaymentRejection::InvalidAmount)
        );
        assert_eq!(
            apply_payment(100, 40, FeeStatus::Partial, 61),
            Err(PaymentRejection::Overpayment { balance: 60 })
        );
        assert_eq!(
            apply_payment(100, 100, FeeStatus::Paid, 1),
            Err(PaymentRejection::AlreadyPaid)
        );
        assert_eq!(
            apply_payment(100, 0, FeeStatus::Waived, 10),
            Err(PaymentRejection::Waived)
        );
    }
}
