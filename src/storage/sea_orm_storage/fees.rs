//! 学费存储操作
//!
//! 库中只保存 `pending` / `partial` / `paid` / `waived`，逾期在读取时按当天日期推导。

use std::collections::HashSet;

use super::SeaOrmStorage;
use crate::entity::fees::{ActiveModel, Column, Entity as Fees};
use crate::errors::{CollegeHubError, Result};
use crate::models::{
    PaginatedResponse,
    common::normalize_page,
    fees::{
        entities::{Fee, FeeStatus},
        requests::{FeeListQuery, NewFee},
    },
};
use crate::utils::sql::map_write_error;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set, TransactionTrait, sea_query::Expr,
};

/// 状态筛选条件，逾期与待缴/部分缴纳互斥
pub(crate) fn status_condition(status: FeeStatus, today: &str) -> Condition {
    let open = [FeeStatus::Pending.as_str(), FeeStatus::Partial.as_str()];
    match status {
        FeeStatus::Overdue => Condition::all()
            .add(Column::Status.is_in(open))
            .add(Column::DueDate.lt(today)),
        FeeStatus::Pending | FeeStatus::Partial => Condition::all()
            .add(Column::Status.eq(status.as_str()))
            .add(Column::DueDate.gte(today)),
        FeeStatus::Paid | FeeStatus::Waived => {
            Condition::all().add(Column::Status.eq(status.as_str()))
        }
    }
}

impl SeaOrmStorage {
    /// 同一学生已有同名学费时跳过
    pub async fn generate_fees_impl(&self, fees: Vec<NewFee>) -> Result<(usize, usize)> {
        if fees.is_empty() {
            return Ok((0, 0));
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("开启事务失败: {e}")))?;

        let student_ids: Vec<i64> = fees.iter().map(|f| f.student_id).collect();
        let titles: Vec<String> = fees.iter().map(|f| f.title.clone()).collect();
        let mut existing: HashSet<(i64, String)> = Fees::find()
            .select_only()
            .column(Column::StudentId)
            .column(Column::Title)
            .filter(Column::StudentId.is_in(student_ids))
            .filter(Column::Title.is_in(titles))
            .into_tuple::<(i64, String)>()
            .all(&txn)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("查询学费失败: {e}")))?
            .into_iter()
            .collect();

        let now = Self::now();
        let (mut created, mut skipped) = (0, 0);

        for fee in fees {
            if !existing.insert((fee.student_id, fee.title.clone())) {
                skipped += 1;
                continue;
            }

            ActiveModel {
                student_id: Set(fee.student_id),
                title: Set(fee.title),
                semester: Set(fee.semester),
                amount: Set(fee.amount),
                paid_amount: Set(0),
                due_date: Set(fee.due_date),
                status: Set(FeeStatus::Pending.to_string()),
                paid_at: Set(None),
                remarks: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| map_write_error(e, "生成学费失败"))?;
            created += 1;
        }

        txn.commit()
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok((created, skipped))
    }

    pub async fn get_fee_by_id_impl(&self, id: i64) -> Result<Option<Fee>> {
        let result = Fees::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("查询学费失败: {e}")))?;

        Ok(result.map(|m| m.into_fee(Self::today())))
    }

    pub async fn list_fees_with_pagination_impl(
        &self,
        query: FeeListQuery,
    ) -> Result<PaginatedResponse<Fee>> {
        let (page, size) = normalize_page(query.page, query.size);
        let today = Self::today();
        let today_str = today.format("%Y-%m-%d").to_string();

        let mut select = Fees::find();
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(status) = query.status {
            select = select.filter(status_condition(status, &today_str));
        }
        if let Some(semester) = query.semester {
            select = select.filter(Column::Semester.eq(semester));
        }
        select = select
            .order_by_asc(Column::DueDate)
            .order_by_asc(Column::Id);

        let (models, pagination) = self.fetch_page(select, page, size, "学费").await?;

        Ok(PaginatedResponse {
            items: models.into_iter().map(|m| m.into_fee(today)).collect(),
            pagination,
        })
    }

    pub async fn list_fees_by_student_impl(&self, student_id: i64) -> Result<Vec<Fee>> {
        let today = Self::today();
        let models = Fees::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_asc(Column::Semester)
            .order_by_asc(Column::DueDate)
            .all(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("查询学费失败: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_fee(today)).collect())
    }

    /// 仅当已缴金额仍为 `expected_paid` 时写入
    pub async fn apply_fee_payment_impl(
        &self,
        id: i64,
        expected_paid: i64,
        new_paid: i64,
        status: FeeStatus,
        remarks: Option<String>,
    ) -> Result<Option<Fee>> {
        let now = Self::now();

        let mut update = Fees::update_many()
            .col_expr(Column::PaidAmount, Expr::value(new_paid))
            .col_expr(Column::Status, Expr::value(status.as_str()))
            .col_expr(Column::UpdatedAt, Expr::value(now));
        if status == FeeStatus::Paid {
            update = update.col_expr(Column::PaidAt, Expr::value(now));
        }
        if let Some(remarks) = remarks.map(|r| r.trim().to_string()).filter(|r| !r.is_empty()) {
            update = update.col_expr(Column::Remarks, Expr::value(remarks));
        }

        let result = update
            .filter(Column::Id.eq(id))
            .filter(Column::PaidAmount.eq(expected_paid))
            .filter(Column::Status.is_in([FeeStatus::Pending.as_str(), FeeStatus::Partial.as_str()]))
            .exec(&self.db)
            .await
            .map_err(|e| CollegeHubError::database_operation(format!("记录缴费失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.get_fee_by_id_impl(id).await
    }

    /// 仅待缴或部分缴纳的学费可减免，状态已变化时返回 `None`
    pub async fn waive_fee_impl(&self, id: i64, remarks: Option<String>) -> Result<Option<Fee>> {
        let mut update = Fees::update_many()
            .col_expr(Column::Status, Expr::value(FeeStatus::Waived.as_str()))
            .col_expr(Column::UpdatedAt, Expr::value(Self::now()));
        if let Some(remarks) = remarks.map(|r| r.trim().to_string()).filter(|r| !r.is_empty()) {
            update = update.col_expr(Column::Remarks, Expr::value(remarks));
        }

        let result = update
            .filter(Column::Id.eq(id))
            .filter(Column::Status.is_in([FeeStatus::Pending.as_str(), FeeStatus::Partial.as_str()]))
            .exec(&self.db)
            .await
            .map_err(|e| map_write_error(e, "减免学费失败"))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.get_fee_by_id_impl(id).await
    }

    pub async fn delete_fee_impl(&self, id: i64) -> Result<bool> {
        let result = Fees::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| map_write_error(e, "删除学费失败"))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::students::tests::{new_student, seed_academics};

    fn new_fee(student_id: i64, title: &str, due_date: &str) -> NewFee {
        NewFee {
            student_id,
            title: title.to_string(),
            semester: 1,
            amount: 50_000,
            due_date: due_date.to_string(),
        }
    }

    #[tokio::test]
    async fn test_generate_skips_existing_titles() {
        let storage = SeaOrmStorage::in_memory().await;
        let ids = seed_academics(&storage).await;
        let alice = storage
            .create_student_impl(new_student("alice", "CS-001", ids))
            .await
            .unwrap();
        let sid = alice.student.id;

        let first = storage
            .generate_fees_impl(vec![new_fee(sid, "Tuition S1", "2999-01-31")])
            .await
            .unwrap();
        assert_eq!(first, (1, 0));

        let second = storage
            .generate_fees_impl(vec![
                new_fee(sid, "Tuition S1", "2999-01-31"),
                new_fee(sid, "Lab S1", "2000-01-31"),
            ])
            .await
            .unwrap();
        assert_eq!(second, (1, 1));

        let fees = storage.list_fees_by_student_impl(sid).await.unwrap();
        assert_eq!(fees.len(), 2);

        let overdue = storage
            .list_fees_with_pagination_impl(FeeListQuery {
                status: Some(FeeStatus::Overdue),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(overdue.items.len(), 1);
        assert_eq!(overdue.items[0].title, "Lab S1");
        assert_eq!(overdue.items[0].status, FeeStatus::Overdue);

        let pending = storage
            .list_fees_with_pagination_impl(FeeListQuery {
                status: Some(FeeStatus::Pending),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(pending.items.len(), 1);
        assert_eq!(pending.items[0].title, "Tuition S1");
    }

    #[tokio::test]
    async fn test_payment_uses_optimistic_lock() {
        let storage = SeaOrmStorage::in_memory().await;
        let ids = seed_academics(&storage).await;
        let alice = storage
            .create_student_impl(new_student("alice", "CS-001", ids))
            .await
            .unwrap();
        storage
            .generate_fees_impl(vec![new_fee(alice.student.id, "Tuition S1", "2999-01-31")])
            .await
            .unwrap();
        let fee = storage
            .list_fees_by_student_impl(alice.student.id)
            .await
            .unwrap()
            .remove(0);

        let partial = storage
            .apply_fee_payment_impl(fee.id, 0, 20_000, FeeStatus::Partial, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(partial.balance, 30_000);
        assert_eq!(partial.status, FeeStatus::Partial);

        // 基于过期的已缴金额写入会被拒绝
        let stale = storage
            .apply_fee_payment_impl(fee.id, 0, 20_000, FeeStatus::Partial, None)
            .await
            .unwrap();
        assert!(stale.is_none());

        let paid = storage
            .apply_fee_payment_impl(
                fee.id,
                20_000,
                50_000,
                FeeStatus::Paid,
                Some("cash".to_string()),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(paid.status, FeeStatus::Paid);
        assert!(paid.paid_at.is_some());
        assert_eq!(paid.remarks.as_deref(), Some("cash"));

        // 已缴清的学费不能再被减免
        assert!(storage.waive_fee_impl(fee.id, None).await.unwrap().is_none());
        let still_paid = storage.get_fee_by_id_impl(fee.id).await.unwrap().unwrap();
        assert_eq!(still_paid.status, FeeStatus::Paid);
        assert!(storage.delete_fee_impl(fee.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_waive_only_open_fees() {
        let storage = SeaOrmStorage::in_memory().await;
        let ids = seed_academics(&storage).await;
        let alice = storage
            .create_student_impl(new_student("alice", "CS-001", ids))
            .await
            .unwrap();
        storage
            .generate_fees_impl(vec![new_fee(alice.student.id, "Tuition S1", "2999-01-31")])
            .await
            .unwrap();
        let fee = storage
            .list_fees_by_student_impl(alice.student.id)
            .await
            .unwrap()
            .remove(0);
        storage
            .apply_fee_payment_impl(fee.id, 0, 10_000, FeeStatus::Partial, None)
            .await
            .unwrap()
            .unwrap();

        let waived = storage
            .waive_fee_impl(fee.id, Some(" hardship ".to_string()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(waived.status, FeeStatus::Waived);
        assert_eq!(waived.paid_amount, 10_000);
        assert_eq!(waived.remarks.as_deref(), Some("hardship"));

        // 重复减免与对已减免学费缴费都不生效
        assert!(storage.waive_fee_impl(fee.id, None).await.unwrap().is_none());
        assert!(
            storage
                .apply_fee_payment_impl(fee.id, 10_000, 20_000, FeeStatus::Partial, None)
                .await
                .unwrap()
                .is_none()
        );
        assert!(storage.waive_fee_impl(9_999, None).await.unwrap().is_none());
    }
}
