//! 学费实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub title: String,
    pub semester: i32,
    pub amount: i64,
    pub paid_amount: i64,
    pub due_date: String,
    pub status: String,
    pub paid_at: Option<i64>,
    pub remarks: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 转换为业务模型，按 `today` 推导逾期状态
    pub fn into_fee(self, today: chrono::NaiveDate) -> crate::models::fees::entities::Fee {
        use super::ts_to_datetime;
        use crate::models::fees::entities::{Fee, FeeStatus};

        let stored = self
            .status
            .parse::<FeeStatus>()
            .unwrap_or(FeeStatus::Pending);
        let status = match chrono::NaiveDate::parse_from_str(&self.due_date, "%Y-%m-%d") {
            Ok(due) => stored.effective(due, today),
            Err(_) => stored,
        };

        Fee {
            id: self.id,
            student_id: self.student_id,
            title: self.title,
            semester: self.semester,
            amount: self.amount,
            paid_amount: self.paid_amount,
            balance: self.amount - self.paid_amount,
            due_date: self.due_date,
            status,
            paid_at: self.paid_at.map(ts_to_datetime),
            remarks: self.remarks,
            created_at: ts_to_datetime(self.created_at),
            updated_at: ts_to_datetime(self.updated_at),
        }
    }

    pub fn stored_status(&self) -> crate::models::fees::entities::FeeStatus {
        use crate::models::fees::entities::FeeStatus;
        self.status
            .parse::<FeeStatus>()
            .unwrap_or(FeeStatus::Pending)
    }
}
