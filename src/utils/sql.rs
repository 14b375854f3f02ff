//! SQL 辅助函数

use sea_orm::sea_query::LikeExpr;
use sea_orm::{ColumnTrait, Condition, DbErr, SqlErr};

use crate::errors::CollegeHubError;

/// 转义 LIKE 模式中的通配符，配合 `ESCAPE '\'` 使用
pub fn escape_like_pattern(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// 任一列包含搜索词（已转义）
pub fn like_any<C: ColumnTrait>(columns: &[C], search: &str) -> Condition {
    let pattern = format!("%{}%", escape_like_pattern(search.trim()));
    columns.iter().fold(Condition::any(), |cond, col| {
        cond.add(col.like(LikeExpr::new(pattern.clone()).escape('\\')))
    })
}

/// 唯一约束冲突
pub fn is_unique_violation(err: &DbErr) -> bool {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => true,
        _ => {
            let msg = err.to_string().to_lowercase();
            msg.contains("unique constraint")
                || msg.contains("duplicate key")
                || msg.contains("duplicate entry")
        }
    }
}

/// 外键约束冲突
pub fn is_foreign_key_violation(err: &DbErr) -> bool {
    match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => true,
        _ => {
            let msg = err.to_string().to_lowercase();
            msg.contains("foreign key constraint")
                || msg.contains("violates foreign key")
                || msg.contains("a foreign key constraint fails")
        }
    }
}

/// 将写操作错误映射为业务错误：约束冲突为 409，其余为数据库错误
pub fn map_write_error(err: DbErr, context: &str) -> CollegeHubError {
    if is_unique_violation(&err) {
        CollegeHubError::conflict(format!("{context}: 数据已存在"))
    } else if is_foreign_key_violation(&err) {
        CollegeHubError::conflict(format!("{context}: 存在关联数据"))
    } else {
        CollegeHubError::database_operation(format!("{context}: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_pattern() {
        assert_eq!(escape_like_pattern("abc"), "abc");
        assert_eq!(escape_like_pattern("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like_pattern("a\\b"), "a\\\\b");
    }

    #[test]
    fn test_constraint_detection_from_message() {
        let err = DbErr::Custom("UNIQUE constraint failed: users.username".to_string());
        assert!(is_unique_violation(&err));
        assert!(!is_foreign_key_violation(&err));

        let err = DbErr::Custom("FOREIGN KEY constraint failed".to_string());
        assert!(is_foreign_key_violation(&err));

        let mapped = map_write_error(
            DbErr::Custom("UNIQUE constraint failed: departments.code".to_string()),
            "创建院系失败",
        );
        assert!(matches!(mapped, CollegeHubError::Conflict(_)));

        let mapped = map_write_error(DbErr::Custom("disk I/O error".to_string()), "x");
        assert!(matches!(mapped, CollegeHubError::DatabaseOperation(_)));
    }
}
