use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashSet;
use tracing::info;

use super::{AttendanceService, validate_marks};
use crate::models::attendance::{
    requests::MarkAttendanceRequest, responses::MarkAttendanceResponse,
};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, current_user, forbidden, not_found, today};
use crate::utils::validate::parse_date;

pub async fn mark_attendance(
    service: &AttendanceService,
    request: &HttpRequest,
    data: MarkAttendanceRequest,
) -> ActixResult<HttpResponse> {
    let date = match parse_date(&data.date) {
        Ok(date) => date,
        Err(msg) => return Ok(bad_request(ErrorCode::AttendanceInvalidDate, msg)),
    };
    if date > today() {
        return Ok(bad_request(
            ErrorCode::AttendanceInvalidDate,
            "Attendance cannot be marked for a future date",
        ));
    }
    if let Err(msg) = validate_marks(&data.records) {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let storage = service.get_storage(request)?;
    let user = current_user(request)?;

    if storage.get_section_by_id(data.section_id).await?.is_none() {
        return Ok(not_found(ErrorCode::SectionNotFound, "Section not found"));
    }

    // 教师只能给自己任课或担任班主任的分班点名
    let allowed = match user.role {
        UserRole::Admin | UserRole::Staff => true,
        UserRole::Teacher => match storage.get_teacher_by_user_id(user.id).await? {
            Some(teacher) => {
                storage
                    .teacher_teaches_section(teacher.teacher.id, data.section_id)
                    .await?
            }
            None => false,
        },
        UserRole::Student => false,
    };
    if !allowed {
        return Ok(forbidden(
            ErrorCode::AttendancePermissionDenied,
            "You do not teach this section",
        ));
    }

    let enrolled: HashSet<i64> = storage
        .list_students_in_section(data.section_id)
        .await?
        .into_iter()
        .map(|s| s.student.id)
        .collect();
    let outsiders: Vec<String> = data
        .records
        .iter()
        .filter(|r| !enrolled.contains(&r.student_id))
        .map(|r| r.student_id.to_string())
        .collect();
    if !outsiders.is_empty() {
        return Ok(bad_request(
            ErrorCode::AttendanceInvalidStudent,
            format!(
                "Students not enrolled in this section: {}",
                outsiders.join(", ")
            ),
        ));
    }

    let date = date.format("%Y-%m-%d").to_string();
    let (created, updated) = storage
        .upsert_attendance(data.section_id, &date, user.id, data.records)
        .await?;
    info!(
        "Attendance for section {} on {} marked by {}: {} created, {} updated",
        data.section_id, date, user.username, created, updated
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        MarkAttendanceResponse { created, updated },
        "Attendance saved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{HttpMessage, test, web};
    use std::sync::Arc;

    use crate::models::attendance::{entities::AttendanceStatus, requests::AttendanceMark};
    use crate::models::sections::requests::UpdateSectionRequest;
    use crate::models::users::{entities::User, requests::CreateUserRequest};
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use crate::storage::sea_orm_storage::students::tests::{new_student, seed_academics};
    use crate::storage::sea_orm_storage::teachers::tests::new_teacher;

    struct Fixture {
        storage: Arc<dyn Storage>,
        section_id: i64,
        enrolled_student: i64,
        student_user: User,
        teacher_user: User,
        admin_user: User,
    }

    async fn fixture() -> Fixture {
        let sea = SeaOrmStorage::in_memory().await;
        let ids = seed_academics(&sea).await;
        let alice = sea
            .create_student_impl(new_student("alice01", "R-001", ids))
            .await
            .unwrap();
        let teacher = sea
            .create_teacher_impl(new_teacher("smith", "EMP001"))
            .await
            .unwrap();
        let admin = sea
            .create_user_impl(CreateUserRequest {
                username: "registrar".to_string(),
                email: "registrar@college.edu".to_string(),
                password: "hash".to_string(),
                role: UserRole::Admin,
                display_name: None,
                avatar_url: None,
            })
            .await
            .unwrap();

        Fixture {
            section_id: ids.2,
            enrolled_student: alice.student.id,
            student_user: sea.get_user_by_id_impl(alice.user.id).await.unwrap().unwrap(),
            teacher_user: sea.get_user_by_id_impl(teacher.user.id).await.unwrap().unwrap(),
            admin_user: admin,
            storage: Arc::new(sea),
        }
    }

    fn request_as(storage: &Arc<dyn Storage>, user: &User) -> HttpRequest {
        let req = test::TestRequest::default()
            .app_data(web::Data::new(storage.clone()))
            .to_http_request();
        req.extensions_mut().insert(user.clone());
        req
    }

    fn marks(section_id: i64, date: &str, student_ids: &[i64]) -> MarkAttendanceRequest {
        MarkAttendanceRequest {
            section_id,
            date: date.to_string(),
            records: student_ids
                .iter()
                .map(|&student_id| AttendanceMark {
                    student_id,
                    status: AttendanceStatus::Present,
                    remarks: None,
                })
                .collect(),
        }
    }

    fn today_str() -> String {
        today().format("%Y-%m-%d").to_string()
    }

    async fn mark_as(f: &Fixture, user: &User, data: MarkAttendanceRequest) -> u16 {
        let service = AttendanceService::new_lazy();
        let req = request_as(&f.storage, user);
        mark_attendance(&service, &req, data)
            .await
            .unwrap()
            .status()
            .as_u16()
    }

    #[tokio::test]
    async fn test_student_cannot_mark() {
        let f = fixture().await;
        let data = marks(f.section_id, &today_str(), &[f.enrolled_student]);
        assert_eq!(mark_as(&f, &f.student_user, data).await, 403);
    }

    #[tokio::test]
    async fn test_teacher_needs_to_teach_section() {
        let f = fixture().await;
        let data = marks(f.section_id, &today_str(), &[f.enrolled_student]);
        assert_eq!(mark_as(&f, &f.teacher_user, data.clone()).await, 403);

        // 担任班主任后可以点名
        let teacher = f
            .storage
            .get_teacher_by_user_id(f.teacher_user.id)
            .await
            .unwrap()
            .unwrap();
        f.storage
            .update_section(
                f.section_id,
                UpdateSectionRequest {
                    name: None,
                    capacity: None,
                    class_teacher_id: Some(teacher.teacher.id),
                },
            )
            .await
            .unwrap();
        assert_eq!(mark_as(&f, &f.teacher_user, data).await, 200);
    }

    #[tokio::test]
    async fn test_rejects_students_outside_section() {
        let f = fixture().await;
        let data = marks(f.section_id, &today_str(), &[f.enrolled_student, 9_999]);
        assert_eq!(mark_as(&f, &f.admin_user, data).await, 400);

        // 整批拒绝，不写入任何记录
        let records = f
            .storage
            .list_attendance_by_section_date(f.section_id, &today_str())
            .await
            .unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_rejects_future_date_and_unknown_section() {
        let f = fixture().await;
        let tomorrow = (today() + chrono::Duration::days(1))
            .format("%Y-%m-%d")
            .to_string();
        let data = marks(f.section_id, &tomorrow, &[f.enrolled_student]);
        assert_eq!(mark_as(&f, &f.admin_user, data).await, 400);

        let data = marks(f.section_id + 99, &today_str(), &[f.enrolled_student]);
        assert_eq!(mark_as(&f, &f.admin_user, data).await, 404);
    }
}
