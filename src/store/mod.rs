//! Persistence boundary: the `CollegeStore` repository and its PostgreSQL and in-memory implementations.
//!
//! Implementations classify driver failures into `AppError` variants here, once, so controllers
//! never inspect store-specific error codes. Writes return the key of the affected row (or whether
//! one matched); controllers re-read the joined row themselves.

mod memory;
mod pg;

pub use memory::MemoryStore;
pub use pg::PgStore;

use crate::error::AppError;
use crate::model::{
    Collection, Course, CourseEnrollmentCount, CourseInput, Department, DepartmentInput,
    DepartmentStats, Enrollment, Faculty, FacultyInput, Student, StudentInput,
};
use async_trait::async_trait;

/// `search: None` lists everything; `Some(term)` is a case-insensitive substring match.
#[async_trait]
pub trait CollegeStore: Send + Sync {
    /// Cheap round trip used by the readiness probe.
    async fn ping(&self) -> Result<(), AppError>;

    async fn list_students(&self, search: Option<&str>) -> Result<Vec<Student>, AppError>;
    async fn student(&self, id: i64) -> Result<Option<Student>, AppError>;
    async fn insert_student(&self, input: &StudentInput) -> Result<i64, AppError>;
    /// `Ok(false)` when no row has `id`.
    async fn update_student(&self, id: i64, input: &StudentInput) -> Result<bool, AppError>;
    async fn delete_student(&self, id: i64) -> Result<bool, AppError>;

    async fn list_faculty(&self, search: Option<&str>) -> Result<Vec<Faculty>, AppError>;
    async fn faculty(&self, id: i64) -> Result<Option<Faculty>, AppError>;
    async fn insert_faculty(&self, input: &FacultyInput) -> Result<i64, AppError>;
    async fn update_faculty(&self, id: i64, input: &FacultyInput) -> Result<bool, AppError>;
    async fn delete_faculty(&self, id: i64) -> Result<bool, AppError>;

    async fn list_courses(&self, search: Option<&str>) -> Result<Vec<Course>, AppError>;
    async fn course(&self, id: i64) -> Result<Option<Course>, AppError>;
    async fn insert_course(&self, input: &CourseInput) -> Result<i64, AppError>;
    async fn update_course(&self, id: i64, input: &CourseInput) -> Result<bool, AppError>;
    async fn delete_course(&self, id: i64) -> Result<bool, AppError>;
    /// Set or clear a course's faculty. NotFound for an unknown course or faculty; the course is left unchanged then.
    async fn assign_faculty(&self, course_id: i64, faculty_id: Option<i64>) -> Result<(), AppError>;

    async fn list_departments(&self, search: Option<&str>) -> Result<Vec<Department>, AppError>;
    async fn department(&self, dept_id: &str) -> Result<Option<Department>, AppError>;
    async fn insert_department(&self, input: &DepartmentInput) -> Result<String, AppError>;
    async fn update_department(&self, dept_id: &str, input: &DepartmentInput) -> Result<bool, AppError>;
    /// Conflict while any student or faculty references the department.
    async fn delete_department(&self, dept_id: &str) -> Result<bool, AppError>;
    async fn department_stats(&self) -> Result<Vec<DepartmentStats>, AppError>;

    async fn list_enrollments(&self) -> Result<Vec<Enrollment>, AppError>;
    async fn enrollment(&self, id: i64) -> Result<Option<Enrollment>, AppError>;
    /// NotFound for an unknown student or course, Conflict when the pair is already enrolled.
    async fn insert_enrollment(&self, student_id: i64, course_id: i64) -> Result<i64, AppError>;
    async fn delete_enrollment(&self, id: i64) -> Result<bool, AppError>;

    async fn count(&self, collection: Collection) -> Result<i64, AppError>;
    /// Enrollment count per course, ordered by course name.
    async fn students_per_course(&self) -> Result<Vec<CourseEnrollmentCount>, AppError>;
    /// Courses with the most enrollments, highest first.
    async fn top_courses(&self, limit: i64) -> Result<Vec<CourseEnrollmentCount>, AppError>;
    /// Mean courses taught per faculty member; 0 with no faculty.
    async fn avg_courses_per_faculty(&self) -> Result<f64, AppError>;
}
