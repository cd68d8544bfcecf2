//! PostgreSQL store. Reads go through the joined views in `sql::views`; every value is bound.

use super::CollegeStore;
use crate::error::AppError;
use crate::model::{
    department_has_dependents, missing_required_fields, Collection, Course, CourseEnrollmentCount,
    CourseInput, Department, DepartmentInput, DepartmentStats, Enrollment, Faculty, FacultyInput,
    Resource, Student, StudentInput,
};
use crate::sql::{views, JoinedSelect, QueryBuf};
use async_trait::async_trait;
use sqlx::error::ErrorKind;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::PgPool;
use std::time::Duration;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }

    /// Open a pool against `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;
        Ok(PgStore { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn fetch_all<T>(&self, q: &QueryBuf) -> Result<Vec<T>, AppError>
    where
        T: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
    {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query_as::<_, T>(&q.sql);
        for p in &q.params {
            query = query.bind(p);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn list_view<T>(&self, view: &JoinedSelect, search: Option<&str>) -> Result<Vec<T>, AppError>
    where
        T: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
    {
        let q = match search {
            Some(term) => view.search(term),
            None => view.list(),
        };
        self.fetch_all(&q).await
    }

    async fn by_id<T>(&self, view: &JoinedSelect, id: i64) -> Result<Option<T>, AppError>
    where
        T: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
    {
        let sql = view.by_key();
        tracing::debug!(sql = %sql, id, "query");
        Ok(sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_by_id(&self, table: &str, id: i64) -> Result<bool, AppError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", table);
        tracing::debug!(sql = %sql, id, "query");
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Map constraint violations on a write to the resource's error; anything else stays a database error.
fn classify(err: sqlx::Error, resource: Resource) -> AppError {
    if let sqlx::Error::Database(db) = &err {
        match db.kind() {
            ErrorKind::UniqueViolation => return resource.duplicate(),
            ErrorKind::ForeignKeyViolation => return resource.invalid_reference(),
            ErrorKind::NotNullViolation => return missing_required_fields(),
            _ => {}
        }
    }
    AppError::Db(err)
}

#[async_trait]
impl CollegeStore for PgStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_students(&self, search: Option<&str>) -> Result<Vec<Student>, AppError> {
        self.list_view(&views::STUDENTS, search).await
    }

    async fn student(&self, id: i64) -> Result<Option<Student>, AppError> {
        self.by_id(&views::STUDENTS, id).await
    }

    async fn insert_student(&self, input: &StudentInput) -> Result<i64, AppError> {
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO students (name, roll_no, email, dept_id, dob, phone) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(input.name.as_deref())
        .bind(input.roll_no.as_deref())
        .bind(input.email.as_deref())
        .bind(input.dept_id.as_deref())
        .bind(input.dob)
        .bind(input.phone.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify(e, Resource::Student))?;
        Ok(id)
    }

    async fn update_student(&self, id: i64, input: &StudentInput) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE students SET name = $1, roll_no = $2, email = $3, dept_id = $4, dob = $5, phone = $6 \
             WHERE id = $7",
        )
        .bind(input.name.as_deref())
        .bind(input.roll_no.as_deref())
        .bind(input.email.as_deref())
        .bind(input.dept_id.as_deref())
        .bind(input.dob)
        .bind(input.phone.as_deref())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| classify(e, Resource::Student))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_student(&self, id: i64) -> Result<bool, AppError> {
        self.delete_by_id("students", id).await
    }

    async fn list_faculty(&self, search: Option<&str>) -> Result<Vec<Faculty>, AppError> {
        self.list_view(&views::FACULTY, search).await
    }

    async fn faculty(&self, id: i64) -> Result<Option<Faculty>, AppError> {
        self.by_id(&views::FACULTY, id).await
    }

    async fn insert_faculty(&self, input: &FacultyInput) -> Result<i64, AppError> {
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO faculty (name, department, email, phone) VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(input.name.as_deref())
        .bind(input.department.as_deref())
        .bind(input.email.as_deref())
        .bind(input.phone.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify(e, Resource::Faculty))?;
        Ok(id)
    }

    async fn update_faculty(&self, id: i64, input: &FacultyInput) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE faculty SET name = $1, department = $2, email = $3, phone = $4 WHERE id = $5",
        )
        .bind(input.name.as_deref())
        .bind(input.department.as_deref())
        .bind(input.email.as_deref())
        .bind(input.phone.as_deref())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| classify(e, Resource::Faculty))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_faculty(&self, id: i64) -> Result<bool, AppError> {
        self.delete_by_id("faculty", id).await
    }

    async fn list_courses(&self, search: Option<&str>) -> Result<Vec<Course>, AppError> {
        self.list_view(&views::COURSES, search).await
    }

    async fn course(&self, id: i64) -> Result<Option<Course>, AppError> {
        self.by_id(&views::COURSES, id).await
    }

    async fn insert_course(&self, input: &CourseInput) -> Result<i64, AppError> {
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO courses (course_name, credits, faculty_id) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(input.course_name.as_deref())
        .bind(input.credits)
        .bind(input.faculty_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify(e, Resource::Course))?;
        Ok(id)
    }

    async fn update_course(&self, id: i64, input: &CourseInput) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE courses SET course_name = $1, credits = $2, faculty_id = $3 WHERE id = $4",
        )
        .bind(input.course_name.as_deref())
        .bind(input.credits)
        .bind(input.faculty_id)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| classify(e, Resource::Course))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_course(&self, id: i64) -> Result<bool, AppError> {
        self.delete_by_id("courses", id).await
    }

    async fn assign_faculty(&self, course_id: i64, faculty_id: Option<i64>) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        let course: Option<(i64,)> = sqlx::query_as("SELECT id FROM courses WHERE id = $1 FOR UPDATE")
            .bind(course_id)
            .fetch_optional(&mut *tx)
            .await?;
        if course.is_none() {
            return Err(Resource::Course.not_found());
        }
        if let Some(fid) = faculty_id {
            let faculty: Option<(i64,)> =
                sqlx::query_as("SELECT id FROM faculty WHERE id = $1 FOR KEY SHARE")
                    .bind(fid)
                    .fetch_optional(&mut *tx)
                    .await?;
            if faculty.is_none() {
                return Err(Resource::Faculty.not_found());
            }
        }
        sqlx::query("UPDATE courses SET faculty_id = $1 WHERE id = $2")
            .bind(faculty_id)
            .bind(course_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| classify(e, Resource::Course))?;
        tx.commit().await?;
        Ok(())
    }

    async fn list_departments(&self, search: Option<&str>) -> Result<Vec<Department>, AppError> {
        self.list_view(&views::DEPARTMENTS, search).await
    }

    async fn department(&self, dept_id: &str) -> Result<Option<Department>, AppError> {
        let sql = views::DEPARTMENTS.by_key();
        tracing::debug!(sql = %sql, dept_id, "query");
        Ok(sqlx::query_as::<_, Department>(&sql)
            .bind(dept_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_department(&self, input: &DepartmentInput) -> Result<String, AppError> {
        let (dept_id,): (String,) = sqlx::query_as(
            "INSERT INTO departments (dept_id, dept_name) VALUES ($1, $2) RETURNING dept_id",
        )
        .bind(input.dept_id.as_deref())
        .bind(input.dept_name.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify(e, Resource::Department))?;
        Ok(dept_id)
    }

    async fn update_department(&self, dept_id: &str, input: &DepartmentInput) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE departments SET dept_name = $1 WHERE dept_id = $2")
            .bind(input.dept_name.as_deref())
            .bind(dept_id)
            .execute(&self.pool)
            .await
            .map_err(|e| classify(e, Resource::Department))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_department(&self, dept_id: &str) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;
        let found: Option<(String,)> =
            sqlx::query_as("SELECT dept_id FROM departments WHERE dept_id = $1 FOR UPDATE")
                .bind(dept_id)
                .fetch_optional(&mut *tx)
                .await?;
        if found.is_none() {
            return Ok(false);
        }
        let (dependents,): (i64,) = sqlx::query_as(
            "SELECT (SELECT COUNT(*) FROM students WHERE dept_id = $1) \
                  + (SELECT COUNT(*) FROM faculty WHERE department = $1)",
        )
        .bind(dept_id)
        .fetch_one(&mut *tx)
        .await?;
        if dependents > 0 {
            return Err(department_has_dependents());
        }
        sqlx::query("DELETE FROM departments WHERE dept_id = $1")
            .bind(dept_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| match classify(e, Resource::Department) {
                AppError::Reference(_) => department_has_dependents(),
                other => other,
            })?;
        tx.commit().await?;
        Ok(true)
    }

    async fn department_stats(&self) -> Result<Vec<DepartmentStats>, AppError> {
        tracing::debug!(sql = %views::DEPARTMENT_STATS, "query");
        Ok(sqlx::query_as::<_, DepartmentStats>(views::DEPARTMENT_STATS)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_enrollments(&self) -> Result<Vec<Enrollment>, AppError> {
        self.list_view(&views::ENROLLMENTS, None).await
    }

    async fn enrollment(&self, id: i64) -> Result<Option<Enrollment>, AppError> {
        self.by_id(&views::ENROLLMENTS, id).await
    }

    async fn insert_enrollment(&self, student_id: i64, course_id: i64) -> Result<i64, AppError> {
        let mut tx = self.pool.begin().await?;
        let student: Option<(i64,)> = sqlx::query_as("SELECT id FROM students WHERE id = $1 FOR KEY SHARE")
            .bind(student_id)
            .fetch_optional(&mut *tx)
            .await?;
        if student.is_none() {
            return Err(Resource::Student.not_found());
        }
        let course: Option<(i64,)> = sqlx::query_as("SELECT id FROM courses WHERE id = $1 FOR KEY SHARE")
            .bind(course_id)
            .fetch_optional(&mut *tx)
            .await?;
        if course.is_none() {
            return Err(Resource::Course.not_found());
        }
        // Not race-free: two transactions can both pass this check before either inserts.
        let existing: Option<(i64,)> = sqlx::query_as(
            "SELECT id FROM enrollments WHERE student_id = $1 AND course_id = $2 LIMIT 1",
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_optional(&mut *tx)
        .await?;
        if existing.is_some() {
            return Err(Resource::Enrollment.duplicate());
        }
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO enrollments (student_id, course_id) VALUES ($1, $2) RETURNING id",
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| classify(e, Resource::Enrollment))?;
        tx.commit().await?;
        Ok(id)
    }

    async fn delete_enrollment(&self, id: i64) -> Result<bool, AppError> {
        self.delete_by_id("enrollments", id).await
    }

    async fn count(&self, collection: Collection) -> Result<i64, AppError> {
        let sql = format!("SELECT COUNT(*) FROM {}", collection.table());
        Ok(sqlx::query_scalar::<_, i64>(&sql).fetch_one(&self.pool).await?)
    }

    async fn students_per_course(&self) -> Result<Vec<CourseEnrollmentCount>, AppError> {
        Ok(sqlx::query_as::<_, CourseEnrollmentCount>(views::STUDENTS_PER_COURSE)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn top_courses(&self, limit: i64) -> Result<Vec<CourseEnrollmentCount>, AppError> {
        Ok(sqlx::query_as::<_, CourseEnrollmentCount>(views::TOP_COURSES)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn avg_courses_per_faculty(&self) -> Result<f64, AppError> {
        Ok(sqlx::query_scalar::<_, f64>(views::AVG_COURSES_PER_FACULTY)
            .fetch_one(&self.pool)
            .await?)
    }
}
