//! Resource controllers: parse request fields, call the store, re-read the joined row.

use super::validation::Fields;
use crate::error::AppError;
use crate::model::{
    missing_required_fields, Course, CourseInput, Department, DepartmentInput, DepartmentStats,
    Enrollment, Faculty, FacultyInput, Resource, Student, StudentInput,
};
use crate::store::CollegeStore;
use serde_json::Value;

/// Numeric path key. Anything unparsable cannot name a row, so it reads as NotFound.
pub fn parse_id(raw: &str, resource: Resource) -> Result<i64, AppError> {
    raw.trim().parse().map_err(|_| resource.not_found())
}

/// An empty query lists everything.
fn search_term(q: Option<&str>) -> Option<&str> {
    q.filter(|s| !s.is_empty())
}

pub struct StudentService;

impl StudentService {
    const REQUIRED: &'static [&'static str] = &["name", "roll_no", "email", "dept_id", "dob"];

    fn input(f: &Fields) -> Result<StudentInput, AppError> {
        Ok(StudentInput {
            name: f.text("name")?,
            roll_no: f.text("roll_no")?,
            email: f.text("email")?,
            dept_id: f.text("dept_id")?,
            dob: f.date("dob")?,
            phone: f.text("phone")?,
        })
    }

    pub async fn list(store: &dyn CollegeStore) -> Result<Vec<Student>, AppError> {
        store.list_students(None).await
    }

    pub async fn search(store: &dyn CollegeStore, q: Option<&str>) -> Result<Vec<Student>, AppError> {
        store.list_students(search_term(q)).await
    }

    pub async fn get(store: &dyn CollegeStore, id: i64) -> Result<Student, AppError> {
        store
            .student(id)
            .await?
            .ok_or_else(|| Resource::Student.not_found())
    }

    pub async fn create(store: &dyn CollegeStore, body: Value) -> Result<Student, AppError> {
        let f = Fields::from_body(body)?;
        f.require(Self::REQUIRED)?;
        let id = store.insert_student(&Self::input(&f)?).await?;
        tracing::info!(id, "student created");
        Self::get(store, id).await
    }

    pub async fn update(store: &dyn CollegeStore, id: i64, body: Value) -> Result<Student, AppError> {
        Self::get(store, id).await?;
        let f = Fields::from_body(body)?;
        if !store.update_student(id, &Self::input(&f)?).await? {
            return Err(Resource::Student.not_found());
        }
        Self::get(store, id).await
    }

    pub async fn delete(store: &dyn CollegeStore, id: i64) -> Result<(), AppError> {
        if !store.delete_student(id).await? {
            return Err(Resource::Student.not_found());
        }
        tracing::info!(id, "student deleted");
        Ok(())
    }
}

pub struct FacultyService;

impl FacultyService {
    const REQUIRED: &'static [&'static str] = &["name", "department", "email"];

    fn input(f: &Fields) -> Result<FacultyInput, AppError> {
        Ok(FacultyInput {
            name: f.text("name")?,
            department: f.text("department")?,
            email: f.text("email")?,
            phone: f.text("phone")?,
        })
    }

    pub async fn list(store: &dyn CollegeStore) -> Result<Vec<Faculty>, AppError> {
        store.list_faculty(None).await
    }

    pub async fn search(store: &dyn CollegeStore, q: Option<&str>) -> Result<Vec<Faculty>, AppError> {
        store.list_faculty(search_term(q)).await
    }

    pub async fn get(store: &dyn CollegeStore, id: i64) -> Result<Faculty, AppError> {
        store
            .faculty(id)
            .await?
            .ok_or_else(|| Resource::Faculty.not_found())
    }

    pub async fn create(store: &dyn CollegeStore, body: Value) -> Result<Faculty, AppError> {
        let f = Fields::from_body(body)?;
        f.require(Self::REQUIRED)?;
        let id = store.insert_faculty(&Self::input(&f)?).await?;
        tracing::info!(id, "faculty created");
        Self::get(store, id).await
    }

    pub async fn update(store: &dyn CollegeStore, id: i64, body: Value) -> Result<Faculty, AppError> {
        Self::get(store, id).await?;
        let f = Fields::from_body(body)?;
        if !store.update_faculty(id, &Self::input(&f)?).await? {
            return Err(Resource::Faculty.not_found());
        }
        Self::get(store, id).await
    }

    pub async fn delete(store: &dyn CollegeStore, id: i64) -> Result<(), AppError> {
        if !store.delete_faculty(id).await? {
            return Err(Resource::Faculty.not_found());
        }
        tracing::info!(id, "faculty deleted");
        Ok(())
    }
}

pub struct CourseService;

impl CourseService {
    const REQUIRED: &'static [&'static str] = &["course_name", "credits"];

    fn input(f: &Fields) -> Result<CourseInput, AppError> {
        Ok(CourseInput {
            course_name: f.text("course_name")?,
            credits: f.int("credits")?,
            faculty_id: f.reference("faculty_id", || Resource::Course.invalid_reference())?,
        })
    }

    pub async fn list(store: &dyn CollegeStore) -> Result<Vec<Course>, AppError> {
        store.list_courses(None).await
    }

    pub async fn search(store: &dyn CollegeStore, q: Option<&str>) -> Result<Vec<Course>, AppError> {
        store.list_courses(search_term(q)).await
    }

    pub async fn get(store: &dyn CollegeStore, id: i64) -> Result<Course, AppError> {
        store
            .course(id)
            .await?
            .ok_or_else(|| Resource::Course.not_found())
    }

    pub async fn create(store: &dyn CollegeStore, body: Value) -> Result<Course, AppError> {
        let f = Fields::from_body(body)?;
        f.require(Self::REQUIRED)?;
        let id = store.insert_course(&Self::input(&f)?).await?;
        tracing::info!(id, "course created");
        Self::get(store, id).await
    }

    pub async fn update(store: &dyn CollegeStore, id: i64, body: Value) -> Result<Course, AppError> {
        Self::get(store, id).await?;
        let f = Fields::from_body(body)?;
        if !store.update_course(id, &Self::input(&f)?).await? {
            return Err(Resource::Course.not_found());
        }
        Self::get(store, id).await
    }

    pub async fn delete(store: &dyn CollegeStore, id: i64) -> Result<(), AppError> {
        if !store.delete_course(id).await? {
            return Err(Resource::Course.not_found());
        }
        tracing::info!(id, "course deleted");
        Ok(())
    }

    /// Body `{course_id, faculty_id}`; an absent `faculty_id` clears the assignment.
    pub async fn assign_faculty(store: &dyn CollegeStore, body: Value) -> Result<Course, AppError> {
        let f = Fields::from_body(body)?;
        f.require(&["course_id"])?;
        let course_id = f
            .reference("course_id", || Resource::Course.not_found())?
            .ok_or_else(missing_required_fields)?;
        let faculty_id = f.reference("faculty_id", || Resource::Faculty.not_found())?;
        store.assign_faculty(course_id, faculty_id).await?;
        tracing::info!(course_id, faculty_id = ?faculty_id, "faculty assigned");
        Self::get(store, course_id).await
    }
}

pub struct DepartmentService;

impl DepartmentService {
    const REQUIRED: &'static [&'static str] = &["dept_id", "dept_name"];

    pub async fn list(store: &dyn CollegeStore) -> Result<Vec<Department>, AppError> {
        store.list_departments(None).await
    }

    pub async fn search(store: &dyn CollegeStore, q: Option<&str>) -> Result<Vec<Department>, AppError> {
        store.list_departments(search_term(q)).await
    }

    pub async fn get(store: &dyn CollegeStore, dept_id: &str) -> Result<Department, AppError> {
        store
            .department(dept_id)
            .await?
            .ok_or_else(|| Resource::Department.not_found())
    }

    pub async fn create(store: &dyn CollegeStore, body: Value) -> Result<Department, AppError> {
        let f = Fields::from_body(body)?;
        f.require(Self::REQUIRED)?;
        let input = DepartmentInput {
            dept_id: f.text("dept_id")?,
            dept_name: f.text("dept_name")?,
        };
        let dept_id = store.insert_department(&input).await?;
        tracing::info!(dept_id = %dept_id, "department created");
        Self::get(store, &dept_id).await
    }

    /// Only `dept_name` is writable; the key in the body is ignored.
    pub async fn update(store: &dyn CollegeStore, dept_id: &str, body: Value) -> Result<Department, AppError> {
        Self::get(store, dept_id).await?;
        let f = Fields::from_body(body)?;
        let input = DepartmentInput {
            dept_id: None,
            dept_name: f.text("dept_name")?,
        };
        if !store.update_department(dept_id, &input).await? {
            return Err(Resource::Department.not_found());
        }
        Self::get(store, dept_id).await
    }

    pub async fn delete(store: &dyn CollegeStore, dept_id: &str) -> Result<(), AppError> {
        if !store.delete_department(dept_id).await? {
            return Err(Resource::Department.not_found());
        }
        tracing::info!(dept_id = %dept_id, "department deleted");
        Ok(())
    }

    pub async fn stats(store: &dyn CollegeStore) -> Result<Vec<DepartmentStats>, AppError> {
        store.department_stats().await
    }
}

pub struct EnrollmentService;

impl EnrollmentService {
    pub async fn list(store: &dyn CollegeStore) -> Result<Vec<Enrollment>, AppError> {
        store.list_enrollments().await
    }

    pub async fn get(store: &dyn CollegeStore, id: i64) -> Result<Enrollment, AppError> {
        store
            .enrollment(id)
            .await?
            .ok_or_else(|| Resource::Enrollment.not_found())
    }

    pub async fn create(store: &dyn CollegeStore, body: Value) -> Result<Enrollment, AppError> {
        let f = Fields::from_body(body)?;
        f.require(&["student_id", "course_id"])?;
        let student_id = f.reference("student_id", || Resource::Student.not_found())?;
        let course_id = f.reference("course_id", || Resource::Course.not_found())?;
        let (Some(student_id), Some(course_id)) = (student_id, course_id) else {
            return Err(missing_required_fields());
        };
        let id = store.insert_enrollment(student_id, course_id).await?;
        tracing::info!(id, student_id, course_id, "enrollment created");
        Self::get(store, id).await
    }

    pub async fn delete(store: &dyn CollegeStore, id: i64) -> Result<(), AppError> {
        if !store.delete_enrollment(id).await? {
            return Err(Resource::Enrollment.not_found());
        }
        tracing::info!(id, "enrollment deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparsable_id_is_not_found() {
        let err = parse_id("abc", Resource::Student).unwrap_err();
        assert_eq!(err.code(), "not_found");
        assert_eq!(err.to_string(), "Student not found");
        assert_eq!(parse_id("42", Resource::Course).unwrap(), 42);
    }

    #[test]
    fn empty_query_means_no_filter() {
        assert_eq!(search_term(Some("")), None);
        assert_eq!(search_term(None), None);
        assert_eq!(search_term(Some("ali")), Some("ali"));
    }
}
