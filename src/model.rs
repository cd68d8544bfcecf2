//! Row and input types for the five resources and the aggregate views.

use crate::error::AppError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Student joined with its department name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub roll_no: String,
    pub email: String,
    pub dept_id: String,
    pub dob: NaiveDate,
    pub phone: Option<String>,
    pub dept_name: Option<String>,
}

/// Writable student fields. `None` is written as NULL on update.
#[derive(Clone, Debug, Default)]
pub struct StudentInput {
    pub name: Option<String>,
    pub roll_no: Option<String>,
    pub email: Option<String>,
    pub dept_id: Option<String>,
    pub dob: Option<NaiveDate>,
    pub phone: Option<String>,
}

/// Faculty member joined with its department name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Faculty {
    pub id: i64,
    pub name: String,
    pub department: String,
    pub email: String,
    pub phone: Option<String>,
    pub dept_name: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct FacultyInput {
    pub name: Option<String>,
    pub department: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Course joined with the assigned faculty's name and email.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: i64,
    pub course_name: String,
    pub credits: i32,
    pub faculty_id: Option<i64>,
    pub faculty_name: Option<String>,
    pub faculty_email: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct CourseInput {
    pub course_name: Option<String>,
    pub credits: Option<i32>,
    pub faculty_id: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Department {
    pub dept_id: String,
    pub dept_name: String,
}

/// `dept_id` is only read on create; it is the immutable key afterwards.
#[derive(Clone, Debug, Default)]
pub struct DepartmentInput {
    pub dept_id: Option<String>,
    pub dept_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DepartmentStats {
    pub dept_id: String,
    pub dept_name: String,
    pub student_count: i64,
    pub faculty_count: i64,
}

/// Enrollment joined with student name/roll number and course name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub enrollment_date: NaiveDate,
    pub student_name: Option<String>,
    pub roll_no: Option<String>,
    pub course_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub students: i64,
    pub faculty: i64,
    pub courses: i64,
    pub departments: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CourseEnrollmentCount {
    pub course_name: String,
    pub student_count: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reports {
    pub students_per_course: Vec<CourseEnrollmentCount>,
    pub top_courses: Vec<CourseEnrollmentCount>,
    pub avg_courses_per_faculty: f64,
}

/// Tables counted by the dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collection {
    Students,
    Faculty,
    Courses,
    Departments,
}

impl Collection {
    pub fn table(self) -> &'static str {
        match self {
            Collection::Students => "students",
            Collection::Faculty => "faculty",
            Collection::Courses => "courses",
            Collection::Departments => "departments",
        }
    }
}

/// Resource kinds, used to word the errors each one reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resource {
    Student,
    Faculty,
    Course,
    Department,
    Enrollment,
}

impl Resource {
    pub fn label(self) -> &'static str {
        match self {
            Resource::Student => "Student",
            Resource::Faculty => "Faculty",
            Resource::Course => "Course",
            Resource::Department => "Department",
            Resource::Enrollment => "Enrollment",
        }
    }

    pub fn not_found(self) -> AppError {
        AppError::NotFound(format!("{} not found", self.label()))
    }

    pub fn duplicate(self) -> AppError {
        let msg = match self {
            Resource::Student => "Duplicate entry: Roll number or email already exists",
            Resource::Faculty => "Duplicate entry: Email already exists",
            Resource::Department => "Duplicate entry: Department ID already exists",
            Resource::Enrollment => "Student is already enrolled in this course",
            Resource::Course => "Duplicate entry: Course already exists",
        };
        AppError::Conflict(msg.into())
    }

    pub fn invalid_reference(self) -> AppError {
        let msg = match self {
            Resource::Student | Resource::Faculty => "Invalid department ID",
            Resource::Course => "Invalid faculty ID",
            Resource::Enrollment => "Invalid student or course ID",
            Resource::Department => "Invalid department reference",
        };
        AppError::Reference(msg.into())
    }

    pub fn deleted_message(self) -> String {
        format!("{} deleted successfully", self.label())
    }
}

/// Returned when a department still has students or faculty.
pub fn department_has_dependents() -> AppError {
    AppError::Conflict(
        "Cannot delete department: it has associated students or faculty. Please remove them first."
            .into(),
    )
}

/// Returned when a write leaves a required column empty.
pub fn missing_required_fields() -> AppError {
    AppError::Validation("Missing required fields".into())
}
