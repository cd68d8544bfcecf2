//! In-process store for offline demos and tests. Mirrors the PostgreSQL schema: NOT NULL, UNIQUE
//! and foreign-key checks in that order, `ON DELETE SET NULL` for course faculty, `ON DELETE CASCADE`
//! for enrollments, joins and key ordering as in `sql::views`.

use super::CollegeStore;
use crate::error::AppError;
use crate::model::{
    department_has_dependents, missing_required_fields, Collection, Course, CourseEnrollmentCount,
    CourseInput, Department, DepartmentInput, DepartmentStats, Enrollment, Faculty, FacultyInput,
    Resource, Student, StudentInput,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Clone, Debug)]
struct StudentRecord {
    id: i64,
    name: String,
    roll_no: String,
    email: String,
    dept_id: String,
    dob: NaiveDate,
    phone: Option<String>,
}

#[derive(Clone, Debug)]
struct FacultyRecord {
    id: i64,
    name: String,
    department: String,
    email: String,
    phone: Option<String>,
}

#[derive(Clone, Debug)]
struct CourseRecord {
    id: i64,
    course_name: String,
    credits: i32,
    faculty_id: Option<i64>,
}

#[derive(Clone, Debug)]
struct EnrollmentRecord {
    id: i64,
    student_id: i64,
    course_id: i64,
    enrollment_date: NaiveDate,
}

#[derive(Default)]
struct Sequence(i64);

impl Sequence {
    fn next(&mut self) -> i64 {
        self.0 += 1;
        self.0
    }
}

/// Rows are kept in insertion order, which is key order for the numeric ids.
#[derive(Default)]
struct Tables {
    departments: Vec<Department>,
    students: Vec<StudentRecord>,
    faculty: Vec<FacultyRecord>,
    courses: Vec<CourseRecord>,
    enrollments: Vec<EnrollmentRecord>,
    student_seq: Sequence,
    faculty_seq: Sequence,
    course_seq: Sequence,
    enrollment_seq: Sequence,
}

impl Tables {
    fn dept_name(&self, dept_id: &str) -> Option<String> {
        self.departments
            .iter()
            .find(|d| d.dept_id == dept_id)
            .map(|d| d.dept_name.clone())
    }

    fn has_department(&self, dept_id: &str) -> bool {
        self.departments.iter().any(|d| d.dept_id == dept_id)
    }

    fn has_faculty(&self, id: i64) -> bool {
        self.faculty.iter().any(|f| f.id == id)
    }

    fn join_student(&self, s: &StudentRecord) -> Student {
        Student {
            id: s.id,
            name: s.name.clone(),
            roll_no: s.roll_no.clone(),
            email: s.email.clone(),
            dept_id: s.dept_id.clone(),
            dob: s.dob,
            phone: s.phone.clone(),
            dept_name: self.dept_name(&s.dept_id),
        }
    }

    fn join_faculty(&self, f: &FacultyRecord) -> Faculty {
        Faculty {
            id: f.id,
            name: f.name.clone(),
            department: f.department.clone(),
            email: f.email.clone(),
            phone: f.phone.clone(),
            dept_name: self.dept_name(&f.department),
        }
    }

    fn join_course(&self, c: &CourseRecord) -> Course {
        let assigned = c
            .faculty_id
            .and_then(|fid| self.faculty.iter().find(|f| f.id == fid));
        Course {
            id: c.id,
            course_name: c.course_name.clone(),
            credits: c.credits,
            faculty_id: c.faculty_id,
            faculty_name: assigned.map(|f| f.name.clone()),
            faculty_email: assigned.map(|f| f.email.clone()),
        }
    }

    fn join_enrollment(&self, e: &EnrollmentRecord) -> Enrollment {
        let student = self.students.iter().find(|s| s.id == e.student_id);
        let course = self.courses.iter().find(|c| c.id == e.course_id);
        Enrollment {
            id: e.id,
            student_id: e.student_id,
            course_id: e.course_id,
            enrollment_date: e.enrollment_date,
            student_name: student.map(|s| s.name.clone()),
            roll_no: student.map(|s| s.roll_no.clone()),
            course_name: course.map(|c| c.course_name.clone()),
        }
    }

    fn enrollment_count(&self, course_id: i64) -> i64 {
        self.enrollments.iter().filter(|e| e.course_id == course_id).count() as i64
    }

    fn validate_student(&self, id: Option<i64>, input: &StudentInput) -> Result<StudentRecord, AppError> {
        let record = StudentRecord {
            id: id.unwrap_or_default(),
            name: required(&input.name)?,
            roll_no: required(&input.roll_no)?,
            email: required(&input.email)?,
            dept_id: required(&input.dept_id)?,
            dob: required(&input.dob)?,
            phone: input.phone.clone(),
        };
        let clash = self.students.iter().any(|s| {
            Some(s.id) != id && (s.roll_no == record.roll_no || s.email == record.email)
        });
        if clash {
            return Err(Resource::Student.duplicate());
        }
        if !self.has_department(&record.dept_id) {
            return Err(Resource::Student.invalid_reference());
        }
        Ok(record)
    }

    fn validate_faculty(&self, id: Option<i64>, input: &FacultyInput) -> Result<FacultyRecord, AppError> {
        let record = FacultyRecord {
            id: id.unwrap_or_default(),
            name: required(&input.name)?,
            department: required(&input.department)?,
            email: required(&input.email)?,
            phone: input.phone.clone(),
        };
        if self.faculty.iter().any(|f| Some(f.id) != id && f.email == record.email) {
            return Err(Resource::Faculty.duplicate());
        }
        if !self.has_department(&record.department) {
            return Err(Resource::Faculty.invalid_reference());
        }
        Ok(record)
    }

    fn validate_course(&self, id: Option<i64>, input: &CourseInput) -> Result<CourseRecord, AppError> {
        let record = CourseRecord {
            id: id.unwrap_or_default(),
            course_name: required(&input.course_name)?,
            credits: required(&input.credits)?,
            faculty_id: input.faculty_id,
        };
        if let Some(fid) = record.faculty_id {
            if !self.has_faculty(fid) {
                return Err(Resource::Course.invalid_reference());
            }
        }
        Ok(record)
    }
}

fn required<T: Clone>(value: &Option<T>) -> Result<T, AppError> {
    value.clone().ok_or_else(missing_required_fields)
}

/// Case-insensitive substring match on any of `fields`.
fn matches(term: &str, fields: &[Option<&str>]) -> bool {
    let needle = term.to_lowercase();
    fields
        .iter()
        .flatten()
        .any(|f| f.to_lowercase().contains(&needle))
}

struct DemoSeed {
    dept: &'static str,
    student: &'static str,
    roll_no: &'static str,
    email: &'static str,
    dob: (i32, u32, u32),
    phone: &'static str,
    faculty: &'static str,
    faculty_email: &'static str,
    faculty_phone: &'static str,
    course: &'static str,
    credits: i32,
}

const DEMO_SEEDS: [DemoSeed; 2] = [
    DemoSeed {
        dept: "CSE",
        student: "Alice Johnson",
        roll_no: "2023001",
        email: "alice@example.com",
        dob: (2004, 5, 12),
        phone: "9876543210",
        faculty: "Dr. Rao",
        faculty_email: "rao@college.edu",
        faculty_phone: "9876500001",
        course: "Data Structures",
        credits: 4,
    },
    DemoSeed {
        dept: "ECE",
        student: "Bob Smith",
        roll_no: "2023002",
        email: "bob@example.com",
        dob: (2003, 11, 3),
        phone: "9876543211",
        faculty: "Dr. Mehta",
        faculty_email: "mehta@college.edu",
        faculty_phone: "9876500002",
        course: "Digital Systems",
        credits: 3,
    },
];

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// A store pre-filled with two departments and a student, faculty member, course and enrollment in each.
    pub async fn with_demo_data() -> Result<Self, AppError> {
        let store = MemoryStore::new();
        for (dept_id, dept_name) in [
            ("CSE", "Computer Science & Engineering"),
            ("ECE", "Electronics & Communication"),
        ] {
            store
                .insert_department(&DepartmentInput {
                    dept_id: Some(dept_id.into()),
                    dept_name: Some(dept_name.into()),
                })
                .await?;
        }
        for seed in DEMO_SEEDS {
            let (y, m, d) = seed.dob;
            let dob = NaiveDate::from_ymd_opt(y, m, d)
                .ok_or_else(|| AppError::Internal(format!("invalid demo date {}-{}-{}", y, m, d)))?;
            let student_id = store
                .insert_student(&StudentInput {
                    name: Some(seed.student.into()),
                    roll_no: Some(seed.roll_no.into()),
                    email: Some(seed.email.into()),
                    dept_id: Some(seed.dept.into()),
                    dob: Some(dob),
                    phone: Some(seed.phone.into()),
                })
                .await?;
            let faculty_id = store
                .insert_faculty(&FacultyInput {
                    name: Some(seed.faculty.into()),
                    department: Some(seed.dept.into()),
                    email: Some(seed.faculty_email.into()),
                    phone: Some(seed.faculty_phone.into()),
                })
                .await?;
            let course_id = store
                .insert_course(&CourseInput {
                    course_name: Some(seed.course.into()),
                    credits: Some(seed.credits),
                    faculty_id: Some(faculty_id),
                })
                .await?;
            store.insert_enrollment(student_id, course_id).await?;
        }
        Ok(store)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, AppError> {
        self.tables
            .read()
            .map_err(|_| AppError::Internal("memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, AppError> {
        self.tables
            .write()
            .map_err(|_| AppError::Internal("memory store lock poisoned".into()))
    }
}

#[async_trait]
impl CollegeStore for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        self.read().map(|_| ())
    }

    async fn list_students(&self, search: Option<&str>) -> Result<Vec<Student>, AppError> {
        let t = self.read()?;
        Ok(t.students
            .iter()
            .map(|s| t.join_student(s))
            .filter(|s| {
                search.map_or(true, |term| {
                    matches(term, &[
                        Some(s.name.as_str()),
                        Some(s.roll_no.as_str()),
                        Some(s.email.as_str()),
                        s.dept_name.as_deref(),
                    ])
                })
            })
            .collect())
    }

    async fn student(&self, id: i64) -> Result<Option<Student>, AppError> {
        let t = self.read()?;
        Ok(t.students.iter().find(|s| s.id == id).map(|s| t.join_student(s)))
    }

    async fn insert_student(&self, input: &StudentInput) -> Result<i64, AppError> {
        let mut t = self.write()?;
        let mut record = t.validate_student(None, input)?;
        record.id = t.student_seq.next();
        let id = record.id;
        t.students.push(record);
        Ok(id)
    }

    async fn update_student(&self, id: i64, input: &StudentInput) -> Result<bool, AppError> {
        let mut t = self.write()?;
        let Some(pos) = t.students.iter().position(|s| s.id == id) else {
            return Ok(false);
        };
        let record = t.validate_student(Some(id), input)?;
        t.students[pos] = record;
        Ok(true)
    }

    async fn delete_student(&self, id: i64) -> Result<bool, AppError> {
        let mut t = self.write()?;
        let before = t.students.len();
        t.students.retain(|s| s.id != id);
        if t.students.len() == before {
            return Ok(false);
        }
        t.enrollments.retain(|e| e.student_id != id);
        Ok(true)
    }

    async fn list_faculty(&self, search: Option<&str>) -> Result<Vec<Faculty>, AppError> {
        let t = self.read()?;
        Ok(t.faculty
            .iter()
            .map(|f| t.join_faculty(f))
            .filter(|f| {
                search.map_or(true, |term| {
                    matches(
                        term,
                        &[Some(f.name.as_str()), Some(f.email.as_str()), f.dept_name.as_deref()],
                    )
                })
            })
            .collect())
    }

    async fn faculty(&self, id: i64) -> Result<Option<Faculty>, AppError> {
        let t = self.read()?;
        Ok(t.faculty.iter().find(|f| f.id == id).map(|f| t.join_faculty(f)))
    }

    async fn insert_faculty(&self, input: &FacultyInput) -> Result<i64, AppError> {
        let mut t = self.write()?;
        let mut record = t.validate_faculty(None, input)?;
        record.id = t.faculty_seq.next();
        let id = record.id;
        t.faculty.push(record);
        Ok(id)
    }

    async fn update_faculty(&self, id: i64, input: &FacultyInput) -> Result<bool, AppError> {
        let mut t = self.write()?;
        let Some(pos) = t.faculty.iter().position(|f| f.id == id) else {
            return Ok(false);
        };
        let record = t.validate_faculty(Some(id), input)?;
        t.faculty[pos] = record;
        Ok(true)
    }

    async fn delete_faculty(&self, id: i64) -> Result<bool, AppError> {
        let mut t = self.write()?;
        let before = t.faculty.len();
        t.faculty.retain(|f| f.id != id);
        if t.faculty.len() == before {
            return Ok(false);
        }
        for c in t.courses.iter_mut().filter(|c| c.faculty_id == Some(id)) {
            c.faculty_id = None;
        }
        Ok(true)
    }

    async fn list_courses(&self, search: Option<&str>) -> Result<Vec<Course>, AppError> {
        let t = self.read()?;
        Ok(t.courses
            .iter()
            .map(|c| t.join_course(c))
            .filter(|c| {
                search.map_or(true, |term| {
                    matches(term, &[Some(c.course_name.as_str()), c.faculty_name.as_deref()])
                })
            })
            .collect())
    }

    async fn course(&self, id: i64) -> Result<Option<Course>, AppError> {
        let t = self.read()?;
        Ok(t.courses.iter().find(|c| c.id == id).map(|c| t.join_course(c)))
    }

    async fn insert_course(&self, input: &CourseInput) -> Result<i64, AppError> {
        let mut t = self.write()?;
        let mut record = t.validate_course(None, input)?;
        record.id = t.course_seq.next();
        let id = record.id;
        t.courses.push(record);
        Ok(id)
    }

    async fn update_course(&self, id: i64, input: &CourseInput) -> Result<bool, AppError> {
        let mut t = self.write()?;
        let Some(pos) = t.courses.iter().position(|c| c.id == id) else {
            return Ok(false);
        };
        let record = t.validate_course(Some(id), input)?;
        t.courses[pos] = record;
        Ok(true)
    }

    async fn delete_course(&self, id: i64) -> Result<bool, AppError> {
        let mut t = self.write()?;
        let before = t.courses.len();
        t.courses.retain(|c| c.id != id);
        if t.courses.len() == before {
            return Ok(false);
        }
        t.enrollments.retain(|e| e.course_id != id);
        Ok(true)
    }

    async fn assign_faculty(&self, course_id: i64, faculty_id: Option<i64>) -> Result<(), AppError> {
        let mut t = self.write()?;
        let Some(pos) = t.courses.iter().position(|c| c.id == course_id) else {
            return Err(Resource::Course.not_found());
        };
        if let Some(fid) = faculty_id {
            if !t.has_faculty(fid) {
                return Err(Resource::Faculty.not_found());
            }
        }
        t.courses[pos].faculty_id = faculty_id;
        Ok(())
    }

    async fn list_departments(&self, search: Option<&str>) -> Result<Vec<Department>, AppError> {
        let t = self.read()?;
        let mut rows: Vec<Department> = t
            .departments
            .iter()
            .filter(|d| {
                search.map_or(true, |term| {
                    matches(term, &[Some(d.dept_id.as_str()), Some(d.dept_name.as_str())])
                })
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.dept_id.cmp(&b.dept_id));
        Ok(rows)
    }

    async fn department(&self, dept_id: &str) -> Result<Option<Department>, AppError> {
        let t = self.read()?;
        Ok(t.departments.iter().find(|d| d.dept_id == dept_id).cloned())
    }

    async fn insert_department(&self, input: &DepartmentInput) -> Result<String, AppError> {
        let mut t = self.write()?;
        let record = Department {
            dept_id: required(&input.dept_id)?,
            dept_name: required(&input.dept_name)?,
        };
        if t.has_department(&record.dept_id) {
            return Err(Resource::Department.duplicate());
        }
        let dept_id = record.dept_id.clone();
        t.departments.push(record);
        Ok(dept_id)
    }

    async fn update_department(&self, dept_id: &str, input: &DepartmentInput) -> Result<bool, AppError> {
        let mut t = self.write()?;
        let Some(pos) = t.departments.iter().position(|d| d.dept_id == dept_id) else {
            return Ok(false);
        };
        t.departments[pos].dept_name = required(&input.dept_name)?;
        Ok(true)
    }

    async fn delete_department(&self, dept_id: &str) -> Result<bool, AppError> {
        let mut t = self.write()?;
        let Some(pos) = t.departments.iter().position(|d| d.dept_id == dept_id) else {
            return Ok(false);
        };
        let referenced = t.students.iter().any(|s| s.dept_id == dept_id)
            || t.faculty.iter().any(|f| f.department == dept_id);
        if referenced {
            return Err(department_has_dependents());
        }
        t.departments.remove(pos);
        Ok(true)
    }

    async fn department_stats(&self) -> Result<Vec<DepartmentStats>, AppError> {
        let t = self.read()?;
        let mut rows: Vec<DepartmentStats> = t
            .departments
            .iter()
            .map(|d| DepartmentStats {
                dept_id: d.dept_id.clone(),
                dept_name: d.dept_name.clone(),
                student_count: t.students.iter().filter(|s| s.dept_id == d.dept_id).count() as i64,
                faculty_count: t.faculty.iter().filter(|f| f.department == d.dept_id).count() as i64,
            })
            .collect();
        rows.sort_by(|a, b| a.dept_id.cmp(&b.dept_id));
        Ok(rows)
    }

    async fn list_enrollments(&self) -> Result<Vec<Enrollment>, AppError> {
        let t = self.read()?;
        Ok(t.enrollments.iter().map(|e| t.join_enrollment(e)).collect())
    }

    async fn enrollment(&self, id: i64) -> Result<Option<Enrollment>, AppError> {
        let t = self.read()?;
        Ok(t.enrollments.iter().find(|e| e.id == id).map(|e| t.join_enrollment(e)))
    }

    async fn insert_enrollment(&self, student_id: i64, course_id: i64) -> Result<i64, AppError> {
        let mut t = self.write()?;
        if !t.students.iter().any(|s| s.id == student_id) {
            return Err(Resource::Student.not_found());
        }
        if !t.courses.iter().any(|c| c.id == course_id) {
            return Err(Resource::Course.not_found());
        }
        let enrolled = t
            .enrollments
            .iter()
            .any(|e| e.student_id == student_id && e.course_id == course_id);
        if enrolled {
            return Err(Resource::Enrollment.duplicate());
        }
        let id = t.enrollment_seq.next();
        t.enrollments.push(EnrollmentRecord {
            id,
            student_id,
            course_id,
            enrollment_date: chrono::Utc::now().date_naive(),
        });
        Ok(id)
    }

    async fn delete_enrollment(&self, id: i64) -> Result<bool, AppError> {
        let mut t = self.write()?;
        let before = t.enrollments.len();
        t.enrollments.retain(|e| e.id != id);
        Ok(t.enrollments.len() != before)
    }

    async fn count(&self, collection: Collection) -> Result<i64, AppError> {
        let t = self.read()?;
        let n = match collection {
            Collection::Students => t.students.len(),
            Collection::Faculty => t.faculty.len(),
            Collection::Courses => t.courses.len(),
            Collection::Departments => t.departments.len(),
        };
        Ok(n as i64)
    }

    async fn students_per_course(&self) -> Result<Vec<CourseEnrollmentCount>, AppError> {
        let t = self.read()?;
        let mut rows: Vec<CourseEnrollmentCount> = t
            .courses
            .iter()
            .map(|c| CourseEnrollmentCount {
                course_name: c.course_name.clone(),
                student_count: t.enrollment_count(c.id),
            })
            .collect();
        rows.sort_by(|a, b| a.course_name.cmp(&b.course_name));
        Ok(rows)
    }

    async fn top_courses(&self, limit: i64) -> Result<Vec<CourseEnrollmentCount>, AppError> {
        let t = self.read()?;
        let mut rows: Vec<CourseEnrollmentCount> = t
            .courses
            .iter()
            .map(|c| CourseEnrollmentCount {
                course_name: c.course_name.clone(),
                student_count: t.enrollment_count(c.id),
            })
            .collect();
        rows.sort_by(|a, b| b.student_count.cmp(&a.student_count));
        rows.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(rows)
    }

    async fn avg_courses_per_faculty(&self) -> Result<f64, AppError> {
        let t = self.read()?;
        if t.faculty.is_empty() {
            return Ok(0.0);
        }
        let taught = t
            .faculty
            .iter()
            .map(|f| t.courses.iter().filter(|c| c.faculty_id == Some(f.id)).count())
            .sum::<usize>();
        Ok(taught as f64 / t.faculty.len() as f64)
    }
}
