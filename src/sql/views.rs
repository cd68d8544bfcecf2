//! Joined SELECTs for each resource. Aliases match the row types in `model`.

use super::JoinedSelect;

pub const STUDENTS: JoinedSelect = JoinedSelect {
    select: "SELECT s.id, s.name, s.roll_no, s.email, s.dept_id, s.dob, s.phone, d.dept_name \
             FROM students s LEFT JOIN departments d ON s.dept_id = d.dept_id",
    key: "s.id",
    search_columns: &["s.name", "s.roll_no", "s.email", "d.dept_name"],
};

pub const FACULTY: JoinedSelect = JoinedSelect {
    select: "SELECT f.id, f.name, f.department, f.email, f.phone, d.dept_name \
             FROM faculty f LEFT JOIN departments d ON f.department = d.dept_id",
    key: "f.id",
    search_columns: &["f.name", "f.email", "d.dept_name"],
};

pub const COURSES: JoinedSelect = JoinedSelect {
    select: "SELECT c.id, c.course_name, c.credits, c.faculty_id, \
             f.name AS faculty_name, f.email AS faculty_email \
             FROM courses c LEFT JOIN faculty f ON c.faculty_id = f.id",
    key: "c.id",
    search_columns: &["c.course_name", "f.name"],
};

pub const DEPARTMENTS: JoinedSelect = JoinedSelect {
    select: "SELECT d.dept_id, d.dept_name FROM departments d",
    key: "d.dept_id",
    search_columns: &["d.dept_id", "d.dept_name"],
};

pub const ENROLLMENTS: JoinedSelect = JoinedSelect {
    select: "SELECT e.id, e.student_id, e.course_id, e.enrollment_date, \
             s.name AS student_name, s.roll_no, c.course_name \
             FROM enrollments e \
             LEFT JOIN students s ON e.student_id = s.id \
             LEFT JOIN courses c ON e.course_id = c.id",
    key: "e.id",
    search_columns: &[],
};

pub const DEPARTMENT_STATS: &str = "SELECT d.dept_id, d.dept_name, \
     COUNT(DISTINCT s.id) AS student_count, \
     COUNT(DISTINCT f.id) AS faculty_count \
     FROM departments d \
     LEFT JOIN students s ON d.dept_id = s.dept_id \
     LEFT JOIN faculty f ON d.dept_id = f.department \
     GROUP BY d.dept_id, d.dept_name \
     ORDER BY d.dept_id";

pub const STUDENTS_PER_COURSE: &str = "SELECT c.course_name, COUNT(e.student_id) AS student_count \
     FROM courses c LEFT JOIN enrollments e ON c.id = e.course_id \
     GROUP BY c.id, c.course_name \
     ORDER BY c.course_name";

/// Bind the limit as $1.
pub const TOP_COURSES: &str = "SELECT c.course_name, COUNT(e.student_id) AS student_count \
     FROM courses c LEFT JOIN enrollments e ON c.id = e.course_id \
     GROUP BY c.id, c.course_name \
     ORDER BY student_count DESC \
     LIMIT $1";

pub const AVG_COURSES_PER_FACULTY: &str = "SELECT COALESCE(AVG(course_count), 0)::float8 \
     FROM (SELECT f.id, COUNT(c.id) AS course_count \
           FROM faculty f LEFT JOIN courses c ON f.id = c.faculty_id \
           GROUP BY f.id) AS faculty_courses";
