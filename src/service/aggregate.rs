//! Read-only aggregates. Independent queries run concurrently.

use crate::error::AppError;
use crate::model::{Collection, DashboardStats, Reports};
use crate::store::CollegeStore;

const TOP_COURSES: i64 = 3;

pub struct DashboardService;

impl DashboardService {
    pub async fn stats(store: &dyn CollegeStore) -> Result<DashboardStats, AppError> {
        let (students, faculty, courses, departments) = tokio::try_join!(
            store.count(Collection::Students),
            store.count(Collection::Faculty),
            store.count(Collection::Courses),
            store.count(Collection::Departments),
        )?;
        Ok(DashboardStats {
            students,
            faculty,
            courses,
            departments,
        })
    }
}

pub struct ReportService;

impl ReportService {
    pub async fn reports(store: &dyn CollegeStore) -> Result<Reports, AppError> {
        let (students_per_course, top_courses, avg_courses_per_faculty) = tokio::try_join!(
            store.students_per_course(),
            store.top_courses(TOP_COURSES),
            store.avg_courses_per_faculty(),
        )?;
        Ok(Reports {
            students_per_course,
            top_courses,
            avg_courses_per_faculty,
        })
    }
}
