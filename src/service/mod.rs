//! Controllers over the `CollegeStore`, one per resource plus the aggregate views.

mod aggregate;
mod crud;
mod validation;
pub use aggregate::{DashboardService, ReportService};
pub use crud::{
    parse_id, CourseService, DepartmentService, EnrollmentService, FacultyService, StudentService,
};
pub use validation::Fields;
