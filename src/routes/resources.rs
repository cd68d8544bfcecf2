//! Resource routes. Static segments (`search`, `stats`, `assign`) take priority over `:id`.

use crate::handlers::{courses, departments, enrollments, faculty, reports, students};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn resource_routes(state: AppState) -> Router {
    Router::new()
        .route("/students", get(students::list).post(students::create))
        .route("/students/search", get(students::search))
        .route(
            "/students/:id",
            get(students::read).put(students::update).delete(students::delete),
        )
        .route("/faculty", get(faculty::list).post(faculty::create))
        .route("/faculty/search", get(faculty::search))
        .route(
            "/faculty/:id",
            get(faculty::read).put(faculty::update).delete(faculty::delete),
        )
        .route("/courses", get(courses::list).post(courses::create))
        .route("/courses/search", get(courses::search))
        .route("/courses/assign", post(courses::assign))
        .route(
            "/courses/:id",
            get(courses::read).put(courses::update).delete(courses::delete),
        )
        .route("/departments", get(departments::list).post(departments::create))
        .route("/departments/search", get(departments::search))
        .route("/departments/stats", get(departments::stats))
        .route(
            "/departments/:id",
            get(departments::read)
                .put(departments::update)
                .delete(departments::delete),
        )
        .route("/enrollments", get(enrollments::list).post(enrollments::create))
        .route(
            "/enrollments/:id",
            get(enrollments::read).delete(enrollments::delete),
        )
        .route("/dashboard", get(reports::dashboard))
        .route("/reports", get(reports::reports))
        .with_state(state)
}
