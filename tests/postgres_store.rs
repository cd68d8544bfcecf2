//! Runs against a live database only when `TEST_DATABASE_URL` is set; otherwise each test returns early.

use college_api::{apply_migrations, ensure_database_exists, ApiClient, ClientError, PgStore};
use serde_json::json;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

async fn pg_store() -> Option<PgStore> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    ensure_database_exists(&url).await.expect("create database");
    let store = PgStore::connect(&url, 2).await.expect("connect");
    apply_migrations(store.pool()).await.expect("migrate");
    Some(store)
}

fn unique_suffix() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();
    format!("{}{}", std::process::id(), nanos)
}

fn api_code(result: Result<serde_json::Value, ClientError>) -> (u16, String) {
    match result {
        Err(ClientError::Api { status, code, .. }) => (status, code),
        other => panic!("expected api error, got {:?}", other),
    }
}

#[tokio::test]
async fn postgres_store_enforces_constraints() {
    let Some(store) = pg_store().await else {
        return;
    };
    let client = ApiClient::in_memory(Arc::new(store));
    let tag = unique_suffix();
    let dept = format!("D{}", tag);

    client
        .post("/departments", &json!({"dept_id": dept, "dept_name": "Test Dept"}))
        .await
        .expect("create department");
    assert_eq!(
        api_code(client.post("/departments", &json!({"dept_id": dept, "dept_name": "Again"})).await),
        (400, "conflict".to_string())
    );

    let student = client
        .post(
            "/students",
            &json!({
                "name": "Pg Student",
                "roll_no": format!("R{}", tag),
                "email": format!("s{}@example.com", tag),
                "dept_id": dept,
                "dob": "2004-05-12"
            }),
        )
        .await
        .expect("create student");
    assert_eq!(student["dept_name"], "Test Dept");
    assert!(student["phone"].is_null());
    let student_id = student["id"].as_i64().expect("id");

    let duplicate = client
        .post(
            "/students",
            &json!({
                "name": "Copy",
                "roll_no": format!("R{}", tag),
                "email": format!("other{}@example.com", tag),
                "dept_id": dept,
                "dob": "2004-05-12"
            }),
        )
        .await;
    assert_eq!(api_code(duplicate), (400, "conflict".to_string()));

    let dangling = client
        .post(
            "/faculty",
            &json!({"name": "F", "department": format!("X{}", tag), "email": format!("f{}@c.edu", tag)}),
        )
        .await;
    assert_eq!(api_code(dangling), (400, "invalid_reference".to_string()));

    let missing = client
        .put(&format!("/students/{student_id}"), &json!({"name": "Only Name"}))
        .await;
    assert_eq!(api_code(missing), (400, "validation_error".to_string()));

    let course = client
        .post("/courses", &json!({"course_name": format!("C{}", tag), "credits": 3}))
        .await
        .expect("create course");
    let course_id = course["id"].as_i64().expect("id");
    client
        .post("/enrollments", &json!({"student_id": student_id, "course_id": course_id}))
        .await
        .expect("enroll");
    assert_eq!(
        api_code(client.post("/enrollments", &json!({"student_id": student_id, "course_id": course_id})).await),
        (400, "conflict".to_string())
    );
    assert_eq!(
        api_code(client.post("/courses/assign", &json!({"course_id": course_id, "faculty_id": -1})).await),
        (404, "not_found".to_string())
    );

    let literal = format!("C{}%", tag);
    let pct = client
        .get("/courses/search", &[("q", literal.as_str())])
        .await
        .expect("search");
    assert_eq!(pct.as_array().map(Vec::len), Some(0));

    assert_eq!(
        api_code(client.delete(&format!("/departments/{dept}")).await),
        (400, "conflict".to_string())
    );
    client
        .delete(&format!("/students/{student_id}"))
        .await
        .expect("delete student");
    let enrollments = client.get("/enrollments", &[]).await.expect("list");
    assert!(enrollments
        .as_array()
        .expect("array")
        .iter()
        .all(|e| e["student_id"] != student_id));
    client.delete(&format!("/courses/{course_id}")).await.expect("delete course");
    client
        .delete(&format!("/departments/{dept}"))
        .await
        .expect("delete department");
}
