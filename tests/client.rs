use college_api::{ApiClient, ClientError, MemoryStore};
use serde_json::json;
use std::sync::Arc;

async fn demo_client() -> ApiClient {
    let store = MemoryStore::with_demo_data()
        .await
        .expect("failed to seed demo data");
    ApiClient::in_memory(Arc::new(store))
}

#[tokio::test]
async fn in_memory_client_round_trips_a_course() {
    let client = demo_client().await;
    let created = client
        .post(
            "/courses",
            &json!({"course_name": "Operating Systems", "credits": 4, "faculty_id": 1}),
        )
        .await
        .expect("create course");
    let id = created["id"].as_i64().expect("id");
    assert_eq!(created["faculty_name"], "Dr. Rao");

    let updated = client
        .put(
            &format!("/courses/{id}"),
            &json!({"course_name": "Operating Systems II", "credits": 3}),
        )
        .await
        .expect("update course");
    assert_eq!(updated["credits"], 3);
    assert!(updated["faculty_id"].is_null());

    let found = client
        .get("/courses/search", &[("q", "systems ii")])
        .await
        .expect("search courses");
    assert_eq!(found.as_array().map(Vec::len), Some(1));

    let deleted = client
        .delete(&format!("/courses/{id}"))
        .await
        .expect("delete course");
    assert_eq!(deleted["message"], "Course deleted successfully");
}

#[tokio::test]
async fn api_errors_carry_status_code_and_message() {
    let client = demo_client().await;
    match client.get("/students/404", &[]).await {
        Err(ClientError::Api { status, code, message }) => {
            assert_eq!(status, 404);
            assert_eq!(code, "not_found");
            assert_eq!(message, "Student not found");
        }
        other => panic!("expected api error, got {:?}", other),
    }

    match client
        .post("/departments", &json!({"dept_id": "CSE", "dept_name": "Again"}))
        .await
    {
        Err(ClientError::Api { status, code, .. }) => {
            assert_eq!(status, 400);
            assert_eq!(code, "conflict");
        }
        other => panic!("expected api error, got {:?}", other),
    }
}

#[tokio::test]
async fn http_client_rejects_bad_base_url() {
    let client = ApiClient::http("not a url").expect("client builds");
    match client.get("/health", &[]).await {
        Err(ClientError::Url(_)) => {}
        other => panic!("expected url error, got {:?}", other),
    }
}
