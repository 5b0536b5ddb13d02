use axum::body::Bytes;
use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use serde_json::{json, Value};
use tempfile::TempDir;

use notebook::{api, AppConfig, AppState, Backend};

fn setup_server(backend: Backend) -> (TempDir, TestServer) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut config = AppConfig::with_data_dir(dir.path());
    config.backend = backend;

    let state = AppState::open(config).expect("Failed to open state");
    let server = TestServer::new(api::create_router(state)).expect("Failed to start test server");
    (dir, server)
}

fn note_form(title: &str, content: &str) -> MultipartForm {
    MultipartForm::new()
        .add_text("title", title.to_string())
        .add_text("content", content.to_string())
}

fn text_part(name: &str, body: &str) -> Part {
    Part::bytes(body.as_bytes().to_vec())
        .file_name(name.to_string())
        .mime_type("text/plain")
}

async fn create_note(server: &TestServer, form: MultipartForm) -> Value {
    let response = server.post("/notes").multipart(form).await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()
}

#[tokio::test]
async fn root_returns_banner() {
    let (_dir, server) = setup_server(Backend::Json);

    let response = server.get("/").await;

    response.assert_status_ok();
    assert!(response.text().contains("Use /notes"));
}

#[tokio::test]
async fn note_lifecycle_without_files() {
    let (_dir, server) = setup_server(Backend::Json);

    let created = create_note(&server, note_form("Homework", "Finish ch.3")).await;
    let id = created["id"].as_str().expect("id").to_string();
    assert_eq!(created["status"], "draft");
    assert_eq!(created["attachments"], json!([]));
    assert_eq!(created["createdAt"], created["updatedAt"]);

    let response = server
        .put(&format!("/notes/{}", id))
        .json(&json!({ "status": "completed" }))
        .await;
    response.assert_status_ok();
    let updated = response.json::<Value>();
    assert_eq!(updated["status"], "completed");
    assert_eq!(updated["title"], "Homework");
    assert_eq!(updated["content"], "Finish ch.3");

    server
        .delete(&format!("/notes/{}", id))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let response = server.get(&format!("/notes/{}", id)).await;
    response.assert_status_not_found();
    assert_eq!(response.json::<Value>(), json!({ "message": "Note not found" }));
}

#[tokio::test]
async fn create_requires_title_and_content() {
    let (_dir, server) = setup_server(Backend::Json);

    let response = server
        .post("/notes")
        .multipart(MultipartForm::new().add_text("title", "Only a title"))
        .await;

    response.assert_status_bad_request();
    assert_eq!(
        response.json::<Value>()["message"],
        "Title and content are required."
    );
    assert_eq!(server.get("/notes").await.json::<Value>(), json!([]));
}

#[tokio::test]
async fn create_accepts_json_body() {
    let (_dir, server) = setup_server(Backend::Json);

    let response = server
        .post("/notes")
        .json(&json!({ "title": "Essay", "content": "Intro", "status": "completed" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["status"], "completed");
}

#[tokio::test]
async fn update_with_empty_strings_keeps_values() {
    let (_dir, server) = setup_server(Backend::Json);
    let created = create_note(&server, note_form("Homework", "Finish ch.3")).await;
    let id = created["id"].as_str().unwrap();

    let response = server
        .put(&format!("/notes/{}", id))
        .multipart(note_form("", "").add_text("status", ""))
        .await;

    response.assert_status_ok();
    let updated = response.json::<Value>();
    assert_eq!(updated["title"], "Homework");
    assert_eq!(updated["content"], "Finish ch.3");
    assert_eq!(updated["status"], "draft");
}

#[tokio::test]
async fn update_unknown_note_is_not_found() {
    let (_dir, server) = setup_server(Backend::Json);

    let response = server
        .put("/notes/missing")
        .json(&json!({ "title": "x" }))
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn update_without_body_only_refreshes_note() {
    let (_dir, server) = setup_server(Backend::Json);
    let created = create_note(&server, note_form("Homework", "Finish ch.3")).await;
    let id = created["id"].as_str().unwrap();

    let response = server.put(&format!("/notes/{}", id)).await;

    response.assert_status_ok();
    let updated = response.json::<Value>();
    assert_eq!(updated["title"], "Homework");
    assert_eq!(updated["content"], "Finish ch.3");
    assert_eq!(updated["status"], "draft");
}

#[tokio::test]
async fn update_unknown_note_without_body_is_not_found() {
    let (_dir, server) = setup_server(Backend::Json);

    let response = server.put("/notes/missing").await;

    response.assert_status_not_found();
    assert_eq!(response.json::<Value>(), json!({ "message": "Note not found" }));
}

#[tokio::test]
async fn update_with_malformed_json_is_rejected() {
    let (_dir, server) = setup_server(Backend::Json);
    let created = create_note(&server, note_form("Homework", "Finish ch.3")).await;
    let id = created["id"].as_str().unwrap();

    let response = server
        .put(&format!("/notes/{}", id))
        .content_type("application/json")
        .bytes(Bytes::from_static(b"{ not json"))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn uploaded_files_are_served_and_deleted() {
    let (_dir, server) = setup_server(Backend::Json);
    let created = create_note(
        &server,
        note_form("Lab", "Results").add_part("files", text_part("results.txt", "42")),
    )
    .await;
    let id = created["id"].as_str().unwrap();
    let attachment = &created["attachments"][0];
    assert_eq!(attachment["fileName"], "results.txt");
    assert_eq!(attachment["fileSize"], 2);
    assert_eq!(attachment["fileType"], "text/plain");

    let file_path = attachment["filePath"].as_str().unwrap().to_string();
    assert!(file_path.starts_with("/uploads/"));
    assert_eq!(server.get(&file_path).await.text(), "42");

    let attachment_id = attachment["id"].as_str().unwrap();
    server
        .delete(&format!("/notes/{}/attachments/{}", id, attachment_id))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server.get(&file_path).await.assert_status_not_found();
    let note = server.get(&format!("/notes/{}", id)).await.json::<Value>();
    assert_eq!(note["attachments"], json!([]));
}

#[tokio::test]
async fn add_attachments_to_existing_note() {
    let (_dir, server) = setup_server(Backend::Json);
    let created = create_note(&server, note_form("Lab", "Results")).await;
    let id = created["id"].as_str().unwrap();

    let response = server
        .post(&format!("/notes/{}/attachments", id))
        .multipart(
            MultipartForm::new()
                .add_part("files", text_part("a.txt", "a"))
                .add_part("files", text_part("b.txt", "b")),
        )
        .await;

    response.assert_status(StatusCode::CREATED);
    let added = response.json::<Vec<Value>>();
    assert_eq!(added.len(), 2);

    let note = server.get(&format!("/notes/{}", id)).await.json::<Value>();
    assert_eq!(note["attachments"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn add_attachments_errors() {
    let (_dir, server) = setup_server(Backend::Json);
    let created = create_note(&server, note_form("Lab", "Results")).await;
    let id = created["id"].as_str().unwrap();

    let no_files = server
        .post(&format!("/notes/{}/attachments", id))
        .multipart(MultipartForm::new().add_text("title", "ignored"))
        .await;
    no_files.assert_status_bad_request();
    assert_eq!(no_files.json::<Value>()["message"], "No files uploaded.");

    let missing_note = server
        .post("/notes/missing/attachments")
        .multipart(MultipartForm::new().add_part("files", text_part("a.txt", "a")))
        .await;
    missing_note.assert_status_not_found();
}

#[tokio::test]
async fn malformed_upload_to_unknown_note_is_not_found() {
    let (_dir, server) = setup_server(Backend::Json);

    let response = server
        .post("/notes/missing/attachments")
        .content_type("multipart/form-data; boundary=XYZ")
        .bytes(Bytes::from_static(b"--XYZ\r\nbroken"))
        .await;

    response.assert_status_not_found();
    assert_eq!(response.json::<Value>(), json!({ "message": "Note not found" }));
}

#[tokio::test]
async fn malformed_upload_to_existing_note_is_bad_request() {
    let (_dir, server) = setup_server(Backend::Json);
    let created = create_note(&server, note_form("Lab", "Results")).await;
    let id = created["id"].as_str().unwrap();

    let response = server
        .post(&format!("/notes/{}/attachments", id))
        .content_type("multipart/form-data; boundary=XYZ")
        .bytes(Bytes::from_static(b"--XYZ\r\nbroken"))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn delete_unknown_attachment_keeps_others() {
    let (_dir, server) = setup_server(Backend::Json);
    let created = create_note(
        &server,
        note_form("Lab", "Results").add_part("files", text_part("a.txt", "a")),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let response = server
        .delete(&format!("/notes/{}/attachments/missing", id))
        .await;

    response.assert_status_not_found();
    assert_eq!(
        response.json::<Value>(),
        json!({ "message": "Attachment not found" })
    );
    let note = server.get(&format!("/notes/{}", id)).await.json::<Value>();
    assert_eq!(note["attachments"], created["attachments"]);
}

#[tokio::test]
async fn deleting_note_removes_files() {
    let (_dir, server) = setup_server(Backend::Json);
    let created = create_note(
        &server,
        note_form("Lab", "Results")
            .add_part("files", text_part("a.txt", "a"))
            .add_part("files", text_part("b.txt", "b")),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    server
        .delete(&format!("/notes/{}", id))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    for attachment in created["attachments"].as_array().unwrap() {
        let file_path = attachment["filePath"].as_str().unwrap();
        server.get(file_path).await.assert_status_not_found();
    }
    server
        .delete(&format!("/notes/{}", id))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn list_filters_by_status() {
    let (_dir, server) = setup_server(Backend::Json);
    create_note(&server, note_form("Draft", "a")).await;
    create_note(
        &server,
        note_form("Done", "b").add_text("status", "completed"),
    )
    .await;

    let completed = server
        .get("/notes")
        .add_query_param("status", "completed")
        .await
        .json::<Vec<Value>>();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0]["title"], "Done");

    let all = server.get("/notes").await.json::<Vec<Value>>();
    assert_eq!(all.len(), 2);

    server
        .get("/notes")
        .add_query_param("status", "archived")
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn api_prefix_serves_same_notes() {
    let (_dir, server) = setup_server(Backend::Json);
    let created = create_note(&server, note_form("Homework", "Finish ch.3")).await;
    let id = created["id"].as_str().unwrap();

    let response = server.get(&format!("/api/notes/{}", id)).await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), created);
}

#[tokio::test]
async fn document_backend_lifecycle() {
    let (_dir, server) = setup_server(Backend::Document);

    let created = create_note(
        &server,
        note_form("Homework", "Finish ch.3").add_part("files", text_part("a.txt", "a")),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let listed = server.get("/notes").await.json::<Vec<Value>>();
    assert_eq!(listed, vec![created.clone()]);

    server
        .delete(&format!("/notes/{}", id))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server
        .get(&format!("/notes/{}", id))
        .await
        .assert_status_not_found();
}
