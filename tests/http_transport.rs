//! Integration tests for the reqwest transport against a local server.

mod common;

use std::sync::Arc;

use common::{Reply, TestServer};
use docform::ports::download::DirectorySink;
use docform::ports::memory::{MemoryClipboard, MemoryPage};
use docform::ports::Transport;
use docform::{FormClient, FormController, Outcome, PageForm, Ports, Submission};

const PAGE: &str = r#"
<html><body>
  <form id="md" enctype="multipart/form-data">
    <input type="hidden" name="feature" value="docx-to-md">
    <input type="file" name="file">
    <button type="submit" name="preview" value="true">Preview</button>
    <button type="submit">Download</button>
  </form>
</body></html>
"#;

#[tokio::test]
async fn posts_multipart_with_file_and_submitter() {
    let server = TestServer::start(vec![Reply::json("200 OK", r##"{"markdown":"# Title"}"##)]);
    let dir = tempfile::tempdir().unwrap();
    let doc = dir.path().join("report.docx");
    std::fs::write(&doc, b"PK-docx-bytes").unwrap();

    let client = FormClient::new(&server.base_url).unwrap();
    let form = PageForm::parse_all(PAGE).unwrap().remove(0);
    let payload = form.payload(&[], &[("file".into(), doc)], Some(&form.submitters[0]));

    let reply = client.post("/api/docx-to-md", &payload).await.unwrap();

    assert!(reply.status.is_success());
    assert!(reply.is_json());
    assert_eq!(reply.body.as_ref(), br##"{"markdown":"# Title"}"##);

    let request = server.next_request();
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/api/docx-to-md");
    assert!(request.head.to_lowercase().contains("multipart/form-data; boundary="));
    let body = request.body_text();
    assert!(body.contains(r#"name="feature""#));
    assert!(body.contains("docx-to-md"));
    assert!(body.contains(r#"filename="report.docx""#));
    assert!(body.contains("PK-docx-bytes"));
    assert!(body.contains(r#"name="preview""#));
}

#[tokio::test]
async fn fetches_page_then_downloads_attachment() {
    let server = TestServer::start(vec![
        Reply::html(PAGE),
        Reply::attachment("report.md", b"# Title\n"),
    ]);
    let out = tempfile::tempdir().unwrap();

    let client = Arc::new(FormClient::new(&server.base_url).unwrap());
    let forms = PageForm::parse_all(&client.fetch_page("/").await.unwrap()).unwrap();
    assert_eq!(server.next_request().method, "GET");

    let page = Arc::new(MemoryPage::new());
    let ports = Ports::with_page(
        client,
        &page,
        Arc::new(MemoryClipboard::new()),
        Arc::new(DirectorySink::new(out.path())),
    );
    let controller = FormController::new(ports, forms);

    let outcome = controller.submit("md", Submission::default()).await.unwrap();

    let Outcome::Downloaded { filename, path } = outcome else {
        panic!("expected a download");
    };
    assert_eq!(filename, "report.md");
    assert_eq!(std::fs::read(path).unwrap(), b"# Title\n");
    assert!(page.alerts().is_empty());
    assert!(!page.snapshot().overlay_visible);

    // No submitter chosen: only the form's own fields travel.
    let body = server.next_request().body_text();
    assert!(!body.contains(r#"name="preview""#));
}

#[tokio::test]
async fn server_error_message_reaches_alert() {
    let server = TestServer::start(vec![Reply::json(
        "400 BAD REQUEST",
        r#"{"error":"Invalid file format"}"#,
    )]);

    let client = Arc::new(FormClient::new(&server.base_url).unwrap());
    let page = Arc::new(MemoryPage::new());
    let ports = Ports::with_page(
        client,
        &page,
        Arc::new(MemoryClipboard::new()),
        Arc::new(DirectorySink::new(std::env::temp_dir())),
    );
    let controller = FormController::new(ports, vec![PageForm::for_feature("metadata")]);

    controller.submit("metadata", Submission::default()).await.unwrap_err();

    assert_eq!(page.alerts(), vec!["Invalid file format".to_string()]);
}

#[tokio::test]
async fn non_json_error_keeps_server_reason_phrase() {
    let server = TestServer::start(vec![
        Reply {
            status: "500 Server Error",
            headers: vec![("Content-Type", "text/html".to_string())],
            body: b"<h1>boom</h1>".to_vec(),
        },
        Reply {
            status: "503 Service Unavailable",
            headers: vec![("Content-Type", "text/plain".to_string())],
            body: b"down".to_vec(),
        },
    ]);

    let client = Arc::new(FormClient::new(&server.base_url).unwrap());
    let page = Arc::new(MemoryPage::new());
    let ports = Ports::with_page(
        client,
        &page,
        Arc::new(MemoryClipboard::new()),
        Arc::new(DirectorySink::new(std::env::temp_dir())),
    );
    let controller = FormController::new(ports, vec![PageForm::for_feature("text")]);

    controller.submit("text", Submission::default()).await.unwrap_err();
    controller.submit("text", Submission::default()).await.unwrap_err();

    assert_eq!(
        page.alerts(),
        vec![
            "Error 500: Server Error".to_string(),
            "Error 503: Service Unavailable".to_string(),
        ]
    );
}

#[tokio::test]
async fn connection_refused_is_alerted() {
    // Bind and drop to get a port nothing listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let client = Arc::new(FormClient::new(&format!("http://{addr}")).unwrap());
    let page = Arc::new(MemoryPage::new());
    let ports = Ports::with_page(
        client,
        &page,
        Arc::new(MemoryClipboard::new()),
        Arc::new(DirectorySink::new(std::env::temp_dir())),
    );
    let controller = FormController::new(ports, vec![PageForm::for_feature("text")]);

    assert!(controller.submit("text", Submission::default()).await.is_err());
    assert_eq!(page.alerts().len(), 1);
    assert!(!page.snapshot().overlay_visible);
}
