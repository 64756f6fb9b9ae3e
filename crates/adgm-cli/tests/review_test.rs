//! `adgm review` against a wiremock chat-completions server.

use adgm_agent::AgentConfig;
use adgm_cli::review::{run_review, ReviewArgs};
use adgm_cli::{EXIT_INCOMPLETE, EXIT_OK};
use adgm_core::REPORT_FILE_NAME;
use adgm_docx::fixtures::simple_docx;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn chat_server(reply: &str, expected_calls: u64) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [ { "index": 0, "message": { "role": "assistant", "content": reply } } ]
        })))
        .expect(expected_calls)
        .mount(&server)
        .await;
    server
}

fn config_for(server: &MockServer, root: &std::path::Path) -> AgentConfig {
    let mut config = AgentConfig::default();
    let uri = server.uri();
    let index_dir = root.join("no-index").display().to_string();
    config
        .apply_env(|key| match key {
            "OPENAI_API_KEY" => Some("sk-test".to_string()),
            "ADGM_LLM_BASE_URL" => Some(uri.clone()),
            "ADGM_EMBEDDING_PROVIDER" => Some("hashing".to_string()),
            "ADGM_INDEX_DIR" => Some(index_dir.clone()),
            _ => None,
        })
        .unwrap();
    config
}

#[tokio::test]
async fn review_writes_report_and_annotated_copy() {
    let server = chat_server(
        r#"[{"issue": "Wrong courts", "section": "1", "relevant_text": "Dubai Courts",
            "severity": "Medium", "suggestion": "Refer disputes to ADGM Courts."}]"#,
        1,
    )
    .await;
    let root = tempfile::tempdir().unwrap();
    let input = root.path().join("Articles of Association.docx");
    std::fs::write(&input, simple_docx(&["Disputes go to the Dubai Courts."], &[])).unwrap();
    let out_dir = root.path().join("out");

    let args = ReviewArgs {
        files: vec![input],
        proceed: true,
        out_dir: out_dir.clone(),
    };
    let code = run_review(&args, &config_for(&server, root.path()))
        .await
        .unwrap();
    assert_eq!(code, EXIT_OK);

    let report: serde_json::Value =
        serde_json::from_slice(&std::fs::read(out_dir.join(REPORT_FILE_NAME)).unwrap()).unwrap();
    assert_eq!(report["documents_uploaded"], 1);
    assert_eq!(report["issues_found"][0]["issues"][0]["severity"], "Medium");
    assert!(out_dir
        .join("reviewed_Articles of Association.docx")
        .is_file());
}

#[tokio::test]
async fn incomplete_review_without_proceed_writes_nothing() {
    let server = chat_server("[]", 0).await;
    let root = tempfile::tempdir().unwrap();
    let input = root.path().join("UBO Declaration Form.docx");
    std::fs::write(&input, simple_docx(&["Beneficial owner: A. Person"], &[])).unwrap();
    let out_dir = root.path().join("out");

    let args = ReviewArgs {
        files: vec![input],
        proceed: false,
        out_dir: out_dir.clone(),
    };
    let code = run_review(&args, &config_for(&server, root.path()))
        .await
        .unwrap();
    assert_eq!(code, EXIT_INCOMPLETE);
    assert!(!out_dir.exists());
}

#[tokio::test]
async fn missing_input_file_is_an_error() {
    let server = chat_server("[]", 0).await;
    let root = tempfile::tempdir().unwrap();
    let args = ReviewArgs {
        files: vec![root.path().join("absent.docx")],
        proceed: true,
        out_dir: root.path().join("out"),
    };
    let err = run_review(&args, &config_for(&server, root.path()))
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("absent.docx"));
}
