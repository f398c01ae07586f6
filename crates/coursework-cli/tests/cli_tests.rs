//! CLI integration tests using assert_cmd, against a wiremock backend.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use coursework_core::mock::unsigned_token;

/// A command isolated from the developer's own config and token.
fn coursework(home: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("coursework").unwrap();
    cmd.current_dir(home)
        .env("HOME", home)
        .env_remove("COURSEWORK_TOKEN")
        .env_remove("COURSEWORK_BASE_URL")
        .env_remove("RUST_LOG");
    cmd
}

fn against(server: &MockServer, home: &Path) -> Command {
    let mut cmd = coursework(home);
    cmd.env("COURSEWORK_BASE_URL", server.uri());
    cmd
}

async fn mount_quiz(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/Assessments/a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "a1",
            "title": "Cells quiz",
            "courseId": "1",
            "questions": r#"[
                {"Question":"Powerhouse of the cell?","Options":["Nucleus","Mitochondria"],"Answer":"Mitochondria"},
                {"Question":"Basic unit of life?","Options":["Cell","Atom","Organ"],"Answer":"Cell"},
                {"Question":"DNA lives in the?","Options":["Nucleus","Membrane"],"Answer":"Nucleus"}
            ]"#
        })))
        .mount(server)
        .await;
}

#[test]
fn help_output() {
    let home = TempDir::new().unwrap();
    coursework(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Course and assessment client for the coursework API",
        ));
}

#[test]
fn version_output() {
    let home = TempDir::new().unwrap();
    coursework(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("coursework"));
}

#[test]
fn init_creates_config() {
    let home = TempDir::new().unwrap();

    coursework(home.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created coursework.toml"));
    assert!(home.path().join("coursework.toml").exists());

    coursework(home.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn missing_explicit_config_fails() {
    let home = TempDir::new().unwrap();
    coursework(home.path())
        .args(["--config", "nope.toml", "courses", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn whoami_without_token() {
    let home = TempDir::new().unwrap();
    coursework(home.path())
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in."));
}

#[test]
fn whoami_reads_token_file() {
    let home = TempDir::new().unwrap();
    let token_dir = home.path().join(".config/coursework");
    std::fs::create_dir_all(&token_dir).unwrap();
    std::fs::write(token_dir.join("token"), unsigned_token("user-42")).unwrap();

    coursework(home.path())
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("User: user-42"))
        .stdout(predicate::str::contains("not verified"));
}

#[test]
fn whoami_prefers_env_token() {
    let home = TempDir::new().unwrap();
    coursework(home.path())
        .env("COURSEWORK_TOKEN", unsigned_token("from-env"))
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("User: from-env"));
}

#[tokio::test(flavor = "multi_thread")]
async fn courses_list_with_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Courses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"courseId": 1, "title": "Biology 101", "description": "Cells", "mediaUrl": "https://x/b.png"},
            {"courseId": 2, "title": "ADVANCED BIOCHEMISTRY", "description": ""},
            {"courseId": 3, "title": "Chemistry", "description": ""}
        ])))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    against(&server, home.path())
        .args(["courses", "list", "--filter", "bio"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Biology 101"))
        .stdout(predicate::str::contains("ADVANCED BIOCHEMISTRY"))
        .stdout(predicate::str::contains("Chemistry").not());
}

#[tokio::test(flavor = "multi_thread")]
async fn courses_list_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Courses"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    against(&server, home.path())
        .args(["courses", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load courses"));
}

#[tokio::test(flavor = "multi_thread")]
async fn course_delete_with_yes() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/Courses/1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    against(&server, home.path())
        .args(["courses", "delete", "1", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted course 1"));
}

#[tokio::test(flavor = "multi_thread")]
async fn assessment_delete_declined_on_empty_stdin() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    against(&server, home.path())
        .args(["assessments", "delete", "a1"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelled."));
}

#[tokio::test(flavor = "multi_thread")]
async fn assessments_list_for_course() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Assessments"))
        .and(query_param("courseId", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "a1", "title": "Cells quiz", "courseId": "1", "questions": "[]"},
            {"id": "a2", "title": "Final exam", "courseId": "1", "questions": []},
            {"id": "a3", "title": "Odd shape", "courseId": "1",
             "questions": [{"Question": "Q", "Options": "A,B", "Answer": "A"}]}
        ])))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    against(&server, home.path())
        .args(["assessments", "list", "--course", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cells quiz"))
        .stdout(predicate::str::contains("Final exam"))
        .stdout(predicate::str::contains("Odd shape"));
}

#[tokio::test(flavor = "multi_thread")]
async fn take_with_answers_submits_score() {
    let server = MockServer::start().await;
    mount_quiz(&server).await;
    Mock::given(method("POST"))
        .and(path("/Results"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "resultId": 1, "assessmentId": "a1", "userId": "user-42", "score": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    against(&server, home.path())
        .env("COURSEWORK_TOKEN", unsigned_token("user-42"))
        .args(["take", "a1", "--answers", "2,2,"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Assessment submitted!"))
        .stdout(predicate::str::contains("Score: 1/3"));

    let requests = server.received_requests().await.unwrap();
    let post = requests
        .iter()
        .find(|r| r.method.as_str() == "POST")
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&post.body).unwrap();
    assert_eq!(
        body,
        json!({"assessmentId": "a1", "userId": "user-42", "score": 1})
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn take_interactive_reads_stdin() {
    let server = MockServer::start().await;
    mount_quiz(&server).await;
    Mock::given(method("POST"))
        .and(path("/Results"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    against(&server, home.path())
        .env("COURSEWORK_TOKEN", unsigned_token("user-42"))
        .args(["take", "a1"])
        .write_stdin("2\n9\n1\n1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Powerhouse of the cell?"))
        .stdout(predicate::str::contains("Score: 3/3"))
        .stderr(predicate::str::contains("between 1 and 3"));
}

#[tokio::test(flavor = "multi_thread")]
async fn take_interactive_retries_failed_submission() {
    let server = MockServer::start().await;
    mount_quiz(&server).await;
    Mock::given(method("POST"))
        .and(path("/Results"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"message": "Try later"})))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/Results"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    against(&server, home.path())
        .env("COURSEWORK_TOKEN", unsigned_token("user-42"))
        .args(["take", "a1"])
        .write_stdin("2\n1\n1\ny\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Submission failed: Try later"))
        .stderr(predicate::str::contains("Retry submission?"))
        .stdout(predicate::str::contains("Assessment submitted!"))
        .stdout(predicate::str::contains("Score: 3/3"));
}

#[tokio::test(flavor = "multi_thread")]
async fn take_interactive_declined_retry_fails() {
    let server = MockServer::start().await;
    mount_quiz(&server).await;
    Mock::given(method("POST"))
        .and(path("/Results"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    against(&server, home.path())
        .env("COURSEWORK_TOKEN", unsigned_token("user-42"))
        .args(["take", "a1"])
        .write_stdin("1\n1\n1\nn\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Submission failed"));
}

#[tokio::test(flavor = "multi_thread")]
async fn take_without_token_never_posts() {
    let server = MockServer::start().await;
    mount_quiz(&server).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    against(&server, home.path())
        .args(["take", "a1", "--answers", "1,1,1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("User not authenticated"))
        .stderr(predicate::str::contains("/login"));
}

#[tokio::test(flavor = "multi_thread")]
async fn take_submission_failure_shows_server_message() {
    let server = MockServer::start().await;
    mount_quiz(&server).await;
    Mock::given(method("POST"))
        .and(path("/Results"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"message": "Assessment closed"})),
        )
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    against(&server, home.path())
        .env("COURSEWORK_TOKEN", unsigned_token("user-42"))
        .args(["take", "a1", "--answers", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Submission failed: Assessment closed"));
}

#[tokio::test(flavor = "multi_thread")]
async fn take_missing_assessment_fails_to_load() {
    let server = MockServer::start().await;

    let home = TempDir::new().unwrap();
    against(&server, home.path())
        .env("COURSEWORK_TOKEN", unsigned_token("user-42"))
        .args(["take", "nope", "--answers", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load assessment."));
}

#[tokio::test(flavor = "multi_thread")]
async fn results_lists_current_user_with_fallback_titles() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Results"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"resultId": 1, "assessmentId": "a1", "userId": "u1", "score": 3},
            {"resultId": 2, "assessmentId": "a9", "userId": "u2", "score": 1},
            {"resultId": 3, "assessmentId": "gone", "userId": "u1", "score": 0}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Assessments/a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "a1", "title": "Cells quiz"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Assessments/a9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "a9", "title": "Other user"})))
        .expect(0)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    against(&server, home.path())
        .env("COURSEWORK_TOKEN", unsigned_token("u1"))
        .arg("results")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cells quiz"))
        .stdout(predicate::str::contains("Assessment not found"))
        .stdout(predicate::str::contains("Other user").not());
}

#[tokio::test(flavor = "multi_thread")]
async fn results_without_token_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    against(&server, home.path())
        .arg("results")
        .assert()
        .success()
        .stdout(predicate::str::contains("No results found."));
}
