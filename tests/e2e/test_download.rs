use crate::e2e::helpers;

use helpers::TestContext;
use hyper::StatusCode;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_serve_existing_artifact(ctx: &TestContext) {
    std::fs::write(ctx.output_dir.join("meditation_cafebabe.wav"), b"RIFF-test").unwrap();

    let response = ctx
        .client
        .get("/download/meditation_cafebabe.wav")
        .await
        .unwrap();

    response
        .assert_status(StatusCode::OK)
        .assert_header("content-type", "audio/wav")
        .assert_header(
            "content-disposition",
            "attachment; filename=\"meditation_meditation_cafebabe.wav\"",
        );
    assert_eq!(response.body_bytes, b"RIFF-test".to_vec());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_serve_artifact_under_api_prefix(ctx: &TestContext) {
    std::fs::write(ctx.output_dir.join("meditation_0badf00d.wav"), b"RIFF").unwrap();

    let response = ctx
        .client
        .get("/api/download/meditation_0badf00d.wav")
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.body_bytes, b"RIFF".to_vec());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_404_for_missing_file(ctx: &TestContext) {
    let response = ctx.client.get("/download/meditation_missing.wav").await.unwrap();

    response
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error_message("File not found: meditation_missing.wav");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_not_serve_partial_files(ctx: &TestContext) {
    std::fs::write(ctx.output_dir.join(".meditation_abc.wav.partial"), b"half").unwrap();

    let response = ctx
        .client
        .get("/download/.meditation_abc.wav.partial")
        .await
        .unwrap();

    response.assert_status(StatusCode::NOT_FOUND);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_path_traversal(ctx: &TestContext) {
    // Encoded separators reach the handler as part of the file name
    let response = ctx
        .client
        .get("/download/..%2F..%2Fetc%2Fpasswd")
        .await
        .unwrap();

    response.assert_status(StatusCode::NOT_FOUND);
}
