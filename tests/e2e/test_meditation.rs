use crate::e2e::helpers;

use helpers::fakes::{FakeScriptRepository, FakeTtsRepository, FAKE_AUDIO_RATE};
use helpers::{ContextOptions, TestContext, TEST_GAP_MS, TEST_PASSWORD};
use hyper::StatusCode;
use meditation_backend::domain::meditation::GenerateMeditationResponse;
use serde_json::{json, Value};
use test_context::test_context;

fn valid_request() -> Value {
    json!({
        "password": TEST_PASSWORD,
        "disease": "Insomnia",
        "symptom": "Racing thoughts",
        "additional_instruction": "Keep it gentle"
    })
}

/// Duration in ms of a WAV body.
fn wav_duration_ms(bytes: &[u8]) -> u64 {
    let reader = hound::WavReader::new(std::io::Cursor::new(bytes)).unwrap();
    let spec = reader.spec();
    reader.duration() as u64 * 1000 / spec.sample_rate as u64
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_generate_meditation_and_serve_audio(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/api/generate-meditation", &valid_request())
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let body: GenerateMeditationResponse = response.json().unwrap();

    assert!(body.success);
    assert_eq!(
        body.chapters,
        vec![
            "Arrive and settle.".to_string(),
            "Breathe into the tension.".to_string(),
            "Return with gratitude.".to_string(),
        ]
    );
    assert!(body.meditation_text.contains("[SECTION_BREAK]"));
    assert_eq!(response.body.as_ref().unwrap()["segmentation"], "delimiter");
    assert!(body.audio_url.starts_with("/download/meditation_"));
    assert!(body.audio_url.ends_with(".wav"));

    // Exactly one finished artifact, no temporary leftovers
    let file_name = body.audio_url.trim_start_matches("/download/").to_string();
    assert_eq!(ctx.output_files(), vec![file_name]);

    let download = ctx.client.get(&body.audio_url).await.unwrap();
    download
        .assert_status(StatusCode::OK)
        .assert_header("content-type", "audio/wav");

    // Three one-second sections separated by two gaps
    assert_eq!(
        wav_duration_ms(&download.body_bytes),
        3 * 1_000 + 2 * TEST_GAP_MS
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_use_first_voice_when_it_works(ctx: &TestContext) {
    ctx.client
        .post("/api/generate-meditation", &valid_request())
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    assert_eq!(ctx.attempted_voices(), vec!["Priyanka Sogam"; 3]);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_invalid_password(ctx: &TestContext) {
    let mut request = valid_request();
    request["password"] = json!("wrong");

    let response = ctx
        .client
        .post("/api/generate-meditation", &request)
        .await
        .unwrap();

    response
        .assert_status(StatusCode::UNAUTHORIZED)
        .assert_error_message("Invalid password");
    assert_eq!(*ctx.script_calls.lock().unwrap(), 0);
    assert!(ctx.output_files().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_check_password_before_fields(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/api/generate-meditation", &json!({"password": "nope"}))
        .await
        .unwrap();

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_require_disease_and_symptom(ctx: &TestContext) {
    for request in [
        json!({"password": TEST_PASSWORD, "symptom": "tension"}),
        json!({"password": TEST_PASSWORD, "disease": "anxiety", "symptom": "   "}),
    ] {
        let response = ctx
            .client
            .post("/api/generate-meditation", &request)
            .await
            .unwrap();

        response
            .assert_status(StatusCode::BAD_REQUEST)
            .assert_error_message("Missing required fields");
    }

    assert_eq!(*ctx.script_calls.lock().unwrap(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_malformed_json(ctx: &TestContext) {
    let response = ctx
        .client
        .post_raw("/api/generate-meditation", "{not json")
        .await
        .unwrap();

    assert!(response.status.is_client_error());
    assert_eq!(*ctx.script_calls.lock().unwrap(), 0);
}

#[tokio::test]
async fn it_should_fall_back_to_next_voice() {
    let ctx = TestContext::start(ContextOptions {
        tts: Some(FakeTtsRepository::new(&["Priyanka Sogam"])),
        ..ContextOptions::default()
    })
    .await
    .unwrap();

    ctx.client
        .post("/api/generate-meditation", &valid_request())
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    assert_eq!(
        ctx.attempted_voices(),
        vec![
            "Priyanka Sogam", "Rachel",
            "Priyanka Sogam", "Rachel",
            "Priyanka Sogam", "Rachel",
        ]
    );
}

#[tokio::test]
async fn it_should_fail_when_every_voice_fails() {
    let ctx = TestContext::start(ContextOptions {
        tts: Some(FakeTtsRepository::new(&["Priyanka Sogam", "Rachel", "Adam"])),
        ..ContextOptions::default()
    })
    .await
    .unwrap();

    let response = ctx
        .client
        .post("/api/generate-meditation", &valid_request())
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_GATEWAY)
        .assert_error_message("could not generate audio for section 1")
        .assert_error_message("voice 'Adam' not found");

    // Each voice tried exactly once, then the request is aborted
    assert_eq!(ctx.attempted_voices(), vec!["Priyanka Sogam", "Rachel", "Adam"]);
    assert!(ctx.output_files().is_empty());
}

#[tokio::test]
async fn it_should_fail_when_script_generation_fails() {
    let ctx = TestContext::start(ContextOptions {
        script: FakeScriptRepository::failing(),
        ..ContextOptions::default()
    })
    .await
    .unwrap();

    let response = ctx
        .client
        .post("/api/generate-meditation", &valid_request())
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_GATEWAY)
        .assert_error_message("language model unavailable");
    assert!(ctx.attempted_voices().is_empty());
    assert!(ctx.output_files().is_empty());
}

#[tokio::test]
async fn it_should_segment_scripts_without_delimiter() {
    let ctx = TestContext::start(ContextOptions {
        script: FakeScriptRepository::returning("Arrive.\n\nSoften.\n\nRelease.\n\nReturn."),
        ..ContextOptions::default()
    })
    .await
    .unwrap();

    let response = ctx
        .client
        .post("/api/generate-meditation", &valid_request())
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_eq!(body["segmentation"], "paragraphs");
    assert_eq!(body["chapters"][2], "Release.\n\nReturn.");
}

#[tokio::test]
async fn it_should_export_placeholder_when_speech_is_disabled() {
    let ctx = TestContext::start(ContextOptions {
        tts: None,
        ..ContextOptions::default()
    })
    .await
    .unwrap();

    let response = ctx
        .client
        .post("/api/generate-meditation", &valid_request())
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let body: GenerateMeditationResponse = response.json().unwrap();
    assert_eq!(body.chapters.len(), 3);

    let download = ctx.client.get(&body.audio_url).await.unwrap();
    download.assert_status(StatusCode::OK);
    assert_eq!(wav_duration_ms(&download.body_bytes), 60_000);

    let reader = hound::WavReader::new(std::io::Cursor::new(&download.body_bytes)).unwrap();
    assert_eq!(reader.spec().sample_rate, FAKE_AUDIO_RATE);
    assert_eq!(reader.spec().channels, 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_produce_distinct_artifacts_for_concurrent_requests(ctx: &TestContext) {
    let mut futures = Vec::new();
    for _ in 0..3 {
        let client = ctx.client.clone();
        futures.push(async move {
            client
                .post("/api/generate-meditation", &valid_request())
                .await
        });
    }

    let mut urls: Vec<String> = futures::future::join_all(futures)
        .await
        .into_iter()
        .map(|result| {
            let response = result.unwrap();
            response.assert_status(StatusCode::OK);
            response.json::<GenerateMeditationResponse>().unwrap().audio_url
        })
        .collect();
    urls.sort();
    urls.dedup();

    assert_eq!(urls.len(), 3);
    assert_eq!(ctx.output_files().len(), 3);
}
