//! AnalysisClient against a live server on an ephemeral port

use base64::prelude::{Engine as _, BASE64_STANDARD};
use palm_common::{generate, AnalysisStatus};
use palm_ra::client::AnalysisClient;
use palm_ra::services::StageSchedule;
use palm_ra::store::{MemoryStore, SharedStore};
use palm_ra::{build_router, AppState};
use std::sync::Arc;
use std::time::Duration;

async fn start_server(schedule: StageSchedule) -> String {
    let store: SharedStore = Arc::new(MemoryStore::new());
    let app = build_router(AppState::new(store, schedule));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn test_client_upload_and_wait_for_reading() {
    let base_url = start_server(StageSchedule::scaled(0.01)).await;
    let client = AnalysisClient::new(base_url)
        .unwrap()
        .with_poll_interval(Duration::from_millis(10));

    let image = b"\xff\xd8\xff\xe0 a small jpeg-ish palm".to_vec();
    let id = client
        .upload(image.clone(), "palm.jpg", "image/jpeg")
        .await
        .unwrap();

    let mut snapshots = Vec::new();
    let analysis = client
        .wait_for_result(id, |snapshot| snapshots.push(snapshot.progress))
        .await
        .unwrap();

    assert_eq!(analysis.id, id);
    assert_eq!(analysis.status, AnalysisStatus::Completed);
    assert_eq!(analysis.result, Some(generate(&BASE64_STANDARD.encode(&image))));
    assert!(snapshots.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(snapshots.last(), Some(&100));
}

#[tokio::test]
async fn test_client_reports_rejected_upload() {
    let base_url = start_server(StageSchedule::immediate()).await;
    let client = AnalysisClient::new(base_url).unwrap();

    let err = client
        .upload(b"plain text".to_vec(), "notes.txt", "text/plain")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("400"), "{}", err);
}

#[tokio::test]
async fn test_client_unknown_analysis_is_error() {
    let base_url = start_server(StageSchedule::immediate()).await;
    let client = AnalysisClient::new(base_url).unwrap();

    let err = client.get_analysis(uuid::Uuid::new_v4()).await.unwrap_err();
    assert!(err.to_string().contains("404"), "{}", err);
}
