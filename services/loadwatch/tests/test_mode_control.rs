//! Mode control tests against a scripted HTTP client
//!
//! Exercises the full path from a mode operation through the client
//! down to the display state, including the error banner lifecycle.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use async_trait::async_trait;
use loadwatch::api::ModeClient;
use loadwatch::control::ModeControl;
use loadwatch::io::{HttpClient, HttpResponse};
use loadwatch::state::Store;
use loadwatch::{ChargeMode, LoadwatchError};

/// HTTP client answering from a scripted response queue and recording
/// every request it sees
struct ScriptedHttp {
    responses: StdMutex<VecDeque<loadwatch::Result<HttpResponse>>>,
    requests: StdMutex<Vec<String>>,
}

impl ScriptedHttp {
    fn new(responses: Vec<loadwatch::Result<HttpResponse>>) -> Self {
        Self {
            responses: StdMutex::new(responses.into_iter().collect()),
            requests: StdMutex::new(Vec::new()),
        }
    }

    fn next_response(&self) -> loadwatch::Result<HttpResponse> {
        match self.responses.lock().unwrap().pop_front() {
            Some(response) => response,
            None => Err(LoadwatchError::Http("no scripted response left".to_string())),
        }
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClient for ScriptedHttp {
    async fn get(&self, url: &str) -> loadwatch::Result<HttpResponse> {
        self.requests.lock().unwrap().push(format!("GET {}", url));
        self.next_response()
    }

    async fn post(&self, url: &str) -> loadwatch::Result<HttpResponse> {
        self.requests.lock().unwrap().push(format!("POST {}", url));
        self.next_response()
    }
}

fn ok_mode(mode: &str) -> loadwatch::Result<HttpResponse> {
    Ok(HttpResponse {
        status: 200,
        body: format!(r#"{{"mode": "{}"}}"#, mode),
    })
}

fn control_with(http: Arc<ScriptedHttp>) -> (ModeControl, Store) {
    let client = ModeClient::new("http://localhost:7070/api", http);
    let store = Store::new();
    (ModeControl::new(client, store.clone()), store)
}

#[tokio::test]
async fn startup_queries_the_mode_endpoint() {
    let http = Arc::new(ScriptedHttp::new(vec![ok_mode("now")]));
    let (control, store) = control_with(Arc::clone(&http));

    control.load_initial_mode().await;

    assert_eq!(store.snapshot().mode, Some(ChargeMode::Now));
    assert_eq!(http.requests(), vec!["GET http://localhost:7070/api/mode"]);
}

#[tokio::test]
async fn mode_change_posts_the_value_and_reconciles() {
    let http = Arc::new(ScriptedHttp::new(vec![ok_mode("minpv")]));
    let (control, store) = control_with(Arc::clone(&http));

    let result = control.set_mode("minpv").await;

    assert_eq!(result, Some(ChargeMode::MinPv));
    assert!(store.snapshot().mode_min_pv());
    assert_eq!(
        http.requests(),
        vec!["POST http://localhost:7070/api/mode/minpv"]
    );
}

#[tokio::test(start_paused = true)]
async fn failed_change_shows_a_banner_that_expires() {
    let http = Arc::new(ScriptedHttp::new(vec![Err(LoadwatchError::Http(
        "connection refused".to_string(),
    ))]));
    let (control, store) = control_with(http);
    store.set_mode(ChargeMode::Pv);

    let result = control.set_mode("off").await;

    assert_eq!(result, None);
    let state = store.snapshot();
    assert_eq!(state.mode, Some(ChargeMode::Pv));
    assert!(state.last_error.is_some());

    // The banner survives almost the whole display window
    tokio::time::sleep(Duration::from_millis(4900)).await;
    assert!(store.snapshot().last_error.is_some());

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(store.snapshot().last_error, None);
    assert_eq!(store.snapshot().mode, Some(ChargeMode::Pv));
}

#[tokio::test(start_paused = true)]
async fn later_failure_restarts_the_banner_window() {
    let http = Arc::new(ScriptedHttp::new(vec![
        Err(LoadwatchError::Http("first failure".to_string())),
        Err(LoadwatchError::Http("second failure".to_string())),
    ]));
    let (control, store) = control_with(http);

    control.set_mode("pv").await;
    tokio::time::sleep(Duration::from_secs(3)).await;
    control.set_mode("now").await;

    // 6 s after the first failure the banner still shows the second
    tokio::time::sleep(Duration::from_secs(3)).await;
    let error = store.snapshot().last_error.unwrap();
    assert!(error.contains("second failure"), "{error}");

    tokio::time::sleep(Duration::from_millis(2100)).await;
    assert_eq!(store.snapshot().last_error, None);
}

#[tokio::test]
async fn rejected_value_is_surfaced_via_the_banner() {
    let http = Arc::new(ScriptedHttp::new(vec![Ok(HttpResponse {
        status: 404,
        body: "404 page not found".to_string(),
    })]));
    let (control, store) = control_with(Arc::clone(&http));

    let result = control.set_mode("banana").await;

    assert_eq!(result, None);
    assert_eq!(store.snapshot().mode, None);
    let error = store.snapshot().last_error.unwrap();
    assert!(error.contains("mode change failed"), "{error}");
    // The unvalidated value went out as a route segment regardless
    assert_eq!(
        http.requests(),
        vec!["POST http://localhost:7070/api/mode/banana"]
    );
}
