//! Local stand-in for the Flickr REST and static image hosts

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use flickr_api::FlickrClient;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

#[derive(Default)]
struct FakeState {
    pages: Vec<Vec<Value>>,
    feed_requests: AtomicUsize,
    image_requests: AtomicUsize,
    failing_pages: Mutex<HashSet<u32>>,
    forbidden_ids: Mutex<HashSet<String>>,
    held_ids: Mutex<HashMap<String, Arc<Notify>>>,
}

pub(crate) struct FakeFlickr {
    base_url: String,
    state: Arc<FakeState>,
}

impl FakeFlickr {
    /// Serve `pages` as the interestingness feed, one inner vec per page
    pub(crate) async fn start(pages: Vec<Vec<Value>>) -> Self {
        let state = Arc::new(FakeState {
            pages,
            ..Default::default()
        });
        let app = Router::new()
            .route("/services/rest/", get(rest))
            .route("/{server}/{file}", get(image))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub(crate) fn client(&self) -> FlickrClient {
        FlickrClient::with_base_urls("test-key", &self.base_url, &self.base_url).unwrap()
    }

    pub(crate) fn photo(id: &str) -> Value {
        json!({
            "id": id,
            "owner": "12345678@N00",
            "secret": format!("s{}", id),
            "server": "65535",
            "farm": 66,
            "title": format!("Photo {}", id),
            "license": "4",
            "ownername": "Jane Doe",
            "datetaken": "2024-05-01 06:12:44"
        })
    }

    pub(crate) fn fail_page(&self, page: u32) {
        self.state.failing_pages.lock().unwrap().insert(page);
    }

    pub(crate) fn forbid(&self, id: &str) {
        self.state
            .forbidden_ids
            .lock()
            .unwrap()
            .insert(id.to_string());
    }

    /// Keep the image response for `id` pending until `release(id)`
    pub(crate) fn hold(&self, id: &str) {
        self.state
            .held_ids
            .lock()
            .unwrap()
            .insert(id.to_string(), Arc::new(Notify::new()));
    }

    pub(crate) fn release(&self, id: &str) {
        if let Some(gate) = self.state.held_ids.lock().unwrap().get(id) {
            // Stores a permit when the request has not arrived yet
            gate.notify_one();
        }
    }

    pub(crate) fn feed_requests(&self) -> usize {
        self.state.feed_requests.load(Ordering::SeqCst)
    }

    pub(crate) fn image_requests(&self) -> usize {
        self.state.image_requests.load(Ordering::SeqCst)
    }
}

async fn rest(
    State(state): State<Arc<FakeState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.feed_requests.fetch_add(1, Ordering::SeqCst);

    let page: u32 = params
        .get("page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(1);
    if state.failing_pages.lock().unwrap().contains(&page) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let pages = state.pages.len().max(1);
    let photo = state
        .pages
        .get((page as usize).saturating_sub(1))
        .cloned()
        .unwrap_or_default();
    Json(json!({
        "photos": {
            "page": page,
            "pages": pages,
            "perpage": params.get("per_page"),
            "total": state.pages.iter().map(Vec::len).sum::<usize>(),
            "photo": photo
        },
        "stat": "ok"
    }))
    .into_response()
}

async fn image(
    State(state): State<Arc<FakeState>>,
    Path((_server, file)): Path<(String, String)>,
) -> Response {
    state.image_requests.fetch_add(1, Ordering::SeqCst);

    let id = file.split('_').next().unwrap_or_default().to_string();
    if state.forbidden_ids.lock().unwrap().contains(&id) {
        return StatusCode::FORBIDDEN.into_response();
    }
    let gate = state.held_ids.lock().unwrap().get(&id).cloned();
    if let Some(gate) = gate {
        gate.notified().await;
    }
    (
        [
            (header::CONTENT_TYPE, "image/jpeg"),
            (header::HeaderName::from_static("imagewidth"), "1024"),
            (header::HeaderName::from_static("imageheight"), "683"),
        ],
        format!("image {}", id).into_bytes(),
    )
        .into_response()
}
