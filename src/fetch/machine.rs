//! Single-shot fetch state machine
//!
//! A [`Fetch`] moves `Idle -> Loading -> {Loaded | NotFound | Failed}` exactly
//! once. The request runs on a spawned task and publishes its result through a
//! `watch` channel, so the owner can poll [`Fetch::read`] on every render pass
//! or await [`Fetch::wait`] / a [`Fetch::subscribe`] receiver.

use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use super::client::ApiClient;
use super::error::{FetchError, FetchErrorKind};
use super::resource::{execute, Resource};

/// Lifecycle of one fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState<T> {
    /// Created, request not issued yet
    Idle,
    /// Request in flight
    Loading,
    /// The API returned a record
    Loaded(T),
    /// The API answered 404
    NotFound,
    /// The request or its decoding failed
    Failed(FetchError),
}

impl<T> FetchState<T> {
    /// True until a terminal state is reached, including before `start`
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Idle | Self::Loading)
    }

    pub fn is_settled(&self) -> bool {
        !self.is_loading()
    }

    /// The record, only when loaded
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

impl<T> From<Result<Option<T>, FetchError>> for FetchState<T> {
    fn from(result: Result<Option<T>, FetchError>) -> Self {
        match result {
            Ok(Some(data)) => Self::Loaded(data),
            Ok(None) => Self::NotFound,
            Err(err) => Self::Failed(err),
        }
    }
}

/// One outbound read owned by one caller
///
/// Dropping the `Fetch` cancels an in-flight request; a cancelled request
/// never writes state.
pub struct Fetch<R: Resource> {
    client: ApiClient,
    resource: Arc<R>,
    state: Arc<watch::Sender<FetchState<R::Record>>>,
    cancel: CancellationToken,
}

impl<R: Resource> Fetch<R> {
    pub fn new(client: ApiClient, resource: R) -> Self {
        let (state, _) = watch::channel(FetchState::Idle);
        Self {
            client,
            resource: Arc::new(resource),
            state: Arc::new(state),
            cancel: CancellationToken::new(),
        }
    }

    /// Issue the request if it has not been issued yet
    ///
    /// Returns `true` only for the call that actually started it. Must be
    /// called from within a tokio runtime.
    pub fn start(&self) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }

        let claimed = self.state.send_if_modified(|state| {
            if matches!(state, FetchState::Idle) {
                *state = FetchState::Loading;
                true
            } else {
                false
            }
        });
        if !claimed {
            return false;
        }

        let client = self.client.clone();
        let resource = Arc::clone(&self.resource);
        let guard = SettleGuard::new(Arc::clone(&self.state), self.cancel.clone());
        let cancel = self.cancel.clone();

        tracing::debug!("Fetching {}", resource.describe());
        tokio::spawn(async move {
            let next = tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!("Fetch of {} cancelled", resource.describe());
                    return;
                }
                next = run(&client, resource.as_ref()) => next,
            };
            guard.settle(next);
        });

        true
    }

    /// Stop an in-flight request; the published state stays where it was
    /// and later `start` calls are refused
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Start if needed and resolve once the state is terminal
    ///
    /// A cancelled fetch resolves with [`FetchError::Cancelled`] unless it had
    /// already settled.
    pub async fn wait(&self) -> FetchState<R::Record> {
        let mut rx = self.state.subscribe();
        self.start();

        let settled = tokio::select! {
            biased;
            changed = rx.wait_for(FetchState::is_settled) => match changed {
                Ok(state) => state.clone(),
                Err(_) => FetchState::Failed(FetchError::Aborted),
            },
            _ = self.cancel.cancelled() => FetchState::Failed(FetchError::Cancelled),
        };
        settled
    }

    /// Current state snapshot
    pub fn state(&self) -> FetchState<R::Record> {
        self.state.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    /// The loaded record; `None` while loading, on 404 and on failure
    pub fn data(&self) -> Option<R::Record> {
        self.state.borrow().data().cloned()
    }

    /// `(data, is_loading)` in one consistent read
    pub fn read(&self) -> (Option<R::Record>, bool) {
        let state = self.state.borrow();
        (state.data().cloned(), state.is_loading())
    }

    /// Receiver notified on every state change
    ///
    /// A cancelled fetch publishes nothing further; the channel closes once
    /// the `Fetch` and its request task are gone.
    pub fn subscribe(&self) -> watch::Receiver<FetchState<R::Record>> {
        self.state.subscribe()
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }
}

impl<R: Resource> Drop for Fetch<R> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run<R: Resource>(client: &ApiClient, resource: &R) -> FetchState<R::Record> {
    let result = match client.timeout() {
        Some(limit) => match tokio::time::timeout(limit, execute(client, resource)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(limit)),
        },
        None => execute(client, resource).await,
    };

    match &result {
        Ok(Some(_)) => tracing::debug!("Loaded {}", resource.describe()),
        Ok(None) => tracing::debug!("Not found: {}", resource.describe()),
        Err(err) => match err.kind() {
            FetchErrorKind::Network => {
                tracing::error!("Fetching {} failed: {}", resource.describe(), err)
            }
            FetchErrorKind::Http | FetchErrorKind::Decode => {
                tracing::warn!("Fetching {} failed: {}", resource.describe(), err)
            }
        },
    }

    result.into()
}

/// Leaves `Loading` on every exit path of the request task
struct SettleGuard<T> {
    state: Arc<watch::Sender<FetchState<T>>>,
    cancel: CancellationToken,
    settled: bool,
}

impl<T> SettleGuard<T> {
    fn new(state: Arc<watch::Sender<FetchState<T>>>, cancel: CancellationToken) -> Self {
        Self {
            state,
            cancel,
            settled: false,
        }
    }

    fn settle(mut self, next: FetchState<T>) {
        self.settled = true;
        if !self.cancel.is_cancelled() {
            self.state.send_replace(next);
        }
    }
}

impl<T> Drop for SettleGuard<T> {
    fn drop(&mut self) {
        if self.settled || self.cancel.is_cancelled() {
            return;
        }
        tracing::error!("Fetch task ended without settling");
        self.state.send_replace(FetchState::Failed(FetchError::Aborted));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::content::{DetailRecord, SummaryRecord};
    use crate::fetch::{ListQuery, PostDetail, PostList};
    use crate::helpers::DisplayZone;
    use axum::extract::{Path, RawQuery, State};
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct MockApi {
        hits: AtomicUsize,
        last_query: Mutex<Option<String>>,
    }

    impl MockApi {
        fn hits(&self) -> usize {
            self.hits.load(Ordering::SeqCst)
        }
    }

    async fn list_handler(
        State(mock): State<Arc<MockApi>>,
        RawQuery(query): RawQuery,
    ) -> Json<serde_json::Value> {
        mock.hits.fetch_add(1, Ordering::SeqCst);
        *mock.last_query.lock().unwrap() = query;
        Json(json!([{"id": "1", "title": "A", "created_at": "2020-01-01"}]))
    }

    async fn detail_handler(State(mock): State<Arc<MockApi>>, Path(id): Path<String>) -> Response {
        mock.hits.fetch_add(1, Ordering::SeqCst);
        match id.as_str() {
            "1" => Json(json!({
                "id": "1",
                "creator": "someone",
                "title": "First",
                "content": "<p>Hello</p>",
                "tags": ["intro"],
                "created_at": "2021-03-05T00:00:00Z"
            }))
            .into_response(),
            "boom" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
            "garbled" => "definitely not json".into_response(),
            "bad-date" => Json(json!({
                "id": "bad-date",
                "title": "When?",
                "content": "",
                "created_at": "someday"
            }))
            .into_response(),
            "slow" => {
                tokio::time::sleep(Duration::from_secs(5)).await;
                StatusCode::NO_CONTENT.into_response()
            }
            _ => StatusCode::NOT_FOUND.into_response(),
        }
    }

    async fn mock_api() -> (Arc<MockApi>, ApiConfig) {
        let mock = Arc::new(MockApi::default());
        let app = Router::new()
            .route("/posts-by-date", get(list_handler))
            .route("/posts/:id", get(detail_handler))
            .route(
                "/broken-by-date",
                get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
            )
            .with_state(Arc::clone(&mock));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let port = listener.local_addr().expect("addr").port();
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });

        (mock, api_config(port))
    }

    fn api_config(port: u16) -> ApiConfig {
        ApiConfig {
            host: "127.0.0.1".to_string(),
            port,
            ..ApiConfig::default()
        }
    }

    fn client(api: &ApiConfig) -> ApiClient {
        ApiClient::new(api, DisplayZone::Named(chrono_tz::Tz::UTC)).unwrap()
    }

    #[tokio::test]
    async fn test_list_loaded() {
        let (mock, api) = mock_api().await;
        let fetch = Fetch::new(client(&api), PostList::default());

        assert_eq!(fetch.read(), (None, true));
        assert_eq!(
            fetch.wait().await,
            FetchState::Loaded(vec![SummaryRecord {
                id: "1".to_string(),
                title: "A".to_string(),
                created_at: "2020-01-01".to_string(),
            }])
        );
        assert!(!fetch.is_loading());
        assert_eq!(fetch.data().map(|posts| posts.len()), Some(1));
        assert_eq!(
            mock.last_query.lock().unwrap().as_deref(),
            Some("from=2000-01-01&to=2030-10-01&page=0&page_size=2000")
        );
    }

    #[tokio::test]
    async fn test_list_passes_query() {
        let (mock, api) = mock_api().await;
        let query = ListQuery {
            from: "2021-01-01".to_string(),
            page: 2,
            page_size: 10,
            ..ListQuery::default()
        };
        let fetch = Fetch::new(client(&api), PostList::new(query));
        fetch.wait().await;

        assert_eq!(
            mock.last_query.lock().unwrap().as_deref(),
            Some("from=2021-01-01&to=2030-10-01&page=2&page_size=10")
        );
    }

    #[tokio::test]
    async fn test_detail_loaded() {
        let (_mock, api) = mock_api().await;
        let fetch = Fetch::new(client(&api), PostDetail::new("1"));
        assert_eq!(fetch.resource().id, "1");

        let state = fetch.wait().await;
        assert_eq!(
            state.data(),
            Some(&DetailRecord {
                title: "First".to_string(),
                content: "<p>Hello</p>".to_string(),
                created_at: "2021-03-05".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_detail_not_found() {
        let (_mock, api) = mock_api().await;
        let fetch = Fetch::new(client(&api), PostDetail::new("missing"));

        assert_eq!(fetch.wait().await, FetchState::NotFound);
        assert_eq!(fetch.read(), (None, false));
    }

    #[tokio::test]
    async fn test_http_error_is_not_not_found() {
        let (_mock, api) = mock_api().await;
        let fetch = Fetch::new(client(&api), PostDetail::new("boom"));

        assert_eq!(
            fetch.wait().await,
            FetchState::Failed(FetchError::Http { status: 500 })
        );
    }

    #[tokio::test]
    async fn test_decode_failures() {
        let (_mock, api) = mock_api().await;

        let garbled = Fetch::new(client(&api), PostDetail::new("garbled"));
        let state = garbled.wait().await;
        assert_eq!(state.error().map(FetchError::kind), Some(FetchErrorKind::Decode));

        let bad_date = Fetch::new(client(&api), PostDetail::new("bad-date"));
        let state = bad_date.wait().await;
        assert!(matches!(state, FetchState::Failed(FetchError::Date(_))));
        assert_eq!(state.error().map(FetchError::kind), Some(FetchErrorKind::Decode));
    }

    #[tokio::test]
    async fn test_network_failure_is_observable() {
        // Bind then release a port so nothing is listening on it
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
            listener.local_addr().expect("addr").port()
        };
        let fetch = Fetch::new(client(&api_config(port)), PostDetail::new("1"));

        let state = fetch.wait().await;
        assert_eq!(fetch.read(), (None, false));
        assert_ne!(state, FetchState::NotFound);
        assert_eq!(state.error().map(FetchError::kind), Some(FetchErrorKind::Network));
    }

    #[tokio::test]
    async fn test_timeout() {
        let (_mock, api) = mock_api().await;
        let client = client(&api).with_timeout(Some(Duration::from_millis(100)));
        let fetch = Fetch::new(client, PostDetail::new("slow"));

        assert_eq!(
            fetch.wait().await,
            FetchState::Failed(FetchError::Timeout(Duration::from_millis(100)))
        );
    }

    #[tokio::test]
    async fn test_single_request_across_reads() {
        let (mock, api) = mock_api().await;
        let fetch = Fetch::new(client(&api), PostList::default());

        assert!(fetch.start());
        assert!(!fetch.start());
        fetch.wait().await;

        for _ in 0..5 {
            assert!(!fetch.start());
            let (data, loading) = fetch.read();
            assert!(data.is_some());
            assert!(!loading);
        }
        fetch.wait().await;
        assert_eq!(mock.hits(), 1);
    }

    #[tokio::test]
    async fn test_subscribe_sees_transition() {
        let (_mock, api) = mock_api().await;
        let fetch = Fetch::new(client(&api), PostDetail::new("1"));
        let mut rx = fetch.subscribe();

        fetch.start();
        let settled = rx.wait_for(FetchState::is_settled).await.unwrap().clone();
        assert!(settled.data().is_some());
    }

    #[tokio::test]
    async fn test_cancel_prevents_late_write() {
        let (mock, api) = mock_api().await;
        let fetch = Fetch::new(client(&api), PostDetail::new("slow"));
        let rx = fetch.subscribe();

        fetch.start();
        tokio::time::sleep(Duration::from_millis(200)).await;
        fetch.cancel();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(*rx.borrow(), FetchState::Loading);
        assert_eq!(mock.hits(), 1);
    }

    #[tokio::test]
    async fn test_list_missing_endpoint_is_not_found() {
        let (_mock, api) = mock_api().await;
        let api = ApiConfig {
            posts_by_date_path: "gone-by-date".to_string(),
            ..api
        };
        let fetch = Fetch::new(client(&api), PostList::default());

        assert_eq!(fetch.wait().await, FetchState::NotFound);
        assert_eq!(fetch.read(), (None, false));
    }

    #[tokio::test]
    async fn test_list_server_error_is_failure() {
        let (_mock, api) = mock_api().await;
        let api = ApiConfig {
            posts_by_date_path: "broken-by-date".to_string(),
            ..api
        };
        let fetch = Fetch::new(client(&api), PostList::default());

        assert_eq!(
            fetch.wait().await,
            FetchState::Failed(FetchError::Http { status: 500 })
        );
    }

    #[tokio::test]
    async fn test_wait_after_cancel_resolves() {
        let (mock, api) = mock_api().await;
        let fetch = Fetch::new(client(&api), PostDetail::new("1"));
        fetch.cancel();

        let state = tokio::time::timeout(Duration::from_secs(2), fetch.wait())
            .await
            .expect("wait resolves after cancel");
        assert_eq!(state, FetchState::Failed(FetchError::Cancelled));
        assert!(!fetch.start());
        assert_eq!(fetch.state(), FetchState::Idle);
        assert_eq!(mock.hits(), 0);
    }

    #[tokio::test]
    async fn test_cancel_during_wait_resolves() {
        let (_mock, api) = mock_api().await;
        let fetch = Arc::new(Fetch::new(client(&api), PostDetail::new("slow")));

        let canceller = Arc::clone(&fetch);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            canceller.cancel();
        });

        let state = tokio::time::timeout(Duration::from_secs(2), fetch.wait())
            .await
            .expect("wait resolves after cancel");
        assert_eq!(state, FetchState::Failed(FetchError::Cancelled));
    }

    #[tokio::test]
    async fn test_wait_after_settle_ignores_cancel() {
        let (_mock, api) = mock_api().await;
        let fetch = Fetch::new(client(&api), PostDetail::new("missing"));

        assert_eq!(fetch.wait().await, FetchState::NotFound);
        fetch.cancel();
        assert_eq!(fetch.wait().await, FetchState::NotFound);
    }

    #[tokio::test]
    async fn test_dropped_owner_gets_no_late_write() {
        let (mock, api) = mock_api().await;
        let fetch = Fetch::new(client(&api), PostDetail::new("slow"));
        let mut rx = fetch.subscribe();

        fetch.start();
        tokio::time::sleep(Duration::from_millis(200)).await;
        drop(fetch);
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(*rx.borrow(), FetchState::Loading);
        assert_eq!(mock.hits(), 1);
        // The request task is gone, so the channel closes without a new value
        assert!(rx.changed().await.is_err());
        assert_eq!(*rx.borrow(), FetchState::Loading);
    }

    #[test]
    fn test_guard_fails_unsettled_task() {
        let (tx, rx) = watch::channel(FetchState::<()>::Loading);
        let tx = Arc::new(tx);

        drop(SettleGuard::new(Arc::clone(&tx), CancellationToken::new()));
        assert_eq!(*rx.borrow(), FetchState::Failed(FetchError::Aborted));
    }

    #[test]
    fn test_guard_respects_cancellation() {
        let (tx, rx) = watch::channel(FetchState::<()>::Loading);
        let tx = Arc::new(tx);
        let cancel = CancellationToken::new();
        cancel.cancel();

        SettleGuard::new(Arc::clone(&tx), cancel.clone()).settle(FetchState::Loaded(()));
        drop(SettleGuard::new(tx, cancel));
        assert_eq!(*rx.borrow(), FetchState::Loading);
    }
}
