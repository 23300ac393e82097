//! # Test Fixtures
//!
//! A [`Harness`] is one mock backend plus a store talking to it, with every
//! port swapped for a recording double.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use sd_api_client::{
    ApiClient, ClientConfig, ExpiredTokenPolicy, FixedTimeSource, KeyValueStore, MemoryStore,
    RecordingRedirect,
};
use sd_store::{Store, StoreContext, StoreHandle};
use serde_json::{json, Value};
use shared_bus::{EventFilter, InMemoryEventBus, StoreEvent, Subscription};
use std::sync::Arc;
use std::time::Duration;
use wiremock::MockServer;

/// "Now" for every harness clock: 2024-01-01T00:00:00Z.
pub const NOW: i64 = 1_704_067_200;

pub struct Harness {
    pub server: MockServer,
    pub store: StoreHandle,
    pub api: Arc<ApiClient>,
    pub storage: Arc<MemoryStore>,
    pub redirect: Arc<RecordingRedirect>,
    pub clock: Arc<FixedTimeSource>,
    pub bus: Arc<InMemoryEventBus>,
}

impl Harness {
    pub async fn start() -> Self {
        Self::build(ExpiredTokenPolicy::Abort, MemoryStore::new(), |context| context).await
    }

    /// Harness whose storage already holds `token`.
    pub async fn with_token(token: &str, policy: ExpiredTokenPolicy) -> Self {
        Self::build(policy, MemoryStore::with_entries([("token", token)]), |context| {
            context
        })
        .await
    }

    pub async fn build(
        policy: ExpiredTokenPolicy,
        storage: MemoryStore,
        customize: impl FnOnce(StoreContext) -> StoreContext,
    ) -> Self {
        let server = MockServer::start().await;
        let storage = Arc::new(storage);
        let redirect = Arc::new(RecordingRedirect::new());
        let clock = Arc::new(FixedTimeSource::at(NOW));
        let bus = Arc::new(InMemoryEventBus::new());

        let config = ClientConfig {
            expired_token_policy: policy,
            ..ClientConfig::with_base_url(server.uri())
        };
        let api = Arc::new(
            ApiClient::new(&config, Arc::clone(&storage) as Arc<dyn KeyValueStore>)
                .expect("valid client config")
                .with_redirect(redirect.clone())
                .with_clock(clock.clone())
                .with_events(bus.clone()),
        );
        let store = Store::spawn(customize(StoreContext::new(Arc::clone(&api))), Arc::clone(&bus));

        Self {
            server,
            store,
            api,
            storage,
            redirect,
            clock,
            bus,
        }
    }

    pub fn subscribe_all(&self) -> Subscription {
        self.bus.subscribe(EventFilter::all())
    }
}

/// Unsigned JWT carrying `claims`.
pub fn token_with(claims: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.signature")
}

/// Token for account `acc-1` expiring at `exp`.
pub fn token_expiring_at(exp: i64) -> String {
    token_with(&json!({ "sub": "admin@corp.io", "id": "acc-1", "role": "Admin", "exp": exp }))
}

pub fn skill(id: &str, status: &str) -> Value {
    json!({ "_id": id, "name": format!("skill-{id}"), "category": "Language", "status": status })
}

pub fn project(id: &str, name: &str) -> Value {
    json!({ "_id": id, "name": name, "status": "Ongoing", "isDeleted": false })
}

/// Next event within a second, or `None`.
pub async fn next_event(subscription: &mut Subscription) -> Option<StoreEvent> {
    tokio::time::timeout(Duration::from_secs(1), subscription.recv())
        .await
        .ok()
        .flatten()
}

/// Every event already queued, after giving in-flight publishes a moment.
pub async fn settle_events(subscription: &mut Subscription) -> Vec<StoreEvent> {
    tokio::time::sleep(Duration::from_millis(20)).await;
    subscription.drain()
}
