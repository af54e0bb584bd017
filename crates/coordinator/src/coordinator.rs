use std::sync::Arc;
use std::time::Duration;

use api_client::ApiClient;
use documents::{Attachment, Contributor, Document, SortBy, SortOrder, ViewMode};
use live_updates::{ConnectionStatus, LiveConfig, LiveMessage, LiveUpdateClient};
use parking_lot::Mutex;
use store::{AppState, AppStore, SubscriptionId};
use tracing::{debug, error, info, warn};

use crate::{Config, Notification, Notifier};

/// Attempt budget for the initial load and refreshes.
const FETCH_ATTEMPTS: u32 = 3;
const FETCH_BASE_DELAY: Duration = Duration::from_secs(1);

/// The one message shown for any failed load; causes stay in the logs.
pub const FETCH_ERROR_MESSAGE: &str = "Failed to load documents";

/// Orchestrates the document client: pulls the initial snapshot over
/// REST, feeds live creation events into the store with deduplication,
/// and exposes the commands the presentation layer drives.
///
/// Constructed once at process start with its collaborators passed in
/// explicitly.
pub struct DocumentCoordinator {
    store: Arc<AppStore>,
    api: Arc<ApiClient>,
    live: Arc<LiveUpdateClient>,
    notifier: Arc<Notifier>,
    live_message_subscription: Mutex<Option<SubscriptionId>>,
    live_status_subscription: Mutex<Option<SubscriptionId>>,
}

impl DocumentCoordinator {
    pub fn new(store: Arc<AppStore>, api: Arc<ApiClient>, live: Arc<LiveUpdateClient>) -> Self {
        Self {
            store,
            api,
            live,
            notifier: Arc::new(Notifier::new()),
            live_message_subscription: Mutex::new(None),
            live_status_subscription: Mutex::new(None),
        }
    }

    /// Build the whole stack from endpoint configuration.
    pub fn from_config(config: &Config) -> api_client::Result<Self> {
        let store = Arc::new(AppStore::new());
        let api = Arc::new(ApiClient::new(config.api_base_url.as_str())?);
        let live = Arc::new(LiveUpdateClient::new(LiveConfig::new(
            config.live_url.as_str(),
        )));
        Ok(Self::new(store, api, live))
    }

    /// Load the initial snapshot, wire the live subscriptions, then open
    /// the live connection. A failed load lands in state as an error;
    /// initialization itself never fails.
    pub async fn initialize(&self) {
        info!("initializing document coordinator");

        if !self.api.is_server_available().await {
            warn!("document server did not answer the liveness probe");
        }

        self.load_documents().await;
        self.wire_live_updates();
        self.live.connect();
    }

    /// Fetch the document list and replace state with the result.
    /// Loading is cleared in a final step regardless of outcome.
    pub async fn load_documents(&self) {
        self.store.set_loading(true);
        self.store.clear_error();

        let result = self
            .api
            .retry_fetch(
                || self.api.fetch_documents(),
                FETCH_ATTEMPTS,
                FETCH_BASE_DELAY,
            )
            .await;

        match result {
            Ok(docs) => {
                info!("loaded {} documents", docs.len());
                self.store.set_documents(docs);
            }
            Err(err) => {
                error!("document load failed: {err}");
                self.store.set_error(FETCH_ERROR_MESSAGE);
            }
        }

        self.store.set_loading(false);
    }

    pub async fn refresh_documents(&self) {
        self.load_documents().await;
    }

    /// Optimistic local creation: no server round-trip. The new document
    /// gets a fresh id, version 1 and the current time, and lands at the
    /// top of the list.
    pub fn create_document(
        &self,
        name: impl Into<String>,
        contributors: Vec<Contributor>,
        attachments: Vec<Attachment>,
    ) -> Document {
        let document = Document::new(name, contributors, attachments);
        info!("created document {} locally", document.id);

        self.store.add_document(document.clone());
        self.notifier.notify(Notification::success(format!(
            "Document \"{}\" created",
            document.name
        )));

        document
    }

    fn wire_live_updates(&self) {
        let store = self.store.clone();
        let notifier = self.notifier.clone();
        let message_id = self.live.on_message(move |message| {
            if let LiveMessage::DocumentCreated {
                document_id,
                title,
                created_by,
                created_at,
            } = message
            {
                // A client can receive its own (or a repeated) creation
                // event; same id means drop.
                let exists = store
                    .get_state()
                    .documents
                    .iter()
                    .any(|doc| doc.id == *document_id);
                if exists {
                    debug!("duplicate creation event for {document_id}, dropping");
                    return;
                }

                let document = Document {
                    id: document_id.clone(),
                    name: title.clone(),
                    contributors: vec![Contributor::new(created_by.clone())],
                    version: 1,
                    created_at: *created_at,
                    attachments: Vec::new(),
                };
                store.add_document(document);
                notifier.notify(Notification::info(format!(
                    "{created_by} created \"{title}\""
                )));
            }
        });
        *self.live_message_subscription.lock() = Some(message_id);

        let notifier = self.notifier.clone();
        let status_id = self.live.on_status_change(move |status| match status {
            ConnectionStatus::Connected => {
                notifier.notify(Notification::info("Live updates connected"));
            }
            ConnectionStatus::Disconnected => {
                notifier.notify(Notification::info("Live updates unavailable"));
            }
            other => debug!("live connection status: {other:?}"),
        });
        *self.live_status_subscription.lock() = Some(status_id);
    }

    pub fn set_sort_criteria(&self, sort_by: SortBy, sort_order: SortOrder) {
        self.store.set_sort_criteria(sort_by, sort_order);
    }

    pub fn set_view_mode(&self, view_mode: ViewMode) {
        self.store.set_view_mode(view_mode);
    }

    pub fn toggle_view_mode(&self) {
        self.store.toggle_view_mode();
    }

    pub fn get_state(&self) -> AppState {
        self.store.get_state()
    }

    pub fn get_sorted_documents(&self) -> Vec<Document> {
        self.store.get_sorted_documents()
    }

    /// The shared store, for the rendering layer to subscribe to.
    pub fn store(&self) -> Arc<AppStore> {
        self.store.clone()
    }

    /// Liveness probe passthrough for the offline banner.
    pub async fn is_server_available(&self) -> bool {
        self.api.is_server_available().await
    }

    pub fn subscribe_notifications(
        &self,
        handler: impl Fn(&Notification) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.notifier.subscribe(handler)
    }

    pub fn unsubscribe_notifications(&self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// Drop the live subscriptions and close the live channel. Safe to
    /// call repeatedly, and before `initialize` ever ran.
    pub fn destroy(&self) {
        if let Some(id) = self.live_message_subscription.lock().take() {
            self.live.remove_message_handler(id);
        }
        if let Some(id) = self.live_status_subscription.lock().take() {
            self.live.remove_status_handler(id);
        }
        self.live.disconnect();
        info!("document coordinator destroyed");
    }
}
