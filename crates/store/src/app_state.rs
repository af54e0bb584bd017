use documents::{sort_documents, Document, SortBy, SortOrder, ViewMode};

use crate::{Store, SubscriptionId};

/// Snapshot of everything the document list UI renders from.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    /// Documents in insertion order, most recently created first
    pub documents: Vec<Document>,

    /// Initial load or refresh in flight
    pub is_loading: bool,

    /// User-facing error message, if any
    pub error: Option<String>,

    /// Active sort criterion
    pub sort_by: SortBy,

    /// Active sort direction
    pub sort_order: SortOrder,

    /// List or grid presentation
    pub view_mode: ViewMode,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            documents: Vec::new(),
            is_loading: false,
            error: None,
            sort_by: SortBy::CreatedAt,
            sort_order: SortOrder::Desc,
            view_mode: ViewMode::List,
        }
    }
}

/// Application store: the generic container specialized to [`AppState`],
/// with named setters for every mutation the coordinator performs.
///
/// Invariant: setting an error always clears the loading flag; loading
/// and error display are mutually exclusive signals to the UI.
pub struct AppStore {
    store: Store<AppState>,
}

impl AppStore {
    pub fn new() -> Self {
        Self {
            store: Store::new(AppState::default()),
        }
    }

    pub fn get_state(&self) -> AppState {
        self.store.get_state()
    }

    pub fn subscribe(
        &self,
        listener: impl Fn(&AppState) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.store.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    pub fn clear_subscribers(&self) {
        self.store.clear_subscribers()
    }

    /// Replace the whole document list. A successful load supersedes any
    /// previous error.
    pub fn set_documents(&self, documents: Vec<Document>) {
        self.store.update(|state| {
            state.documents = documents;
            state.error = None;
        });
    }

    /// Prepend a newly-created document.
    pub fn add_document(&self, document: Document) {
        self.store.update(|state| {
            state.documents.insert(0, document);
        });
    }

    pub fn set_loading(&self, is_loading: bool) {
        self.store.update(|state| {
            state.is_loading = is_loading;
        });
    }

    /// Record an error. Forces loading off.
    pub fn set_error(&self, message: impl Into<String>) {
        let message = message.into();
        self.store.update(|state| {
            state.error = Some(message);
            state.is_loading = false;
        });
    }

    pub fn clear_error(&self) {
        self.store.update(|state| {
            state.error = None;
        });
    }

    pub fn set_sort_by(&self, sort_by: SortBy) {
        self.store.update(|state| {
            state.sort_by = sort_by;
        });
    }

    pub fn set_sort_order(&self, sort_order: SortOrder) {
        self.store.update(|state| {
            state.sort_order = sort_order;
        });
    }

    /// Set criterion and direction in one merge (one change notification).
    pub fn set_sort_criteria(&self, sort_by: SortBy, sort_order: SortOrder) {
        self.store.update(|state| {
            state.sort_by = sort_by;
            state.sort_order = sort_order;
        });
    }

    pub fn set_view_mode(&self, view_mode: ViewMode) {
        self.store.update(|state| {
            state.view_mode = view_mode;
        });
    }

    pub fn toggle_view_mode(&self) {
        self.store.update(|state| {
            state.view_mode = state.view_mode.toggled();
        });
    }

    /// Documents ordered by the active criterion. Derived, never mutates
    /// the stored order.
    pub fn get_sorted_documents(&self) -> Vec<Document> {
        let state = self.get_state();
        let mut documents = state.documents;
        sort_documents(&mut documents, state.sort_by, state.sort_order);
        documents
    }
}

impl Default for AppStore {
    fn default() -> Self {
        Self::new()
    }
}
