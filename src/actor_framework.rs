//! # List resource actors
//!
//! Every admin list page is the same machine: a filter record, a fetch that
//! turns it into a query string, a page of items with pagination, page-local
//! stats, a handful of mutations that refresh the list afterwards, and an
//! optional detail modal.
//!
//! [`ListResourceActor`] owns that state for one page and is driven through a
//! cloneable [`ListResourceClient`]. A page plugs in by implementing
//! [`Resource`] on a marker type.
//!
//! Network calls never block the actor: each one runs in a spawned task that
//! posts its result back as a message tagged with a request token. Only the
//! newest token is committed, so a slow response can't overwrite a newer one
//! and a detail response that lands after the modal closed is dropped.

use std::fmt::Debug;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, instrument, warn, Instrument, Span};

use crate::api::{decode_entity, decode_list, ApiRequest, ListPage, SharedTransport};
use crate::error::{ApiError, ResourceError};
use crate::filters::{FilterField, FilterState, FilterValue, PAGE};
use crate::notify::{Confirm, Notifier};
use crate::pagination::{PagerControls, Pagination};

// =============================================================================
// 1. THE ABSTRACTION
// =============================================================================

/// Everything that differs between two list pages.
pub trait Resource: Debug + Clone + Send + Sync + 'static {
    type Item: DeserializeOwned + Clone + Debug + Send + Sync + 'static;
    type Detail: DeserializeOwned + Clone + Debug + Send + Sync + 'static;
    /// Aggregates over the items of the current page only.
    type Stats: Clone + Debug + Default + PartialEq + Send + Sync + 'static;
    type Action: Debug + Send + Sync + 'static;

    /// Plural name used in logs and generic messages ("orders").
    const NAME: &'static str;
    /// Shown when a fetch succeeds with no rows.
    const EMPTY_MESSAGE: &'static str;
    const LIST_PATH: &'static str;
    /// Key of the item array inside `data`.
    const LIST_KEY: &'static str;
    /// Key wrapping the document in by-id responses, if any.
    const DETAIL_KEY: Option<&'static str> = None;
    /// Endpoint with totals across the whole collection, if the backend has one.
    const STATS_PATH: Option<&'static str> = None;

    fn filter_schema() -> &'static [FilterField];

    fn default_filters(limit: u32) -> FilterState {
        FilterState::new(limit)
    }

    fn detail_path(id: &str) -> String;

    fn page_stats(items: &[Self::Item]) -> Self::Stats;

    /// Turns an action into a request. `Err` carries the validation message
    /// shown to the admin; nothing is sent in that case.
    fn mutation(action: &Self::Action) -> Result<Mutation, String>;
}

/// A prepared mutating call.
#[derive(Debug, Clone, PartialEq)]
pub struct Mutation {
    pub request: ApiRequest,
    /// Prompt that must be accepted before the request goes out.
    pub confirm: Option<String>,
    pub success: String,
    /// Shown when the backend gives no message of its own.
    pub failure: String,
}

impl Mutation {
    pub fn new(request: ApiRequest, success: impl Into<String>, failure: impl Into<String>) -> Self {
        Self { request, confirm: None, success: success.into(), failure: failure.into() }
    }

    pub fn confirm(mut self, prompt: impl Into<String>) -> Self {
        self.confirm = Some(prompt.into());
        self
    }
}

// =============================================================================
// 2. DISPLAY STATE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState<D> {
    Closed,
    Loading { id: String },
    Loaded { id: String, detail: D },
    Failed { id: String, message: String },
}

impl<D> DetailState<D> {
    pub fn selected_id(&self) -> Option<&str> {
        match self {
            DetailState::Closed => None,
            DetailState::Loading { id } | DetailState::Loaded { id, .. } | DetailState::Failed { id, .. } => Some(id),
        }
    }

    pub fn detail(&self) -> Option<&D> {
        match self {
            DetailState::Loaded { detail, .. } => Some(detail),
            _ => None,
        }
    }
}

/// What a page renders: a copy of the actor's state at one instant.
#[derive(Debug, Clone)]
pub struct ListSnapshot<R: Resource> {
    pub filters: FilterState,
    pub items: Vec<R::Item>,
    pub pagination: Pagination,
    /// Counts over `items`, i.e. this page only.
    pub page_stats: R::Stats,
    /// Collection-wide totals from the stats endpoint, when there is one.
    pub server_stats: Option<Value>,
    pub load_state: LoadState,
    pub detail: DetailState<R::Detail>,
}

impl<R: Resource> ListSnapshot<R> {
    fn initial(limit: u32) -> Self {
        Self {
            filters: R::default_filters(limit),
            items: Vec::new(),
            pagination: Pagination::empty(limit),
            page_stats: R::Stats::default(),
            server_stats: None,
            load_state: LoadState::Idle,
            detail: DetailState::Closed,
        }
    }

    pub fn pager(&self) -> PagerControls {
        PagerControls::from(&self.pagination)
    }

    /// A successful fetch with no rows. Not an error.
    pub fn is_empty(&self) -> bool {
        self.load_state == LoadState::Loaded && self.items.is_empty()
    }

    pub fn empty_message(&self) -> Option<&'static str> {
        self.is_empty().then_some(R::EMPTY_MESSAGE)
    }
}

// =============================================================================
// 3. THE MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<Result<T, ResourceError>>;

#[derive(Debug)]
pub enum ResourceRequest<R: Resource> {
    SetFilters {
        changes: Vec<(String, FilterValue)>,
        respond_to: Response<()>,
    },
    ClearFilters {
        respond_to: Response<()>,
    },
    Refresh {
        respond_to: Response<()>,
    },
    Perform {
        action: R::Action,
        respond_to: Response<()>,
    },
    OpenDetail {
        id: String,
        respond_to: Response<()>,
    },
    CloseDetail {
        respond_to: Response<()>,
    },
    Snapshot {
        respond_to: oneshot::Sender<ListSnapshot<R>>,
    },
    /// Answered once nothing is in flight.
    Settled {
        respond_to: oneshot::Sender<ListSnapshot<R>>,
    },
    Shutdown,

    // Posted back by the actor's own request tasks.
    ListLoaded {
        token: u64,
        result: Result<ListPage<R::Item>, ApiError>,
    },
    StatsLoaded {
        token: u64,
        result: Result<Value, ApiError>,
    },
    DetailLoaded {
        token: u64,
        result: Result<R::Detail, ApiError>,
    },
    MutationDone {
        success: String,
        failure: String,
        result: Result<Value, ResourceError>,
        respond_to: Response<()>,
    },
}

// =============================================================================
// 4. THE ACTOR
// =============================================================================

/// Shared collaborators handed to every page actor.
#[derive(Clone)]
pub struct ActorContext {
    pub transport: SharedTransport,
    pub notifier: Notifier,
    pub confirm: Arc<dyn Confirm>,
    pub buffer_size: usize,
    pub page_limit: u32,
}

pub struct ListResourceActor<R: Resource> {
    receiver: mpsc::Receiver<ResourceRequest<R>>,
    // Weak so that dropping every client still closes the channel.
    own_sender: mpsc::WeakSender<ResourceRequest<R>>,
    transport: SharedTransport,
    notifier: Notifier,
    confirm: Arc<dyn Confirm>,
    page_limit: u32,
    state: ListSnapshot<R>,
    list_token: u64,
    detail_token: u64,
    stats_token: u64,
    stats_loading: bool,
    mutations_in_flight: usize,
    waiters: Vec<oneshot::Sender<ListSnapshot<R>>>,
}

impl<R: Resource> ListResourceActor<R> {
    pub fn new(ctx: &ActorContext) -> (Self, ListResourceClient<R>) {
        let (sender, receiver) = mpsc::channel(ctx.buffer_size.max(1));
        let actor = Self {
            receiver,
            own_sender: sender.downgrade(),
            transport: ctx.transport.clone(),
            notifier: ctx.notifier.clone(),
            confirm: ctx.confirm.clone(),
            page_limit: ctx.page_limit,
            state: ListSnapshot::initial(ctx.page_limit),
            list_token: 0,
            detail_token: 0,
            stats_token: 0,
            stats_loading: false,
            mutations_in_flight: 0,
            waiters: Vec::new(),
        };
        (actor, ListResourceClient { sender })
    }

    /// Fetches the first page, then serves requests until shutdown or until
    /// every client is dropped.
    #[instrument(name = "list_resource", skip(self), fields(resource = R::NAME))]
    pub async fn run(mut self) {
        info!("Resource actor starting");
        self.start_fetch();
        self.start_stats_fetch();

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::SetFilters { changes, respond_to } => {
                    self.handle_set_filters(changes, respond_to);
                }
                ResourceRequest::ClearFilters { respond_to } => {
                    debug!("Clearing filters");
                    self.state.filters = R::default_filters(self.page_limit);
                    self.start_fetch();
                    let _ = respond_to.send(Ok(()));
                }
                ResourceRequest::Refresh { respond_to } => {
                    self.start_fetch();
                    let _ = respond_to.send(Ok(()));
                }
                ResourceRequest::Perform { action, respond_to } => {
                    self.handle_perform(action, respond_to);
                }
                ResourceRequest::OpenDetail { id, respond_to } => {
                    self.handle_open_detail(id, respond_to);
                }
                ResourceRequest::CloseDetail { respond_to } => {
                    debug!("Closing detail");
                    self.detail_token += 1;
                    self.state.detail = DetailState::Closed;
                    let _ = respond_to.send(Ok(()));
                }
                ResourceRequest::Snapshot { respond_to } => {
                    let _ = respond_to.send(self.state.clone());
                }
                ResourceRequest::Settled { respond_to } => {
                    self.waiters.push(respond_to);
                }
                ResourceRequest::ListLoaded { token, result } => {
                    self.handle_list_loaded(token, result);
                }
                ResourceRequest::StatsLoaded { token, result } => {
                    self.handle_stats_loaded(token, result);
                }
                ResourceRequest::DetailLoaded { token, result } => {
                    self.handle_detail_loaded(token, result);
                }
                ResourceRequest::MutationDone { success, failure, result, respond_to } => {
                    self.handle_mutation_done(success, failure, result, respond_to);
                }
                ResourceRequest::Shutdown => {
                    info!("Resource actor shutting down");
                    break;
                }
            }
            self.flush_waiters();
        }

        info!("Resource actor stopped");
    }

    fn is_settled(&self) -> bool {
        self.state.load_state != LoadState::Loading
            && !matches!(self.state.detail, DetailState::Loading { .. })
            && !self.stats_loading
            && self.mutations_in_flight == 0
    }

    fn flush_waiters(&mut self) {
        if self.waiters.is_empty() || !self.is_settled() {
            return;
        }
        for waiter in self.waiters.drain(..) {
            let _ = waiter.send(self.state.clone());
        }
    }

    /// Runs `call` in a task and posts its outcome back to this actor.
    fn spawn_call<F>(&self, call: F)
    where
        F: std::future::Future<Output = ResourceRequest<R>> + Send + 'static,
    {
        let Some(sender) = self.own_sender.upgrade() else {
            debug!("No clients left, request not sent");
            return;
        };
        tokio::spawn(
            async move {
                // A closed channel means the actor is gone; the result is moot.
                let _ = sender.send(call.await).await;
            }
            .instrument(Span::current()),
        );
    }

    fn start_fetch(&mut self) {
        self.list_token += 1;
        let token = self.list_token;
        self.state.load_state = LoadState::Loading;

        let filters = &self.state.filters;
        let (page, limit) = (filters.page(), filters.limit());
        let request = ApiRequest::get(R::LIST_PATH).with_query(filters.sanitize(R::filter_schema()));
        debug!(token, page, "Fetching list");

        let transport = self.transport.clone();
        self.spawn_call(async move {
            let result = match transport.send(request).await {
                Ok(body) => decode_list(body, R::LIST_KEY, page, limit),
                Err(e) => Err(e),
            };
            ResourceRequest::ListLoaded { token, result }
        });
    }

    fn start_stats_fetch(&mut self) {
        let Some(path) = R::STATS_PATH else { return };
        self.stats_token += 1;
        let token = self.stats_token;
        self.stats_loading = true;

        let transport = self.transport.clone();
        self.spawn_call(async move {
            let result = transport.send(ApiRequest::get(path)).await.map(|body| match body {
                Value::Object(mut map) if map.contains_key("data") => map.remove("data").unwrap_or_default(),
                other => other,
            });
            ResourceRequest::StatsLoaded { token, result }
        });
    }

    #[instrument(skip(self, respond_to), fields(resource = R::NAME))]
    fn handle_set_filters(&mut self, changes: Vec<(String, FilterValue)>, respond_to: Response<()>) {
        debug!("Processing set_filters request");
        match self.state.filters.apply_all(R::filter_schema(), changes) {
            Ok(()) => {
                self.start_fetch();
                let _ = respond_to.send(Ok(()));
            }
            Err(e) => {
                warn!(error = %e, "Filter change rejected");
                let _ = respond_to.send(Err(e));
            }
        }
    }

    #[instrument(skip(self, respond_to), fields(resource = R::NAME))]
    fn handle_perform(&mut self, action: R::Action, respond_to: Response<()>) {
        debug!("Processing perform request");

        let mutation = match R::mutation(&action) {
            Ok(m) => m,
            Err(message) => {
                warn!(message = %message, "Validation failed");
                self.notifier.validation(message.clone());
                let _ = respond_to.send(Err(ResourceError::Validation(message)));
                return;
            }
        };

        self.mutations_in_flight += 1;
        let Mutation { request, confirm, success, failure } = mutation;
        let transport = self.transport.clone();
        let confirmer = self.confirm.clone();
        self.spawn_call(async move {
            if let Some(prompt) = confirm {
                if !ask(confirmer, prompt.clone()).await {
                    info!("Action declined at confirmation");
                    let result = Err(ResourceError::Cancelled(prompt));
                    return ResourceRequest::MutationDone { success, failure, result, respond_to };
                }
            }
            let result = transport.send(request).await.map_err(ResourceError::Api);
            ResourceRequest::MutationDone { success, failure, result, respond_to }
        });
    }

    fn handle_mutation_done(
        &mut self,
        success: String,
        failure: String,
        result: Result<Value, ResourceError>,
        respond_to: Response<()>,
    ) {
        self.mutations_in_flight = self.mutations_in_flight.saturating_sub(1);
        match result {
            Ok(_) => {
                info!(message = %success, "Mutation succeeded");
                self.notifier.success(success);
                self.start_fetch();
                self.start_stats_fetch();
                let _ = respond_to.send(Ok(()));
            }
            Err(ResourceError::Api(e)) => {
                let message = e.user_message(&failure);
                error!(error = %e, "Mutation failed");
                self.notifier.error(message);
                let _ = respond_to.send(Err(ResourceError::Api(e)));
            }
            // Declined at the prompt: nothing was sent, nothing to report.
            Err(e) => {
                let _ = respond_to.send(Err(e));
            }
        }
    }

    fn handle_list_loaded(&mut self, token: u64, result: Result<ListPage<R::Item>, ApiError>) {
        if token != self.list_token {
            warn!(token, current = self.list_token, "Discarding stale list response");
            return;
        }

        match result {
            Ok(page) => {
                info!(
                    count = page.items.len(),
                    total = page.pagination.total_items,
                    page = page.pagination.page,
                    "List loaded"
                );
                self.state.page_stats = R::page_stats(&page.items);
                self.state.items = page.items;
                self.state.pagination = page.pagination;
                self.state.load_state = LoadState::Loaded;
            }
            Err(e) => {
                let message = e.user_message(&format!("Failed to fetch {}", R::NAME));
                error!(error = %e, "List fetch failed");
                self.notifier.error(message.clone());
                self.state.load_state = LoadState::Failed(message);
            }
        }
    }

    fn handle_stats_loaded(&mut self, token: u64, result: Result<Value, ApiError>) {
        if token != self.stats_token {
            debug!(token, "Discarding stale stats response");
            return;
        }
        self.stats_loading = false;
        match result {
            Ok(stats) => self.state.server_stats = Some(stats),
            // Tiles fall back to page-local counts.
            Err(e) => warn!(error = %e, "Stats fetch failed"),
        }
    }

    #[instrument(skip(self, respond_to), fields(resource = R::NAME, id = %id))]
    fn handle_open_detail(&mut self, id: String, respond_to: Response<()>) {
        debug!("Processing open_detail request");
        self.detail_token += 1;
        let token = self.detail_token;
        self.state.detail = DetailState::Loading { id: id.clone() };

        let transport = self.transport.clone();
        self.spawn_call(async move {
            let result = match transport.send(ApiRequest::get(R::detail_path(&id))).await {
                Ok(body) => decode_entity(body, R::DETAIL_KEY),
                Err(e) => Err(e),
            };
            ResourceRequest::DetailLoaded { token, result }
        });
        let _ = respond_to.send(Ok(()));
    }

    fn handle_detail_loaded(&mut self, token: u64, result: Result<R::Detail, ApiError>) {
        let id = match &self.state.detail {
            DetailState::Loading { id } if token == self.detail_token => id.clone(),
            _ => {
                debug!(token, "Discarding detail response for a closed or replaced modal");
                return;
            }
        };

        self.state.detail = match result {
            Ok(detail) => {
                info!(id = %id, "Detail loaded");
                DetailState::Loaded { id, detail }
            }
            Err(e) => {
                let message = e.user_message(&format!("Failed to fetch {} details", R::NAME));
                error!(error = %e, id = %id, "Detail fetch failed");
                self.notifier.error(message.clone());
                DetailState::Failed { id, message }
            }
        };
    }
}

/// Runs the prompt on the blocking pool so a waiting answer never holds a
/// runtime worker. A prompt that panics counts as declined.
async fn ask(confirmer: Arc<dyn Confirm>, prompt: String) -> bool {
    tokio::task::spawn_blocking(move || confirmer.confirm(&prompt)).await.unwrap_or(false)
}

// =============================================================================
// 5. THE CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ListResourceClient<R: Resource> {
    sender: mpsc::Sender<ResourceRequest<R>>,
}

impl<R: Resource> ListResourceClient<R> {
    async fn call<T>(&self, make: impl FnOnce(Response<T>) -> ResourceRequest<R>) -> Result<T, ResourceError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(make(respond_to))
            .await
            .map_err(|_| ResourceError::ActorCommunicationError("Actor closed".to_string()))?;
        response
            .await
            .map_err(|_| ResourceError::ActorCommunicationError("Actor dropped".to_string()))?
    }

    async fn view(
        &self,
        make: impl FnOnce(oneshot::Sender<ListSnapshot<R>>) -> ResourceRequest<R>,
    ) -> Result<ListSnapshot<R>, ResourceError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(make(respond_to))
            .await
            .map_err(|_| ResourceError::ActorCommunicationError("Actor closed".to_string()))?;
        response
            .await
            .map_err(|_| ResourceError::ActorCommunicationError("Actor dropped".to_string()))
    }

    #[instrument(skip(self, value), fields(resource = R::NAME))]
    pub async fn set_filter(&self, name: &str, value: impl Into<FilterValue>) -> Result<(), ResourceError> {
        debug!("Sending request");
        let changes = vec![(name.to_string(), value.into())];
        self.call(|respond_to| ResourceRequest::SetFilters { changes, respond_to }).await
    }

    #[instrument(skip(self, changes), fields(resource = R::NAME))]
    pub async fn set_filters(&self, changes: Vec<(&str, FilterValue)>) -> Result<(), ResourceError> {
        debug!("Sending request");
        let changes = changes.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
        self.call(|respond_to| ResourceRequest::SetFilters { changes, respond_to }).await
    }

    #[instrument(skip(self), fields(resource = R::NAME))]
    pub async fn set_page(&self, page: u32) -> Result<(), ResourceError> {
        debug!("Sending request");
        let changes = vec![(PAGE.to_string(), FilterValue::from(page))];
        self.call(|respond_to| ResourceRequest::SetFilters { changes, respond_to }).await
    }

    #[instrument(skip(self), fields(resource = R::NAME))]
    pub async fn clear_filters(&self) -> Result<(), ResourceError> {
        debug!("Sending request");
        self.call(|respond_to| ResourceRequest::ClearFilters { respond_to }).await
    }

    #[instrument(skip(self), fields(resource = R::NAME))]
    pub async fn refresh(&self) -> Result<(), ResourceError> {
        debug!("Sending request");
        self.call(|respond_to| ResourceRequest::Refresh { respond_to }).await
    }

    /// Resolves when the mutation itself has finished; the list refresh it
    /// triggers is still in flight at that point.
    #[instrument(skip(self), fields(resource = R::NAME))]
    pub async fn perform(&self, action: R::Action) -> Result<(), ResourceError> {
        debug!("Sending request");
        self.call(|respond_to| ResourceRequest::Perform { action, respond_to }).await
    }

    #[instrument(skip(self), fields(resource = R::NAME))]
    pub async fn open_detail(&self, id: &str) -> Result<(), ResourceError> {
        debug!("Sending request");
        let id = id.to_string();
        self.call(|respond_to| ResourceRequest::OpenDetail { id, respond_to }).await
    }

    #[instrument(skip(self), fields(resource = R::NAME))]
    pub async fn close_detail(&self) -> Result<(), ResourceError> {
        debug!("Sending request");
        self.call(|respond_to| ResourceRequest::CloseDetail { respond_to }).await
    }

    pub async fn snapshot(&self) -> Result<ListSnapshot<R>, ResourceError> {
        self.view(|respond_to| ResourceRequest::Snapshot { respond_to }).await
    }

    /// Waits until no fetch, detail load or mutation is in flight.
    pub async fn settled(&self) -> Result<ListSnapshot<R>, ResourceError> {
        self.view(|respond_to| ResourceRequest::Settled { respond_to }).await
    }

    #[instrument(skip(self), fields(resource = R::NAME))]
    pub async fn shutdown(&self) -> Result<(), ResourceError> {
        debug!("Sending shutdown request");
        self.sender
            .send(ResourceRequest::Shutdown)
            .await
            .map_err(|_| ResourceError::ActorCommunicationError("Actor closed".to_string()))
    }
}

// =============================================================================
// 6. TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Method;
    use crate::mock_framework::{expect_call, expect_get, mock_context, no_pending_call, MockHarness};
    use crate::notify::NotificationLevel;
    use serde::Deserialize;
    use serde_json::json;

    // --- Domain Definition ---

    #[derive(Debug, Clone, Deserialize, PartialEq)]
    struct Widget {
        id: String,
        #[serde(default)]
        broken: bool,
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    struct WidgetStats {
        broken: usize,
    }

    #[derive(Debug)]
    enum WidgetAction {
        Fix(String),
        Scrap(String),
        Rename { id: String, name: String },
    }

    #[derive(Debug, Clone, Copy)]
    struct Widgets;

    impl Resource for Widgets {
        type Item = Widget;
        type Detail = Widget;
        type Stats = WidgetStats;
        type Action = WidgetAction;

        const NAME: &'static str = "widgets";
        const EMPTY_MESSAGE: &'static str = "No widgets found";
        const LIST_PATH: &'static str = "admin/widgets";
        const LIST_KEY: &'static str = "widgets";
        const DETAIL_KEY: Option<&'static str> = Some("widget");

        fn filter_schema() -> &'static [FilterField] {
            const SCHEMA: &[FilterField] = &[
                FilterField::one_of("status", &["pending", "done"]),
                FilterField::text("search"),
            ];
            SCHEMA
        }

        fn detail_path(id: &str) -> String {
            format!("admin/widgets/{}", id)
        }

        fn page_stats(items: &[Widget]) -> WidgetStats {
            WidgetStats { broken: items.iter().filter(|w| w.broken).count() }
        }

        fn mutation(action: &WidgetAction) -> Result<Mutation, String> {
            match action {
                WidgetAction::Fix(id) => Ok(Mutation::new(
                    ApiRequest::patch(format!("admin/widgets/{}/fix", id), None),
                    "Widget fixed",
                    "Failed to fix widget",
                )),
                WidgetAction::Scrap(id) => Ok(Mutation::new(
                    ApiRequest::delete(format!("admin/widgets/{}", id)),
                    "Widget scrapped",
                    "Failed to scrap widget",
                )
                .confirm("Scrap this widget?")),
                WidgetAction::Rename { name, .. } if name.trim().is_empty() => Err("Name is required".to_string()),
                WidgetAction::Rename { id, name } => Ok(Mutation::new(
                    ApiRequest::put(format!("admin/widgets/{}", id), json!({ "name": name })),
                    "Widget renamed",
                    "Failed to rename widget",
                )),
            }
        }
    }

    fn page(ids: &[&str], page: u32, pages: u32) -> Value {
        let widgets: Vec<Value> = ids.iter().map(|id| json!({ "id": id, "broken": id.starts_with('b') })).collect();
        json!({ "data": { "widgets": widgets, "pagination": { "total": pages * 10, "page": page, "pages": pages, "limit": 10 } } })
    }

    fn start(confirm: bool) -> (ListResourceClient<Widgets>, MockHarness) {
        let (ctx, harness) = mock_context(confirm);
        let (actor, client) = ListResourceActor::<Widgets>::new(&ctx);
        tokio::spawn(actor.run());
        (client, harness)
    }

    // --- Tests ---

    #[tokio::test]
    async fn test_initial_fetch_populates_snapshot() {
        let (client, mut harness) = start(true);

        let call = expect_get(&mut harness.calls, "admin/widgets").await;
        assert_eq!(call.request.query_value("page"), Some("1"));
        assert_eq!(call.request.query_value("limit"), Some("10"));
        call.reply(page(&["a1", "b2", "b3"], 1, 3));

        let snap = client.settled().await.unwrap();
        assert_eq!(snap.items.len(), 3);
        assert_eq!(snap.load_state, LoadState::Loaded);
        assert_eq!(snap.page_stats, WidgetStats { broken: 2 });
        assert!(snap.pager().previous_disabled);
        assert!(!snap.pager().next_disabled);
    }

    #[tokio::test]
    async fn test_empty_result_is_not_an_error() {
        let (client, mut harness) = start(true);
        expect_get(&mut harness.calls, "admin/widgets").await.reply(page(&[], 1, 0));

        let snap = client.settled().await.unwrap();
        assert!(snap.is_empty());
        assert_eq!(snap.empty_message(), Some("No widgets found"));
        assert!(harness.notifications.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_page() {
        let (client, mut harness) = start(true);
        expect_get(&mut harness.calls, "admin/widgets").await.reply(page(&["a1", "a2"], 1, 2));
        let before = client.settled().await.unwrap();

        client.set_page(2).await.unwrap();
        expect_get(&mut harness.calls, "admin/widgets")
            .await
            .fail(ApiError::Status { status: 500, message: Some("Database unavailable".into()) });

        let after = client.settled().await.unwrap();
        assert_eq!(after.items, before.items);
        assert_eq!(after.pagination, before.pagination);
        assert_eq!(after.load_state, LoadState::Failed("Database unavailable".into()));

        let n = harness.notifications.recv().await.unwrap();
        assert_eq!(n.level, NotificationLevel::Error);
        assert_eq!(n.message, "Database unavailable");
        assert!(harness.notifications.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded() {
        let (client, mut harness) = start(true);
        expect_get(&mut harness.calls, "admin/widgets").await.reply(page(&["a0"], 1, 1));
        client.settled().await.unwrap();

        client.set_filter("status", "pending").await.unwrap();
        let first = expect_get(&mut harness.calls, "admin/widgets").await;
        client.set_filter("status", "done").await.unwrap();
        let second = expect_get(&mut harness.calls, "admin/widgets").await;
        assert_eq!(second.request.query_value("status"), Some("done"));

        second.reply(page(&["done1"], 1, 1));
        first.reply(page(&["pending1"], 1, 1));

        let snap = client.settled().await.unwrap();
        assert_eq!(snap.items[0].id, "done1");
    }

    #[tokio::test]
    async fn test_unknown_filter_is_rejected_without_fetch() {
        let (client, mut harness) = start(true);
        expect_get(&mut harness.calls, "admin/widgets").await.reply(page(&["a"], 1, 1));
        client.settled().await.unwrap();

        let err = client.set_filter("colour", "red").await.unwrap_err();
        assert_eq!(err, ResourceError::UnknownFilter("colour".into()));
        assert!(no_pending_call(&mut harness.calls).await);
    }

    #[tokio::test]
    async fn test_mutation_refetches_with_current_filters() {
        let (client, mut harness) = start(true);
        expect_get(&mut harness.calls, "admin/widgets").await.reply(page(&["b1"], 1, 1));
        client.set_filter("search", "b").await.unwrap();
        expect_get(&mut harness.calls, "admin/widgets").await.reply(page(&["b1"], 1, 1));
        client.settled().await.unwrap();

        let perform = {
            let client = client.clone();
            tokio::spawn(async move { client.perform(WidgetAction::Fix("b1".into())).await })
        };
        let call = expect_call(&mut harness.calls).await;
        assert_eq!(call.request.method, Method::Patch);
        assert_eq!(call.request.path, "admin/widgets/b1/fix");
        call.reply(json!({ "success": true }));
        perform.await.unwrap().unwrap();

        let refetch = expect_get(&mut harness.calls, "admin/widgets").await;
        assert_eq!(refetch.request.query_value("search"), Some("b"));
        refetch.reply(page(&["b1"], 1, 1));
        client.settled().await.unwrap();
        assert!(no_pending_call(&mut harness.calls).await);

        assert_eq!(harness.notifications.recv().await.unwrap().message, "Widget fixed");
    }

    #[tokio::test]
    async fn test_failed_mutation_uses_fallback_message() {
        let (client, mut harness) = start(true);
        expect_get(&mut harness.calls, "admin/widgets").await.reply(page(&["a"], 1, 1));
        client.settled().await.unwrap();

        let perform = {
            let client = client.clone();
            tokio::spawn(async move { client.perform(WidgetAction::Fix("a".into())).await })
        };
        expect_call(&mut harness.calls).await.fail(ApiError::Network("connection reset".into()));

        let result = perform.await.unwrap();
        assert!(matches!(result, Err(ResourceError::Api(ApiError::Network(_)))));
        assert_eq!(harness.notifications.recv().await.unwrap().message, "Failed to fix widget");
        assert!(no_pending_call(&mut harness.calls).await);
    }

    #[tokio::test]
    async fn test_validation_blocks_request() {
        let (client, mut harness) = start(true);
        expect_get(&mut harness.calls, "admin/widgets").await.reply(page(&["a"], 1, 1));
        client.settled().await.unwrap();

        let result = client.perform(WidgetAction::Rename { id: "a".into(), name: " ".into() }).await;
        assert_eq!(result, Err(ResourceError::Validation("Name is required".into())));
        assert!(no_pending_call(&mut harness.calls).await);

        let n = harness.notifications.recv().await.unwrap();
        assert_eq!(n.level, NotificationLevel::Validation);
    }

    #[tokio::test]
    async fn test_declined_confirmation_sends_nothing() {
        let (client, mut harness) = start(false);
        expect_get(&mut harness.calls, "admin/widgets").await.reply(page(&["a"], 1, 1));
        client.settled().await.unwrap();

        let result = client.perform(WidgetAction::Scrap("a".into())).await;
        assert_eq!(result, Err(ResourceError::Cancelled("Scrap this widget?".into())));
        assert!(no_pending_call(&mut harness.calls).await);
    }

    /// Holds its answer until the test releases it.
    struct HeldConfirm {
        asked: mpsc::UnboundedSender<String>,
        answer: std::sync::Mutex<std::sync::mpsc::Receiver<bool>>,
    }

    impl Confirm for HeldConfirm {
        fn confirm(&self, prompt: &str) -> bool {
            let _ = self.asked.send(prompt.to_string());
            self.answer.lock().map(|rx| rx.recv().unwrap_or(false)).unwrap_or(false)
        }
    }

    #[tokio::test]
    async fn test_open_prompt_does_not_stall_the_page() {
        let (asked_tx, mut asked) = mpsc::unbounded_channel();
        let (answer, answer_rx) = std::sync::mpsc::channel();
        let (mut ctx, mut harness) = mock_context(true);
        ctx.confirm = Arc::new(HeldConfirm { asked: asked_tx, answer: std::sync::Mutex::new(answer_rx) });
        let (actor, client) = ListResourceActor::<Widgets>::new(&ctx);
        tokio::spawn(actor.run());

        expect_get(&mut harness.calls, "admin/widgets").await.reply(page(&["a"], 1, 1));
        client.settled().await.unwrap();

        let pending = tokio::spawn({
            let client = client.clone();
            async move { client.perform(WidgetAction::Scrap("a".into())).await }
        });
        assert_eq!(asked.recv().await.as_deref(), Some("Scrap this widget?"));

        // The prompt is open; the page keeps answering and nothing is sent.
        let snap = tokio::time::timeout(std::time::Duration::from_secs(1), client.snapshot())
            .await
            .expect("page stalled behind the prompt")
            .unwrap();
        assert_eq!(snap.items.len(), 1);
        assert!(no_pending_call(&mut harness.calls).await);

        answer.send(true).unwrap();
        let call = expect_call(&mut harness.calls).await;
        assert_eq!(call.request.method, Method::Delete);
        call.reply(json!({ "message": "ok" }));
        expect_get(&mut harness.calls, "admin/widgets").await.reply(page(&[], 1, 0));

        assert_eq!(pending.await.unwrap(), Ok(()));
    }

    #[tokio::test]
    async fn test_detail_opens_and_late_response_after_close_is_dropped() {
        let (client, mut harness) = start(true);
        expect_get(&mut harness.calls, "admin/widgets").await.reply(page(&["a"], 1, 1));
        client.settled().await.unwrap();

        client.open_detail("a").await.unwrap();
        let call = expect_get(&mut harness.calls, "admin/widgets/a").await;
        assert_eq!(client.snapshot().await.unwrap().detail, DetailState::Loading { id: "a".into() });
        call.reply(json!({ "data": { "widget": { "id": "a", "broken": true } } }));
        let snap = client.settled().await.unwrap();
        assert_eq!(snap.detail.detail().map(|w| w.broken), Some(true));

        client.open_detail("b").await.unwrap();
        let late = expect_get(&mut harness.calls, "admin/widgets/b").await;
        client.close_detail().await.unwrap();
        late.reply(json!({ "data": { "widget": { "id": "b" } } }));

        let snap = client.settled().await.unwrap();
        assert_eq!(snap.detail, DetailState::Closed);
    }

    #[tokio::test]
    async fn test_detail_replaced_by_newer_selection() {
        let (client, mut harness) = start(true);
        expect_get(&mut harness.calls, "admin/widgets").await.reply(page(&["a"], 1, 1));

        client.open_detail("first").await.unwrap();
        let first = expect_get(&mut harness.calls, "admin/widgets/first").await;
        client.open_detail("second").await.unwrap();
        let second = expect_get(&mut harness.calls, "admin/widgets/second").await;

        second.reply(json!({ "data": { "widget": { "id": "second" } } }));
        first.reply(json!({ "data": { "widget": { "id": "first" } } }));

        let snap = client.settled().await.unwrap();
        assert_eq!(snap.detail.selected_id(), Some("second"));
        assert_eq!(snap.detail.detail().map(|w| w.id.as_str()), Some("second"));
    }

    #[tokio::test]
    async fn test_shutdown_stops_actor() {
        let (client, mut harness) = start(true);
        expect_get(&mut harness.calls, "admin/widgets").await.reply(page(&["a"], 1, 1));
        client.settled().await.unwrap();

        client.shutdown().await.unwrap();
        let err = client.snapshot().await.unwrap_err();
        assert!(matches!(err, ResourceError::ActorCommunicationError(_)));
    }
}
