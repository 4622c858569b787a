//! Grid orchestration.
//!
//! [`Grid`] wires the column flow (visibility → header layout → renderer)
//! and the row flow (viewport → scroll controller → data source → renderer)
//! together. Both flows push typed updates into a [`GridRenderer`]; the
//! renderer reports the viewport back through [`Grid::on_viewport_change`].
//!
//! Everything runs on one task. Requests are futures held by the grid and
//! make progress while the owner awaits [`Grid::next_completion`], typically
//! from the same `select!` loop that handles UI events.

use std::sync::Arc;

use futures::StreamExt;
use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use tokio::sync::mpsc;

use crate::api::query::Direction;
use crate::api::query::Filter;
use crate::api::query::FilterOp;
use crate::api::query::Page;
use crate::api::query::PageRequest;
use crate::api::query::QueryState;
use crate::api::query::QueryUpdate;
use crate::cell::CellRenderer;
use crate::cell::Renderable;
use crate::config::FieldPolicy;
use crate::config::GridConfig;
use crate::error::Error;
use crate::model::ColumnModel;
use crate::model::HeaderRow;
use crate::model::Record;
use crate::scroll::ScrollLoadController;
use crate::scroll::Viewport;
use crate::source::Completion;
use crate::source::DataSourceState;
use crate::source::PageFetcher;
use crate::source::PaginatedDataSource;
use crate::visibility::ColumnVisibilityManager;
use crate::visibility::VisibilityStore;

/// Receives everything the grid wants drawn.
pub trait GridRenderer {
    /// The header layout was rebuilt.
    fn render_header(&mut self, header: &[HeaderRow]);

    /// The row buffer changed. `total` is `None` until the first page arrives.
    fn render_rows(&mut self, rows: &[Record], total: Option<usize>);

    /// A page fetch failed. Loading stops until the next viewport change.
    fn report_error(&mut self, error: &Error);
}

/// A message sent by [`ChannelRenderer`].
#[derive(Debug, Clone, PartialEq)]
pub enum GridUpdate {
    Header(Vec<HeaderRow>),
    Rows {
        rows: Vec<Record>,
        total: Option<usize>,
    },
    Error(String),
}

/// A renderer that forwards updates over a channel.
///
/// Lets a UI running elsewhere consume grid updates as messages instead of
/// implementing [`GridRenderer`] itself.
#[derive(Debug, Clone)]
pub struct ChannelRenderer {
    tx: mpsc::UnboundedSender<GridUpdate>,
}

impl ChannelRenderer {
    /// Creates a renderer and the receiving end of its channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<GridUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, update: GridUpdate) {
        if self.tx.send(update).is_err() {
            log::debug!("Grid update dropped: receiver closed");
        }
    }
}

impl GridRenderer for ChannelRenderer {
    fn render_header(&mut self, header: &[HeaderRow]) {
        self.send(GridUpdate::Header(header.to_vec()));
    }

    fn render_rows(&mut self, rows: &[Record], total: Option<usize>) {
        self.send(GridUpdate::Rows {
            rows: rows.to_vec(),
            total,
        });
    }

    fn report_error(&mut self, error: &Error) {
        self.send(GridUpdate::Error(error.to_string()));
    }
}

type PendingFetch = BoxFuture<'static, (u64, Result<Page, Error>)>;

/// Builder for a [`Grid`].
pub struct GridBuilder {
    model: ColumnModel,
    fetcher: Arc<dyn PageFetcher>,
    config: GridConfig,
    store: Option<Arc<dyn VisibilityStore>>,
}

impl GridBuilder {
    /// Starts building a grid over `model`, fetching through `fetcher`.
    pub fn new(model: ColumnModel, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            model,
            fetcher,
            config: GridConfig::default(),
            store: None,
        }
    }

    /// Sets the configuration.
    pub fn config(mut self, config: GridConfig) -> Self {
        self.config = config;
        self
    }

    /// Persists column visibility in `store`.
    pub fn store(mut self, store: Arc<dyn VisibilityStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Builds the grid and renders its initial header. Nothing is fetched yet.
    pub fn build<R: GridRenderer>(self, mut renderer: R) -> Grid<R> {
        let config = self.config;
        let mut columns = ColumnVisibilityManager::new(self.model);

        let stored = self
            .store
            .as_ref()
            .and_then(|store| store.load(&config.visibility_key));
        match (stored, config.initial_columns) {
            (Some(ids), _) => {
                columns.set_visible_ids(ids);
            }
            (None, Some(n)) => {
                columns.restrict_to_initial(n);
            }
            (None, None) => {}
        }

        let query = QueryState::new(config.effective_page_size(), config.sort_keys)
            .with_pagination(config.pagination)
            .with_fields(requested_fields(&columns, config.fields));
        renderer.render_header(columns.header());

        Grid {
            cells: CellRenderer::new(config.link_prefix.as_str()),
            config,
            columns,
            source: PaginatedDataSource::new(query),
            scroll: ScrollLoadController::new(),
            fetcher: self.fetcher,
            store: self.store,
            renderer,
            pending: FuturesUnordered::new(),
            last_error: None,
        }
    }
}

/// A data grid: header layout, visibility, and scroll-driven loading.
///
/// # Example
///
/// ```ignore
/// let (renderer, mut updates) = ChannelRenderer::new();
/// let mut grid = GridBuilder::new(model, Arc::new(client))
///     .config(GridConfig::default().with_page_size(25))
///     .build(renderer);
///
/// grid.start();
/// loop {
///     tokio::select! {
///         Some(viewport) = viewports.recv() => { grid.on_viewport_change(viewport); }
///         Some(_) = grid.next_completion(), if grid.has_pending() => {}
///     }
/// }
/// ```
pub struct Grid<R: GridRenderer> {
    config: GridConfig,
    columns: ColumnVisibilityManager,
    source: PaginatedDataSource,
    scroll: ScrollLoadController,
    cells: CellRenderer,
    fetcher: Arc<dyn PageFetcher>,
    store: Option<Arc<dyn VisibilityStore>>,
    renderer: R,
    pending: FuturesUnordered<PendingFetch>,
    last_error: Option<String>,
}

impl<R: GridRenderer> Grid<R> {
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn columns(&self) -> &ColumnVisibilityManager {
        &self.columns
    }

    pub fn header(&self) -> &[HeaderRow] {
        self.columns.header()
    }

    pub fn rows(&self) -> &[Record] {
        self.source.rows()
    }

    pub fn state(&self) -> &DataSourceState {
        self.source.state()
    }

    pub fn query(&self) -> &QueryState {
        self.source.query()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Message of the most recent failed fetch, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Returns `true` while requests (current or stale) are still running.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Number of requests still running, stale ones included.
    pub fn pending_requests(&self) -> usize {
        self.pending.len()
    }

    /// Renders one cell of a loaded row.
    pub fn render_cell(&self, row: usize, column_id: &str) -> Option<Renderable> {
        let record = self.source.rows().get(row)?;
        let column = self.columns.model().get(column_id)?;
        Some(self.cells.render_cell(record, column))
    }

    // -------------------------------------------------------------------------
    // Row flow
    // -------------------------------------------------------------------------

    /// Fetches the first page if nothing is loaded or loading.
    pub fn start(&mut self) -> bool {
        if self.source.state().loaded() > 0 || self.source.state().total_count.is_some() {
            return false;
        }
        let request = self.source.fetch_page();
        self.dispatch(request)
    }

    /// Requests the next page directly. Dropped while a page is loading.
    pub fn fetch_page(&mut self) -> bool {
        let request = self.source.fetch_page();
        self.dispatch(request)
    }

    /// Handles a viewport report from the renderer. Returns `true` if a page
    /// fetch was issued.
    pub fn on_viewport_change(&mut self, viewport: Viewport) -> bool {
        let request = self.scroll.on_viewport_change(viewport, &mut self.source);
        self.dispatch(request)
    }

    /// Waits for the next request to finish and applies it.
    ///
    /// Returns `None` when no request is running.
    pub async fn next_completion(&mut self) -> Option<Completion> {
        let (generation, result) = self.pending.next().await?;
        let completion = self.source.complete(generation, result);

        match &completion {
            Completion::Appended { .. } => {
                self.last_error = None;
                let state = self.source.state();
                self.renderer.render_rows(&state.loaded_rows, state.total_count);
            }
            Completion::Failed(error) => {
                self.last_error = Some(error.to_string());
                self.renderer.report_error(error);
            }
            Completion::Stale { .. } => {}
        }
        Some(completion)
    }

    /// Waits for every running request, stale ones included.
    pub async fn settle(&mut self) -> Vec<Completion> {
        let mut completions = Vec::new();
        while let Some(completion) = self.next_completion().await {
            completions.push(completion);
        }
        completions
    }

    /// Resets the query with `update` and fetches its first page.
    pub fn reset_query(&mut self, update: QueryUpdate) -> bool {
        let request = self.source.reset_query(update);
        self.after_reset(request)
    }

    /// Sets or replaces a filter, resetting the query.
    pub fn set_filter(&mut self, filter: Filter) -> bool {
        self.reset_query(QueryUpdate::new().filter(filter))
    }

    /// Removes a filter, resetting the query.
    pub fn clear_filter(&mut self, field: &str, op: FilterOp) -> bool {
        self.reset_query(QueryUpdate::new().clear_filter(field, op))
    }

    /// Sorts by a column, resetting the query.
    ///
    /// Unknown and non-sortable columns are ignored.
    pub fn change_sort(&mut self, column_id: &str, direction: Direction) -> bool {
        match self.columns.model().get(column_id) {
            Some(column) if column.sortable => {}
            _ => {
                log::debug!("Ignoring sort on '{}': unknown or not sortable", column_id);
                return false;
            }
        }
        let request = self.source.change_sort(column_id, direction);
        self.after_reset(request)
    }

    /// Sorts by a column the way a header click does: ascending first, then
    /// flipping the direction on each further click.
    pub fn toggle_sort(&mut self, column_id: &str) -> bool {
        let direction = match &self.source.query().sort {
            Some(sort) if sort.column_id == column_id => sort.direction.toggled(),
            _ => Direction::Asc,
        };
        self.change_sort(column_id, direction)
    }

    fn after_reset(&mut self, request: Option<PageRequest>) -> bool {
        let state = self.source.state();
        self.renderer.render_rows(&state.loaded_rows, state.total_count);
        self.dispatch(request)
    }

    fn dispatch(&mut self, request: Option<PageRequest>) -> bool {
        let Some(request) = request else {
            return false;
        };
        let fetcher = Arc::clone(&self.fetcher);
        self.pending.push(Box::pin(async move {
            let result = fetcher.fetch_page(&request).await;
            (request.generation, result)
        }));
        true
    }

    // -------------------------------------------------------------------------
    // Column flow
    // -------------------------------------------------------------------------

    /// Shows columns. Returns `true` if visibility changed.
    pub fn show<S: AsRef<str>>(&mut self, ids: impl IntoIterator<Item = S>) -> bool {
        let changed = self.columns.show(ids);
        self.after_visibility_change(changed)
    }

    /// Hides columns; locked columns stay. Returns `true` if visibility changed.
    pub fn hide<S: AsRef<str>>(&mut self, ids: impl IntoIterator<Item = S>) -> bool {
        let changed = self.columns.hide(ids);
        self.after_visibility_change(changed)
    }

    pub fn show_all(&mut self) -> bool {
        let changed = self.columns.show_all();
        self.after_visibility_change(changed)
    }

    pub fn restrict_to_initial(&mut self, n: usize) -> bool {
        let changed = self.columns.restrict_to_initial(n);
        self.after_visibility_change(changed)
    }

    /// Visible column ids, for persistence.
    pub fn visible_ids(&self) -> Vec<String> {
        self.columns.visible_ids()
    }

    /// Restores persisted visibility.
    pub fn set_visible_ids<S: AsRef<str>>(&mut self, ids: impl IntoIterator<Item = S>) -> bool {
        let changed = self.columns.set_visible_ids(ids);
        self.after_visibility_change(changed)
    }

    /// Moves a column; the header is rebuilt from scratch.
    pub fn move_column(&mut self, id: &str, to: usize) -> bool {
        if !self.columns.move_column(id, to) {
            return false;
        }
        self.renderer.render_header(self.columns.header());
        true
    }

    fn after_visibility_change(&mut self, changed: bool) -> bool {
        if !changed {
            return false;
        }
        self.renderer.render_header(self.columns.header());
        if let Some(store) = &self.store {
            store.save(&self.config.visibility_key, self.columns.visible_fields());
        }
        if self.config.fields == FieldPolicy::VisibleOnly {
            let fields = requested_fields(&self.columns, self.config.fields);
            if let Some(request) = self.source.set_fields(fields) {
                self.after_reset(Some(request));
            }
        }
        true
    }
}

fn requested_fields(columns: &ColumnVisibilityManager, policy: FieldPolicy) -> Vec<String> {
    match policy {
        FieldPolicy::AllColumns => columns.all_fields(),
        FieldPolicy::VisibleOnly => columns.visible_fields().to_vec(),
    }
}
