//! Scroll-driven page loading.

use crate::api::query::PageRequest;
use crate::source::DataSourceState;
use crate::source::PaginatedDataSource;

/// The rows a renderer currently shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    /// Index of the first visible row.
    pub first_visible: usize,
    /// Index of the last visible row; `None` when no row is shown.
    pub last_visible: Option<usize>,
}

impl Viewport {
    /// A viewport showing rows `first..=last`.
    pub fn new(first: usize, last: usize) -> Self {
        Self {
            first_visible: first.min(last),
            last_visible: Some(last),
        }
    }

    /// A viewport showing no rows at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A viewport scrolled so the last of `loaded` rows is visible.
    pub fn bottom(loaded: usize, height: usize) -> Self {
        match loaded.checked_sub(1) {
            Some(last) => Self::new(last.saturating_sub(height.saturating_sub(1)), last),
            None => Self::empty(),
        }
    }

    /// Number of rows up to and including the last visible one.
    pub fn rows_through(&self) -> usize {
        self.last_visible.map_or(0, |last| last + 1)
    }
}

/// Decides when scrolling should load the next page.
///
/// The controller keeps no state of its own. Every viewport change is checked
/// against the data source; repeated events while a page is loading are
/// absorbed by the data source's in-flight guard.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollLoadController;

impl ScrollLoadController {
    pub fn new() -> Self {
        Self
    }

    /// Returns `true` if the last loaded row is the last visible one and the
    /// query may have more rows.
    pub fn should_load(&self, viewport: Viewport, state: &DataSourceState) -> bool {
        let loaded = state.loaded();
        viewport.rows_through() == loaded && state.total_count.is_none_or(|total| loaded < total)
    }

    /// Handles a viewport change, fetching the next page when due.
    pub fn on_viewport_change(
        &self,
        viewport: Viewport,
        source: &mut PaginatedDataSource,
    ) -> Option<PageRequest> {
        if self.should_load(viewport, source.state()) {
            source.fetch_page()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::query::Page;
    use crate::api::query::QueryState;
    use crate::config::SortKeyStyle;
    use crate::model::Record;

    fn loaded_source(loaded: usize, total: usize) -> PaginatedDataSource {
        let mut source = PaginatedDataSource::new(QueryState::new(loaded.max(1), SortKeyStyle::default()));
        let request = source.fetch_page().unwrap();
        let rows = (0..loaded).map(|i| Record::new().set("id", i)).collect();
        source.complete(request.generation, Ok(Page::new(rows).with_total_count(total)));
        source
    }

    #[test]
    fn test_empty_grid_loads() {
        let mut source = PaginatedDataSource::new(QueryState::new(10, SortKeyStyle::default()));
        let controller = ScrollLoadController::new();
        assert!(controller.on_viewport_change(Viewport::empty(), &mut source).is_some());
    }

    #[test]
    fn test_loads_only_at_last_row() {
        let mut source = loaded_source(10, 30);
        let controller = ScrollLoadController::new();
        assert!(controller.on_viewport_change(Viewport::new(0, 5), &mut source).is_none());
        assert!(controller.on_viewport_change(Viewport::new(3, 8), &mut source).is_none());
        assert!(controller.on_viewport_change(Viewport::new(4, 9), &mut source).is_some());
    }

    #[test]
    fn test_never_loads_when_exhausted() {
        let mut source = loaded_source(10, 10);
        let controller = ScrollLoadController::new();
        for _ in 0..3 {
            assert!(controller.on_viewport_change(Viewport::bottom(10, 5), &mut source).is_none());
        }
        assert!(!source.state().in_flight());
    }

    #[test]
    fn test_repeated_events_issue_one_request() {
        let mut source = loaded_source(10, 30);
        let controller = ScrollLoadController::new();
        let issued = (0..5)
            .filter_map(|_| controller.on_viewport_change(Viewport::bottom(10, 5), &mut source))
            .count();
        assert_eq!(issued, 1);
    }

    #[test]
    fn test_bottom_viewport() {
        assert_eq!(Viewport::bottom(0, 5), Viewport::empty());
        assert_eq!(Viewport::bottom(3, 5), Viewport::new(0, 2));
        assert_eq!(Viewport::bottom(20, 5), Viewport::new(15, 19));
    }
}
