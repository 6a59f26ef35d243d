use std::sync::Arc;

use tokio::sync::broadcast::error::TryRecvError;
use tokio::sync::{broadcast, watch};

use crate::catalog::{CardRow, Catalog, FetchFailure, ViewSnapshot};
use crate::config::Config;
use crate::services::VodService;
use crate::tui::AppAction;

const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

pub struct App<S> {
    // Data
    pub catalog: Catalog<S>,
    pub snapshot: Arc<ViewSnapshot>,
    snapshots: watch::Receiver<Arc<ViewSnapshot>>,
    errors: broadcast::Receiver<FetchFailure>,

    // UI State
    pub selected_index: usize,
    pub show_help: bool,
    pub show_row_numbers: bool,
    pub status_message: Option<String>,
    prefetch_distance: usize,
    spinner_frame: usize,
}

impl<S: VodService> App<S> {
    pub fn new(catalog: Catalog<S>, config: &Config) -> Self {
        let mut snapshots = catalog.subscribe();
        let snapshot = Arc::clone(&snapshots.borrow_and_update());
        let errors = catalog.subscribe_errors();

        Self {
            catalog,
            snapshot,
            snapshots,
            errors,
            selected_index: 0,
            show_help: false,
            show_row_numbers: config.show_row_numbers,
            status_message: None,
            prefetch_distance: config.prefetch_distance,
            spinner_frame: 0,
        }
    }

    pub fn start(&mut self) {
        self.catalog.start();
    }

    /// Apply finished fetches and pick up the latest snapshot and errors
    pub fn tick(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
        self.catalog.poll_events();
        self.sync();
    }

    fn sync(&mut self) {
        if self.snapshots.has_changed().unwrap_or(false) {
            self.snapshot = Arc::clone(&self.snapshots.borrow_and_update());
            let len = self.list_len();
            if len > 0 && self.selected_index >= len {
                self.selected_index = len - 1;
            }
        }

        loop {
            match self.errors.try_recv() {
                Ok(failure) => {
                    tracing::debug!("Showing {} failure", failure.resource.label());
                    self.status_message = Some(failure.message);
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!("Dropped {} error notifications", skipped);
                }
                Err(_) => break,
            }
        }
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame]
    }

    /// Loaded cards plus one trailing placeholder while more pages may exist
    pub fn list_len(&self) -> usize {
        let loaded = self.snapshot.rows.len();
        if loaded == 0 {
            return usize::from(!self.catalog.is_exhausted());
        }
        self.snapshot.displayable_rows.min(loaded + 1)
    }

    pub fn is_placeholder(&self, index: usize) -> bool {
        index >= self.snapshot.rows.len()
    }

    pub fn selected_row(&self) -> Option<&CardRow> {
        self.snapshot.rows.get(self.selected_index)
    }

    pub fn handle_action(&mut self, action: AppAction) -> bool {
        match action {
            AppAction::Quit => return true,

            AppAction::MoveUp => {
                if self.selected_index > 0 {
                    self.select(self.selected_index - 1);
                }
            }

            AppAction::MoveDown => {
                self.select(self.selected_index + 1);
            }

            AppAction::MoveToTop => {
                self.select(0);
            }

            AppAction::MoveToBottom => {
                self.select(self.list_len().saturating_sub(1));
            }

            AppAction::Reload => {
                self.selected_index = 0;
                self.status_message = None;
                self.catalog.reload();
                self.sync();
            }

            AppAction::OpenImage => {
                if let Some(row) = self.selected_row() {
                    let url = row.image_url.clone();
                    if let Err(e) = open::that(&url) {
                        tracing::warn!("Failed to open {}: {}", url, e);
                        self.status_message = Some(format!("Unable to open image: {}", e));
                    }
                }
            }

            AppAction::ToggleRowNumbers => {
                self.show_row_numbers = !self.show_row_numbers;
            }

            AppAction::ShowHelp => {
                self.show_help = true;
            }

            AppAction::HideHelp => {
                self.show_help = false;
            }
        }

        false
    }

    fn select(&mut self, index: usize) {
        let len = self.list_len();
        if len == 0 {
            self.selected_index = 0;
            return;
        }
        self.selected_index = index.min(len - 1);
        self.catalog
            .row_will_display(self.selected_index + self.prefetch_distance);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogOptions;
    use crate::services::scripted::{page, ScriptedService};

    fn app(service: &Arc<ScriptedService>) -> App<ScriptedService> {
        let catalog = Catalog::new(Arc::clone(service), CatalogOptions::default());
        App::new(catalog, &Config::default())
    }

    async fn settle(app: &mut App<ScriptedService>) {
        app.catalog.settle().await;
        app.sync();
    }

    #[tokio::test]
    async fn moving_near_the_end_fetches_the_next_page() {
        let service = Arc::new(ScriptedService::new());
        service.push_page(Ok(Some(page("a", 3, Some("A")))));
        service.push_page(Ok(Some(page("b", 2, None))));
        let mut app = app(&service);

        app.catalog.request_next_page();
        settle(&mut app).await;
        assert_eq!(app.list_len(), 4);
        assert!(app.is_placeholder(3));

        app.handle_action(AppAction::MoveDown);
        assert_eq!(service.page_requests().len(), 1);
        app.handle_action(AppAction::MoveDown);
        settle(&mut app).await;

        assert_eq!(service.page_requests(), vec![(0, 10), (1, 10)]);
        assert_eq!(app.list_len(), 5);
        assert!(!app.is_placeholder(4));
    }

    #[tokio::test]
    async fn selection_is_clamped_to_the_list() {
        let service = Arc::new(ScriptedService::new());
        service.push_page(Ok(Some(page("a", 2, None))));
        let mut app = app(&service);

        app.catalog.request_next_page();
        settle(&mut app).await;
        app.handle_action(AppAction::MoveToBottom);
        app.handle_action(AppAction::MoveDown);

        assert_eq!(app.selected_index, 1);
        assert_eq!(app.selected_row().unwrap().program.id, "a-1");
    }

    #[tokio::test]
    async fn fetch_errors_land_in_the_status_line() {
        let service = Arc::new(ScriptedService::new());
        let mut app = app(&service);

        app.catalog.request_next_page();
        settle(&mut app).await;

        let status = app.status_message.as_deref().unwrap();
        assert!(status.starts_with("Unable to fetch videos:"));
    }

    #[test]
    fn help_and_quit() {
        let service = Arc::new(ScriptedService::new());
        let mut app = app(&service);

        assert!(!app.handle_action(AppAction::ShowHelp));
        assert!(app.show_help);
        app.handle_action(AppAction::HideHelp);
        assert!(!app.show_help);
        app.handle_action(AppAction::ToggleRowNumbers);
        assert!(app.show_row_numbers);
        assert!(app.handle_action(AppAction::Quit));
    }
}
