//! Program catalog: pagination, reference lookups and published view state
//!
//! `Catalog` is the only place that mutates pager and reference state. Fetches
//! run on spawned tasks and report back as `CatalogEvent` messages; nothing is
//! written until the owner drains them with `poll_events` or `next_event`.
//! Every applied event publishes exactly one `ViewSnapshot`.

mod format;
mod pager;
mod reference;
mod snapshot;

use std::future::Future;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, watch};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{School, Sport, VideoPage};
use crate::services::{Resource, VodService};

use pager::PageRequest;
use reference::ReferenceStore;

pub use pager::Pager;
pub use snapshot::{CardRow, ViewSnapshot};

const ERROR_CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy)]
pub struct CatalogOptions {
    pub page_size: u32,
    pub row_sentinel: usize,
    pub reset_on_empty_page: bool,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for CatalogOptions {
    fn from(config: &Config) -> Self {
        Self {
            page_size: config.page_size,
            row_sentinel: config.row_sentinel,
            reset_on_empty_page: config.reset_on_empty_page,
        }
    }
}

/// A failed fetch, as reported to subscribers
#[derive(Debug, Clone)]
pub struct FetchFailure {
    pub resource: Resource,
    pub message: String,
}

enum CatalogEvent {
    Page {
        generation: u64,
        request: PageRequest,
        result: Result<Option<VideoPage>>,
    },
    Sports {
        generation: u64,
        result: Result<Option<Vec<Sport>>>,
    },
    Schools {
        generation: u64,
        result: Result<Option<Vec<School>>>,
    },
    /// The fetch task ended without producing a result
    Aborted {
        generation: u64,
        resource: Resource,
        reason: String,
    },
}

impl CatalogEvent {
    fn generation(&self) -> u64 {
        match self {
            CatalogEvent::Page { generation, .. }
            | CatalogEvent::Sports { generation, .. }
            | CatalogEvent::Schools { generation, .. }
            | CatalogEvent::Aborted { generation, .. } => *generation,
        }
    }
}

pub struct Catalog<S> {
    service: Arc<S>,
    pager: Pager,
    references: ReferenceStore,
    // Bumped on reload so completions from the previous session are dropped
    generation: u64,
    pending: usize,
    version: u64,
    events_tx: mpsc::UnboundedSender<CatalogEvent>,
    events_rx: mpsc::UnboundedReceiver<CatalogEvent>,
    snapshot_tx: watch::Sender<Arc<ViewSnapshot>>,
    errors_tx: broadcast::Sender<FetchFailure>,
}

impl<S: VodService> Catalog<S> {
    pub fn new(service: Arc<S>, options: CatalogOptions) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, _) = watch::channel(Arc::new(ViewSnapshot::empty()));
        let (errors_tx, _) = broadcast::channel(ERROR_CHANNEL_CAPACITY);

        Self {
            service,
            pager: Pager::new(
                options.page_size,
                options.row_sentinel,
                options.reset_on_empty_page,
            ),
            references: ReferenceStore::new(),
            generation: 0,
            pending: 0,
            version: 0,
            events_tx,
            events_rx,
            snapshot_tx,
            errors_tx,
        }
    }

    /// Load both reference tables and the first page
    pub fn start(&mut self) {
        self.load_schools();
        self.load_sports();
        self.request_next_page();
    }

    /// Drop everything and start a fresh session
    pub fn reload(&mut self) {
        self.generation += 1;
        self.pager.reset();
        tracing::debug!("Reloading catalog (generation {})", self.generation);
        self.publish();
        self.start();
    }

    /// Issue a request for the next page. Returns false if the request was dropped.
    pub fn request_next_page(&mut self) -> bool {
        let Some(request) = self.pager.begin_fetch() else {
            tracing::debug!("Page request dropped ({:?})", self.pager.phase());
            return false;
        };

        tracing::debug!("Requesting page {} (size {})", request.page, request.page_size);

        let service = Arc::clone(&self.service);
        let generation = self.generation;
        self.spawn(Resource::Vod, async move {
            let result = service.fetch_page(request.page, request.page_size).await;
            CatalogEvent::Page {
                generation,
                request,
                result,
            }
        });
        true
    }

    pub fn load_sports(&mut self) {
        let service = Arc::clone(&self.service);
        let generation = self.generation;
        self.spawn(Resource::Sports, async move {
            let result = service.fetch_sports().await;
            CatalogEvent::Sports { generation, result }
        });
    }

    pub fn load_schools(&mut self) {
        let service = Arc::clone(&self.service);
        let generation = self.generation;
        self.spawn(Resource::Schools, async move {
            let result = service.fetch_schools().await;
            CatalogEvent::Schools { generation, result }
        });
    }

    /// The row at `index` is about to be shown; fetch more if it is not loaded yet
    pub fn row_will_display(&mut self, index: usize) -> bool {
        if self.pager.should_fetch_more(index) {
            self.request_next_page()
        } else {
            false
        }
    }

    pub fn should_fetch_more(&self, index: usize) -> bool {
        self.pager.should_fetch_more(index)
    }

    /// Apply every completion that has already arrived (non-blocking)
    pub fn poll_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// Wait for the next completion and apply it. Returns false when nothing is in flight.
    pub async fn next_event(&mut self) -> bool {
        if self.pending == 0 {
            return false;
        }
        match self.events_rx.recv().await {
            Some(event) => {
                self.apply(event);
                true
            }
            None => false,
        }
    }

    /// Apply completions until no fetch is in flight
    pub async fn settle(&mut self) {
        while self.next_event().await {}
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<ViewSnapshot>> {
        self.snapshot_tx.subscribe()
    }

    pub fn subscribe_errors(&self) -> broadcast::Receiver<FetchFailure> {
        self.errors_tx.subscribe()
    }

    pub fn snapshot(&self) -> Arc<ViewSnapshot> {
        Arc::clone(&self.snapshot_tx.borrow())
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn is_fetching(&self) -> bool {
        self.pager.is_fetching()
    }

    pub fn is_exhausted(&self) -> bool {
        self.pager.is_exhausted()
    }

    /// Run a fetch on its own task. A panicking task still yields an event so
    /// `pending` always drains.
    fn spawn<F>(&mut self, resource: Resource, task: F)
    where
        F: Future<Output = CatalogEvent> + Send + 'static,
    {
        self.pending += 1;
        let tx = self.events_tx.clone();
        let generation = self.generation;
        let handle = tokio::spawn(task);
        tokio::spawn(async move {
            let event = match handle.await {
                Ok(event) => event,
                Err(e) => CatalogEvent::Aborted {
                    generation,
                    resource,
                    reason: e.to_string(),
                },
            };
            let _ = tx.send(event);
        });
    }

    fn apply(&mut self, event: CatalogEvent) {
        self.pending = self.pending.saturating_sub(1);

        if event.generation() != self.generation {
            tracing::debug!(
                "Ignoring completion from generation {} (current {})",
                event.generation(),
                self.generation
            );
            return;
        }

        match event {
            CatalogEvent::Page { request, result, .. } => match result {
                Ok(Some(page)) => {
                    tracing::debug!(
                        "Merged page {}: {} programs, last page: {}",
                        request.page,
                        page.programs.len(),
                        page.is_last()
                    );
                    self.pager.finish_page(page);
                }
                Ok(None) => {
                    tracing::warn!("Page {} returned no payload", request.page);
                    self.pager.finish_empty();
                }
                Err(e) => {
                    self.pager.finish_failed();
                    self.report(Resource::Vod, &e);
                }
            },
            CatalogEvent::Sports { result, .. } => match result {
                Ok(Some(sports)) => {
                    tracing::debug!("Loaded {} sports", sports.len());
                    self.references.sports.replace(sports);
                }
                Ok(None) => self.references.sports.clear(),
                Err(e) => {
                    self.references.sports.clear();
                    self.report(Resource::Sports, &e);
                }
            },
            CatalogEvent::Schools { result, .. } => match result {
                Ok(Some(schools)) => {
                    tracing::debug!("Loaded {} schools", schools.len());
                    self.references.schools.replace(schools);
                }
                Ok(None) => self.references.schools.clear(),
                Err(e) => {
                    self.references.schools.clear();
                    self.report(Resource::Schools, &e);
                }
            },
            CatalogEvent::Aborted {
                resource, reason, ..
            } => {
                match resource {
                    Resource::Vod => self.pager.finish_failed(),
                    Resource::Sports => self.references.sports.clear(),
                    Resource::Schools => self.references.schools.clear(),
                }
                let error = AppError::from(anyhow::anyhow!("fetch task aborted: {}", reason));
                self.report(resource, &error);
            }
        }

        self.publish();
    }

    fn report(&self, resource: Resource, error: &AppError) {
        let message = format!("Unable to fetch {}: {}", resource.label(), error);
        tracing::error!("{}", message);
        // No subscribers is fine
        let _ = self.errors_tx.send(FetchFailure { resource, message });
    }

    fn publish(&mut self) {
        self.version += 1;
        let snapshot = ViewSnapshot::build(self.version, &self.pager, &self.references);
        self.snapshot_tx.send_replace(Arc::new(snapshot));
    }
}
