use std::sync::Arc;

use crate::models::{Program, VideoPage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    #[default]
    Idle,
    Fetching,
    /// The server sent a page without a next-page token
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

/// Incremental pagination state for the program list
///
/// Programs are appended in arrival order with no de-duplication by id, so
/// overlapping pages from the server show up twice.
#[derive(Debug)]
pub struct Pager {
    programs: Vec<Arc<Program>>,
    phase: FetchPhase,
    current_page: u32,
    downloaded: usize,
    row_bound: usize,
    page_size: u32,
    row_sentinel: usize,
    reset_on_empty: bool,
}

impl Pager {
    pub fn new(page_size: u32, row_sentinel: usize, reset_on_empty: bool) -> Self {
        Self {
            programs: Vec::new(),
            phase: FetchPhase::Idle,
            current_page: 0,
            downloaded: 0,
            row_bound: row_sentinel,
            page_size,
            row_sentinel,
            reset_on_empty,
        }
    }

    /// Claim the next page. `None` while a request is in flight or after exhaustion.
    pub fn begin_fetch(&mut self) -> Option<PageRequest> {
        if self.phase != FetchPhase::Idle {
            return None;
        }
        self.phase = FetchPhase::Fetching;
        Some(PageRequest {
            page: self.current_page,
            page_size: self.page_size,
        })
    }

    /// Merge a successfully decoded page
    pub fn finish_page(&mut self, page: VideoPage) {
        let exhausted = page.is_last();
        let count = page.programs.len();

        self.programs
            .extend(page.programs.into_iter().map(Arc::new));
        self.current_page += 1;
        self.downloaded += count;
        self.row_bound = self.row_bound.max(self.downloaded);

        if exhausted {
            self.row_bound = self.downloaded;
            self.phase = FetchPhase::Exhausted;
        } else {
            self.phase = FetchPhase::Idle;
        }
    }

    /// The request succeeded but carried no payload. With reset enabled the
    /// list, download count and row bound start over; the page counter does not.
    pub fn finish_empty(&mut self) {
        if self.reset_on_empty {
            self.programs.clear();
            self.downloaded = 0;
            self.row_bound = self.row_sentinel;
        }
        self.phase = FetchPhase::Idle;
    }

    pub fn finish_failed(&mut self) {
        self.phase = FetchPhase::Idle;
    }

    /// True when `row` is past the loaded programs and more pages may exist
    pub fn should_fetch_more(&self, row: usize) -> bool {
        row >= self.programs.len() && self.phase != FetchPhase::Exhausted
    }

    /// Rows the list may show: the sentinel until the last page, then the exact count
    pub fn displayable_rows(&self) -> usize {
        if self.programs.is_empty() {
            0
        } else {
            self.row_bound
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.page_size, self.row_sentinel, self.reset_on_empty);
    }

    pub fn programs(&self) -> &[Arc<Program>] {
        &self.programs
    }

    pub fn phase(&self) -> FetchPhase {
        self.phase
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn downloaded(&self) -> usize {
        self.downloaded
    }

    pub fn is_fetching(&self) -> bool {
        self.phase == FetchPhase::Fetching
    }

    pub fn is_exhausted(&self) -> bool {
        self.phase == FetchPhase::Exhausted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::scripted::page;

    fn pager() -> Pager {
        Pager::new(10, 100_000, true)
    }

    #[test]
    fn fetch_is_claimed_once() {
        let mut pager = pager();

        assert_eq!(
            pager.begin_fetch(),
            Some(PageRequest { page: 0, page_size: 10 })
        );
        assert_eq!(pager.begin_fetch(), None);
        assert!(pager.is_fetching());
    }

    #[test]
    fn three_pages_converge_to_exact_count() {
        let mut pager = pager();

        for (prefix, count, token) in [("a", 10, Some("A")), ("b", 10, Some("B")), ("c", 7, None)] {
            let request = pager.begin_fetch().unwrap();
            assert_eq!(request.page, pager.current_page());
            assert_eq!(pager.displayable_rows() > 0, !pager.programs().is_empty());
            pager.finish_page(page(prefix, count, token));
        }

        assert_eq!(pager.programs().len(), 27);
        assert_eq!(pager.downloaded(), 27);
        assert_eq!(pager.current_page(), 3);
        assert_eq!(pager.displayable_rows(), 27);
        assert!(!pager.should_fetch_more(27));
        assert!(pager.is_exhausted());
        assert_eq!(pager.begin_fetch(), None);
    }

    #[test]
    fn sentinel_is_advertised_until_exhaustion() {
        let mut pager = pager();
        assert_eq!(pager.displayable_rows(), 0);

        pager.begin_fetch();
        pager.finish_page(page("a", 10, Some("A")));

        assert_eq!(pager.displayable_rows(), 100_000);
        assert!(pager.should_fetch_more(10));
        assert!(!pager.should_fetch_more(9));
    }

    #[test]
    fn empty_payload_discards_accumulated_programs() {
        let mut pager = pager();
        pager.begin_fetch();
        pager.finish_page(page("a", 10, Some("A")));
        pager.begin_fetch();
        pager.finish_page(page("b", 5, Some("B")));
        assert_eq!(pager.programs().len(), 15);

        pager.begin_fetch();
        pager.finish_empty();

        assert!(pager.programs().is_empty());
        assert_eq!(pager.displayable_rows(), 0);
        assert_eq!(pager.current_page(), 2);
        assert_eq!(pager.downloaded(), 0);
        assert_eq!(pager.phase(), FetchPhase::Idle);
    }

    #[test]
    fn paging_after_reset_converges_to_new_list() {
        let mut pager = pager();
        pager.begin_fetch();
        pager.finish_page(page("a", 10, Some("A")));
        pager.begin_fetch();
        pager.finish_page(page("b", 5, Some("B")));
        pager.begin_fetch();
        pager.finish_empty();

        assert!(pager.begin_fetch().is_some());
        pager.finish_page(page("c", 7, None));

        assert_eq!(pager.programs().len(), 7);
        assert_eq!(pager.downloaded(), 7);
        assert_eq!(pager.displayable_rows(), 7);
        assert_eq!(pager.current_page(), 3);
        assert!(pager.is_exhausted());
        assert!(!pager.should_fetch_more(7));
    }

    #[test]
    fn empty_payload_is_ignored_when_reset_disabled() {
        let mut pager = Pager::new(10, 100_000, false);
        pager.begin_fetch();
        pager.finish_page(page("a", 10, Some("A")));

        pager.begin_fetch();
        pager.finish_empty();

        assert_eq!(pager.programs().len(), 10);
        assert!(!pager.is_fetching());
    }

    #[test]
    fn failure_keeps_state_and_allows_retry() {
        let mut pager = pager();
        pager.begin_fetch();
        pager.finish_page(page("a", 10, Some("A")));

        pager.begin_fetch();
        pager.finish_failed();

        assert_eq!(pager.programs().len(), 10);
        assert_eq!(pager.current_page(), 1);
        assert_eq!(pager.begin_fetch().map(|r| r.page), Some(1));
    }

    #[test]
    fn duplicates_across_pages_are_kept() {
        let mut pager = pager();
        pager.begin_fetch();
        pager.finish_page(page("a", 3, Some("A")));
        pager.begin_fetch();
        pager.finish_page(page("a", 3, None));

        assert_eq!(pager.programs().len(), 6);
        assert_eq!(pager.programs()[0], pager.programs()[3]);
    }

    #[test]
    fn bound_never_drops_below_downloaded() {
        let mut pager = Pager::new(10, 15, true);
        pager.begin_fetch();
        pager.finish_page(page("a", 10, Some("A")));
        pager.begin_fetch();
        pager.finish_page(page("b", 10, Some("B")));

        assert_eq!(pager.displayable_rows(), 20);
    }

    #[test]
    fn reset_starts_over() {
        let mut pager = pager();
        pager.begin_fetch();
        pager.finish_page(page("a", 4, None));

        pager.reset();

        assert_eq!(pager.current_page(), 0);
        assert_eq!(pager.downloaded(), 0);
        assert_eq!(pager.phase(), FetchPhase::Idle);
        assert_eq!(pager.begin_fetch().map(|r| r.page), Some(0));
    }
}
