//! Scripted in-memory `VodService` for tests

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{http, Resource, VodService};
use crate::error::Result;
use crate::models::{Program, School, Sport, VideoPage, VideoSchool, VideoSport};

#[derive(Default)]
pub struct ScriptedService {
    pages: Mutex<VecDeque<Result<Option<VideoPage>>>>,
    sports: Mutex<VecDeque<Result<Option<Vec<Sport>>>>>,
    schools: Mutex<VecDeque<Result<Option<Vec<School>>>>>,
    page_requests: Mutex<Vec<(u32, u32)>>,
    panicking_pages: AtomicUsize,
    sports_calls: AtomicUsize,
    schools_calls: AtomicUsize,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_page(&self, response: Result<Option<VideoPage>>) {
        self.pages.lock().unwrap().push_back(response);
    }

    /// Queue a raw response body, decoded the way the HTTP service decodes it
    pub fn push_page_body(&self, body: &[u8]) {
        self.push_page(http::decode_payload(Resource::Vod, body));
    }

    /// The next page request panics instead of answering
    pub fn panic_on_next_page(&self) {
        self.panicking_pages.fetch_add(1, Ordering::SeqCst);
    }

    pub fn push_sports(&self, response: Result<Option<Vec<Sport>>>) {
        self.sports.lock().unwrap().push_back(response);
    }

    pub fn push_schools(&self, response: Result<Option<Vec<School>>>) {
        self.schools.lock().unwrap().push_back(response);
    }

    /// (page, page_size) of every page request received, in order
    pub fn page_requests(&self) -> Vec<(u32, u32)> {
        self.page_requests.lock().unwrap().clone()
    }

    pub fn sports_calls(&self) -> usize {
        self.sports_calls.load(Ordering::SeqCst)
    }

    pub fn schools_calls(&self) -> usize {
        self.schools_calls.load(Ordering::SeqCst)
    }
}

fn unscripted<T>(what: &str) -> Result<T> {
    Err(anyhow::anyhow!("no scripted response for {}", what).into())
}

impl VodService for ScriptedService {
    async fn fetch_page(&self, page: u32, page_size: u32) -> Result<Option<VideoPage>> {
        self.page_requests.lock().unwrap().push((page, page_size));
        if self
            .panicking_pages
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            panic!("scripted page {} panicked", page);
        }
        let next = self.pages.lock().unwrap().pop_front();
        next.unwrap_or_else(|| unscripted("page"))
    }

    async fn fetch_sports(&self) -> Result<Option<Vec<Sport>>> {
        self.sports_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.sports.lock().unwrap().pop_front();
        next.unwrap_or_else(|| unscripted("sports"))
    }

    async fn fetch_schools(&self) -> Result<Option<Vec<School>>> {
        self.schools_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.schools.lock().unwrap().pop_front();
        next.unwrap_or_else(|| unscripted("schools"))
    }
}

pub fn program(id: &str, sports: &[i64], schools: &[i64]) -> Program {
    Program {
        id: id.to_string(),
        url: format!("https://example.com/vod/{id}"),
        title: format!("Program {id}"),
        duration: 90_000,
        sports: Some(sports.iter().map(|&id| VideoSport { id }).collect()),
        schools: Some(
            schools
                .iter()
                .map(|&id| VideoSchool { id, home_team: false })
                .collect(),
        ),
        email_image: format!("https://example.com/img/{id}.jpg"),
    }
}

/// A page of `count` programs with ids `{prefix}-0..count`
pub fn page(prefix: &str, count: usize, next_page: Option<&str>) -> VideoPage {
    VideoPage {
        programs: (0..count)
            .map(|i| program(&format!("{prefix}-{i}"), &[1], &[3]))
            .collect(),
        next_page: next_page.map(str::to_string),
    }
}

pub fn sport(id: i64, name: &str) -> Sport {
    Sport {
        id,
        name: name.to_string(),
        abbr: String::new(),
        short_name: String::new(),
        menu_label: String::new(),
        weight: 0,
        featured: false,
        in_season: false,
        is_visible: true,
        url: String::new(),
        icon: None,
    }
}

pub fn school(id: i64, name: &str) -> School {
    School {
        id,
        name: name.to_string(),
        abbr: String::new(),
        mascot: String::new(),
        url: String::new(),
        pac12: true,
        images: None,
    }
}
