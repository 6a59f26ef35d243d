//! Network collaborator used by the catalog
//!
//! The catalog only sees the [`VodService`] trait; `HttpVodService` is the
//! production implementation and tests substitute a scripted double.

mod http;
#[cfg(test)]
pub mod scripted;

use std::future::Future;

use crate::error::Result;
use crate::models::{School, Sport, VideoPage};

pub use http::HttpVodService;

/// Remote resources exposed by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Vod,
    Sports,
    Schools,
}

impl Resource {
    /// Path relative to the API base URL
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Vod => "vod",
            Resource::Sports => "sports",
            Resource::Schools => "schools",
        }
    }

    /// Human label used in error messages and logs
    pub fn label(&self) -> &'static str {
        match self {
            Resource::Vod => "videos",
            Resource::Sports => "sports",
            Resource::Schools => "schools",
        }
    }
}

/// Source of program pages and reference tables
///
/// `Ok(None)` means the request succeeded but carried no payload. That is
/// distinct from an error and the catalog treats it differently.
pub trait VodService: Send + Sync + 'static {
    fn fetch_page(
        &self,
        page: u32,
        page_size: u32,
    ) -> impl Future<Output = Result<Option<VideoPage>>> + Send;

    fn fetch_sports(&self) -> impl Future<Output = Result<Option<Vec<Sport>>>> + Send;

    fn fetch_schools(&self) -> impl Future<Output = Result<Option<Vec<School>>>> + Send;
}
