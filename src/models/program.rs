use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// One page of the video-on-demand listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoPage {
    pub programs: Vec<Program>,
    /// Absent on the last page
    #[serde(default)]
    pub next_page: Option<String>,
}

impl VideoPage {
    pub fn is_last(&self) -> bool {
        self.next_page.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    pub id: String,
    #[serde(default)]
    #[allow(dead_code)]
    pub url: String,
    pub title: String,
    /// Milliseconds
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub sports: Option<Vec<VideoSport>>,
    #[serde(default)]
    pub schools: Option<Vec<VideoSchool>>,
    #[serde(default)]
    pub email_image: String,
}

// Programs are identified by their id alone.
impl PartialEq for Program {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Program {}

impl Hash for Program {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoSport {
    pub id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoSchool {
    pub id: i64,
    #[serde(default)]
    pub home_team: bool,
}
