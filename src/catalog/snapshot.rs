use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::format::format_duration;
use super::pager::Pager;
use super::reference::ReferenceStore;
use crate::models::Program;

/// One renderable card
#[derive(Debug, Clone)]
pub struct CardRow {
    pub program: Arc<Program>,
    pub sport_names: String,
    pub school_names: String,
    pub duration: String,
    pub image_url: String,
}

/// Immutable view of the catalog published after each mutation
#[derive(Debug, Clone)]
pub struct ViewSnapshot {
    /// Increments by one on every publish
    pub version: u64,
    pub rows: Vec<CardRow>,
    pub displayable_rows: usize,
    pub exhausted: bool,
    pub sports_count: usize,
    pub schools_count: usize,
    pub updated_at: DateTime<Utc>,
}

impl ViewSnapshot {
    pub fn empty() -> Self {
        Self {
            version: 0,
            rows: Vec::new(),
            displayable_rows: 0,
            exhausted: false,
            sports_count: 0,
            schools_count: 0,
            updated_at: Utc::now(),
        }
    }

    pub fn build(version: u64, pager: &Pager, references: &ReferenceStore) -> Self {
        let rows = pager
            .programs()
            .iter()
            .map(|program| CardRow {
                sport_names: references.resolve_sport_names(program.sports.as_deref()),
                school_names: references.resolve_school_names(program.schools.as_deref()),
                duration: format_duration(program.duration),
                image_url: program.email_image.clone(),
                program: Arc::clone(program),
            })
            .collect();

        Self {
            version,
            rows,
            displayable_rows: pager.displayable_rows(),
            exhausted: pager.is_exhausted(),
            sports_count: references.sports.len(),
            schools_count: references.schools.len(),
            updated_at: Utc::now(),
        }
    }
}
