use std::collections::HashMap;

use crate::models::{ReferenceEntry, School, Sport, VideoSchool, VideoSport};

const NO_SPORTS: &str = "<no sports>";
const NO_SCHOOLS: &str = "<no schools>";

/// A lookup table that is only ever replaced as a whole
#[derive(Debug)]
pub struct ReferenceTable<T> {
    entries: Vec<T>,
    index: HashMap<i64, usize>,
}

impl<T> Default for ReferenceTable<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: ReferenceEntry> ReferenceTable<T> {
    pub fn replace(&mut self, entries: Vec<T>) {
        let mut index = HashMap::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            // First entry wins when the server repeats an id
            index.entry(entry.id()).or_insert(position);
        }
        self.entries = entries;
        self.index = index;
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    pub fn name_for(&self, id: i64) -> Option<&str> {
        self.index.get(&id).map(|&i| self.entries[i].name())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Join display names for `ids` with ", ", falling back to `<id>` for unknown ids
    fn resolve(&self, ids: impl Iterator<Item = i64>) -> String {
        ids.map(|id| match self.name_for(id) {
            Some(name) => name.to_string(),
            None => format!("<{id}>"),
        })
        .collect::<Vec<_>>()
        .join(", ")
    }
}

#[derive(Debug, Default)]
pub struct ReferenceStore {
    pub sports: ReferenceTable<Sport>,
    pub schools: ReferenceTable<School>,
}

impl ReferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve_sport_names(&self, sports: Option<&[VideoSport]>) -> String {
        match sports {
            Some(sports) => self.sports.resolve(sports.iter().map(|s| s.id)),
            None => NO_SPORTS.to_string(),
        }
    }

    pub fn resolve_school_names(&self, schools: Option<&[VideoSchool]>) -> String {
        match schools {
            Some(schools) => self.schools.resolve(schools.iter().map(|s| s.id)),
            None => NO_SCHOOLS.to_string(),
        }
    }
}
