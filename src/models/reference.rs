use serde::{Deserialize, Serialize};

/// Entries of a lookup table that translate an integer id into a display name
pub trait ReferenceEntry {
    fn id(&self) -> i64;
    fn name(&self) -> &str;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SportsData {
    pub sports: Vec<Sport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[allow(dead_code)]
pub struct Sport {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub abbr: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub menu_label: String,
    #[serde(default)]
    pub weight: i64,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub in_season: bool,
    #[serde(default)]
    pub is_visible: bool,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub icon: Option<ImageSet>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchoolsData {
    pub schools: Vec<School>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[allow(dead_code)]
pub struct School {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub abbr: String,
    #[serde(default)]
    pub mascot: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub pac12: bool,
    #[serde(default)]
    pub images: Option<ImageSet>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[allow(dead_code)]
pub struct ImageSet {
    #[serde(default)]
    pub large: String,
    #[serde(default)]
    pub medium: String,
    #[serde(default)]
    pub small: String,
    #[serde(default)]
    pub tiny: String,
}

impl ReferenceEntry for Sport {
    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl ReferenceEntry for School {
    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}
