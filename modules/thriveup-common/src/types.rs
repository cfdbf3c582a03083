use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Label used for events that carry no category when they are grouped.
pub const UNCATEGORIZED: &str = "Uncategorized";

// --- Event record ---

/// A campus event as seen by triage and bookmarks.
///
/// Identity is the `id` alone: two records with the same id compare equal
/// even if their titles or categories differ.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    #[serde(alias = "eventId")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Image name or URL. Resolving it is the renderer's job.
    #[serde(rename = "imageName", default)]
    pub image_ref: String,
    /// Stored as-is; absent categories are only labelled at grouping time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl EventRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            image_ref: String::new(),
            category: None,
            organizer_name: None,
            date: None,
            location: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_image(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = image_ref.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_organizer(mut self, organizer_name: impl Into<String>) -> Self {
        self.organizer_name = Some(organizer_name.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// The category this record is grouped under.
    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or(UNCATEGORIZED)
    }
}

impl PartialEq for EventRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EventRecord {}

impl Hash for EventRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for EventRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.title, self.category_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_everything_but_id() {
        let a = EventRecord::new("e1", "Concert").with_category("Music");
        let b = EventRecord::new("e1", "Renamed");
        let c = EventRecord::new("e2", "Concert").with_category("Music");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn missing_category_is_labelled_uncategorized() {
        let event = EventRecord::new("e1", "Hackathon");
        assert_eq!(event.category_label(), UNCATEGORIZED);
        assert!(event.category.is_none());
    }
}
