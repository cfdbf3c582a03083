//! Categorized, searchable view over bookmarked events.

use std::collections::HashMap;

use thriveup_common::EventRecord;

/// One category and its events, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySection {
    pub name: String,
    pub events: Vec<EventRecord>,
}

/// Group `records` by category label.
///
/// Sections appear in order of each category's first appearance; events keep
/// their relative order inside a section. A non-empty `filter` keeps only
/// records whose title contains it, ignoring case, before grouping.
pub fn rebuild(records: &[EventRecord], filter: Option<&str>) -> Vec<CategorySection> {
    let needle = filter.filter(|f| !f.is_empty()).map(str::to_lowercase);

    let mut sections: Vec<CategorySection> = Vec::new();
    let mut position: HashMap<&str, usize> = HashMap::new();

    for record in records {
        if let Some(needle) = &needle {
            if !record.title.to_lowercase().contains(needle.as_str()) {
                continue;
            }
        }

        let label = record.category_label();
        let slot = *position.entry(label).or_insert_with(|| {
            sections.push(CategorySection {
                name: label.to_string(),
                events: Vec::new(),
            });
            sections.len() - 1
        });
        sections[slot].events.push(record.clone());
    }

    sections
}

/// Bookmarked events grouped for display. Derived state: the accepted set it
/// holds is a copy of what the persistence gateway stores.
#[derive(Debug, Clone, Default)]
pub struct BookmarkIndex {
    accepted: Vec<EventRecord>,
    filter: Option<String>,
    sections: Vec<CategorySection>,
}

impl BookmarkIndex {
    pub fn new(accepted: Vec<EventRecord>) -> Self {
        let mut index = Self::default();
        for record in accepted {
            if !index.contains(&record.id) {
                index.accepted.push(record);
            }
        }
        index.refresh();
        index
    }

    /// Append a bookmark. Returns false (and changes nothing) if the id is
    /// already bookmarked.
    pub fn add(&mut self, record: EventRecord) -> bool {
        if self.contains(&record.id) {
            return false;
        }
        self.accepted.push(record);
        self.refresh();
        true
    }

    /// Set the search text. An empty string clears the filter.
    pub fn set_filter(&mut self, filter: impl Into<String>) {
        let filter = filter.into();
        self.filter = if filter.is_empty() { None } else { Some(filter) };
        self.refresh();
    }

    pub fn clear_filter(&mut self) {
        self.filter = None;
        self.refresh();
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    pub fn categories(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.name.as_str()).collect()
    }

    /// Events in `category` under the current filter; empty if unknown.
    pub fn events_in(&self, category: &str) -> &[EventRecord] {
        self.sections
            .iter()
            .find(|s| s.name == category)
            .map(|s| s.events.as_slice())
            .unwrap_or(&[])
    }

    pub fn sections(&self) -> &[CategorySection] {
        &self.sections
    }

    /// The full accepted set, unfiltered, in insertion order.
    pub fn accepted(&self) -> &[EventRecord] {
        &self.accepted
    }

    pub fn contains(&self, id: &str) -> bool {
        self.accepted.iter().any(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.accepted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }

    fn refresh(&mut self) {
        self.sections = rebuild(&self.accepted, self.filter.as_deref());
    }
}
