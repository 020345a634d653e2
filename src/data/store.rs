use super::filter::filtered_indices;
use super::loader;
use super::model::{Record, RecordSet};
use super::page::{self, clamp_page_index, Page};
use crate::error::DecodeError;

// ---------------------------------------------------------------------------
// RecordStore – the only stateful part of the pipeline
// ---------------------------------------------------------------------------

/// Owns the imported records, the active search term and the active page.
///
/// Invariants:
/// * `visible` are strictly increasing indices into `full`, equal to
///   `filtered_indices(full, search_term)`.
/// * `page_index` is always within `[1, max(total_pages, 1)]`.
#[derive(Debug)]
pub struct RecordStore {
    full: RecordSet,
    visible: Vec<usize>,
    search_term: String,
    page_index: usize,
    page_size: usize,
}

impl RecordStore {
    pub fn new(page_size: usize) -> Self {
        Self {
            full: RecordSet::new(),
            visible: Vec::new(),
            search_term: String::new(),
            page_index: 1,
            page_size,
        }
    }

    /// Decode `bytes` and, on success, replace all state with the new records.
    /// A failed decode leaves the store untouched.
    pub fn import(&mut self, bytes: &[u8]) -> Result<usize, DecodeError> {
        let records = loader::decode(bytes)?;
        let count = records.len();
        self.replace(records);
        Ok(count)
    }

    /// Replace the full record set wholesale. The search term is cleared so
    /// the view shows every new record, and paging restarts at page 1.
    pub fn replace(&mut self, records: RecordSet) {
        self.visible = (0..records.len()).collect();
        self.full = records;
        self.search_term.clear();
        self.page_index = 1;
    }

    /// Apply a new search term; paging restarts at page 1.
    pub fn set_search_term(&mut self, term: &str) {
        self.search_term = term.to_string();
        self.visible = filtered_indices(&self.full, term);
        self.page_index = 1;
    }

    /// Select a page, clamped to the pages that exist.
    pub fn set_page(&mut self, page_index: usize) {
        self.page_index = clamp_page_index(page_index, self.total_pages());
    }

    pub fn full(&self) -> &[Record] {
        &self.full
    }

    /// The records passing the current search, in import order.
    pub fn view(&self) -> Vec<&Record> {
        self.visible.iter().map(|&i| &self.full[i]).collect()
    }

    pub fn view_len(&self) -> usize {
        self.visible.len()
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self) -> usize {
        page::total_pages(self.visible.len(), self.page_size)
    }

    /// Records on the active page.
    pub fn current_page(&self) -> Vec<&Record> {
        let Page { items, .. } = page::page(&self.visible, self.page_size, self.page_index);
        items.iter().map(|&i| &self.full[i]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(n: usize) -> RecordSet {
        (0..n)
            .map(|i| {
                Record::new()
                    .with("route", format!("{}", 100 + i))
                    .with("% Complete", i as f64 / n as f64)
            })
            .collect()
    }

    #[test]
    fn new_store_is_empty() {
        let store = RecordStore::new(12);
        assert!(store.view().is_empty());
        assert_eq!(store.total_pages(), 0);
        assert_eq!(store.page_index(), 1);
        assert!(store.current_page().is_empty());
    }

    #[test]
    fn search_resets_page() {
        let mut store = RecordStore::new(12);
        store.replace(records(25));
        store.set_page(3);
        assert_eq!(store.page_index(), 3);
        assert_eq!(store.current_page().len(), 1);

        store.set_search_term("11");
        assert_eq!(store.page_index(), 1);
        let routes: Vec<String> = store.view().iter().map(|r| r.display("route")).collect();
        assert_eq!(
            routes,
            vec!["110", "111", "112", "113", "114", "115", "116", "117", "118", "119"]
        );

        store.set_search_term("");
        assert_eq!(store.view_len(), 25);
    }

    #[test]
    fn set_page_clamps() {
        let mut store = RecordStore::new(12);
        store.replace(records(25));
        store.set_page(9);
        assert_eq!(store.page_index(), 3);
        store.set_page(0);
        assert_eq!(store.page_index(), 1);
    }

    #[test]
    fn new_import_replaces_everything() {
        let mut store = RecordStore::new(5);
        store.replace(records(20));
        store.set_search_term("10");
        store.set_page(2);

        store.replace(records(3));
        assert_eq!(store.full().len(), 3);
        assert_eq!(store.view_len(), 3);
        assert_eq!(store.search_term(), "");
        assert_eq!(store.page_index(), 1);
    }

    #[test]
    fn failed_import_keeps_prior_state() {
        let mut store = RecordStore::new(12);
        store.replace(records(4));
        store.set_search_term("102");

        assert!(store.import(b"PK\x03\x04 truncated").is_err());
        assert_eq!(store.full().len(), 4);
        assert_eq!(store.search_term(), "102");
        assert_eq!(store.view_len(), 1);
    }
}
