//! Catalog Picklist
//!
//! Embedded multi-select list over the external catalog. The catalog is
//! fetched once per dialog open; a failed fetch degrades to an empty list so
//! the rest of the wizard keeps working.

use crate::services::{CatalogItem, CatalogService};
use std::collections::BTreeSet;

/// Selected catalog ids (unique, order irrelevant)
pub type Selection = BTreeSet<String>;

/// Picklist state: fetched items plus the highlight cursor
#[derive(Debug, Clone, Default)]
pub struct CatalogPanel {
    items: Vec<CatalogItem>,
    loaded: bool,
    cursor: usize,
}

impl CatalogPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the catalog, returning an empty list on failure
    pub async fn fetch(service: &dyn CatalogService, catalog: &str) -> Vec<CatalogItem> {
        match service.fetch_all(catalog).await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(catalog, error = %e, "Catalog fetch failed, showing empty list");
                Vec::new()
            }
        }
    }

    /// Install the fetched items (ends the loading state)
    pub fn set_items(&mut self, items: Vec<CatalogItem>) {
        self.items = items;
        self.loaded = true;
        self.cursor = 0;
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        !self.loaded
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    pub fn highlighted(&self) -> Option<&CatalogItem> {
        self.items.get(self.cursor)
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_down(&mut self) {
        if !self.items.is_empty() {
            self.cursor = (self.cursor + 1).min(self.items.len() - 1);
        }
    }

    /// Flip membership of `id` in `selection`.
    ///
    /// Returns the new membership, or `None` when `id` is not part of the
    /// fetched catalog (the selection is left untouched).
    pub fn toggle(&self, selection: &mut Selection, id: &str) -> Option<bool> {
        if !self.contains(id) {
            tracing::debug!(id, "Ignoring toggle for id outside the catalog");
            return None;
        }
        if selection.remove(id) {
            Some(false)
        } else {
            selection.insert(id.to_string());
            Some(true)
        }
    }

    /// Toggle whichever item the cursor is on
    pub fn toggle_highlighted(&self, selection: &mut Selection) -> Option<bool> {
        let id = self.highlighted()?.id.clone();
        self.toggle(selection, &id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::services::MockCatalogService;

    fn item(id: &str) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            title: format!("Title {}", id),
            description: String::new(),
            icon: "🎟".to_string(),
        }
    }

    fn panel() -> CatalogPanel {
        let mut p = CatalogPanel::new();
        p.set_items(vec![item("a"), item("b"), item("coupon-42")]);
        p
    }

    #[test]
    fn test_new_panel_is_loading() {
        let p = CatalogPanel::new();
        assert!(p.is_loading());
        assert!(p.items().is_empty());
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let p = panel();
        let mut sel = Selection::new();

        assert_eq!(p.toggle(&mut sel, "coupon-42"), Some(true));
        assert!(sel.contains("coupon-42"));

        assert_eq!(p.toggle(&mut sel, "coupon-42"), Some(false));
        assert!(sel.is_empty());
    }

    #[test]
    fn test_double_toggle_restores_selection() {
        let p = panel();
        let mut sel: Selection = ["a".to_string()].into_iter().collect();
        let before = sel.clone();

        p.toggle(&mut sel, "b");
        p.toggle(&mut sel, "b");
        assert_eq!(sel, before);

        p.toggle(&mut sel, "a");
        p.toggle(&mut sel, "a");
        assert_eq!(sel, before);
    }

    #[test]
    fn test_toggle_unknown_id_ignored() {
        let p = panel();
        let mut sel = Selection::new();
        assert_eq!(p.toggle(&mut sel, "not-in-catalog"), None);
        assert!(sel.is_empty());
    }

    #[test]
    fn test_no_selection_limit() {
        let p = panel();
        let mut sel = Selection::new();
        for id in ["a", "b", "coupon-42"] {
            p.toggle(&mut sel, id);
        }
        assert_eq!(sel.len(), 3);
    }

    #[test]
    fn test_cursor_bounds() {
        let mut p = panel();
        p.cursor_up();
        assert_eq!(p.cursor(), 0);
        for _ in 0..10 {
            p.cursor_down();
        }
        assert_eq!(p.cursor(), 2);
        assert_eq!(p.highlighted().map(|i| i.id.as_str()), Some("coupon-42"));

        let mut sel = Selection::new();
        assert_eq!(p.toggle_highlighted(&mut sel), Some(true));
        assert!(sel.contains("coupon-42"));
    }

    #[test]
    fn test_toggle_highlighted_on_empty_catalog() {
        let mut p = CatalogPanel::new();
        p.set_items(Vec::new());
        p.cursor_down();
        let mut sel = Selection::new();
        assert_eq!(p.toggle_highlighted(&mut sel), None);
    }

    #[tokio::test]
    async fn test_fetch_failure_degrades_to_empty() {
        let mut service = MockCatalogService::new();
        service
            .expect_fetch_all()
            .times(1)
            .returning(|_| Err(ServiceError::Unavailable("down".to_string())));

        let items = CatalogPanel::fetch(&service, "get_public_coupons").await;
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_passes_catalog_name() {
        let mut service = MockCatalogService::new();
        service
            .expect_fetch_all()
            .withf(|name| name == "get_public_coupons")
            .times(1)
            .returning(|_| Ok(vec![item("x")]));

        let items = CatalogPanel::fetch(&service, "get_public_coupons").await;
        assert_eq!(items, vec![item("x")]);
    }
}
