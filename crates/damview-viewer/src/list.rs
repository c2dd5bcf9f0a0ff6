//! Asset List Store
//!
//! Holds the paginated asset list of the one active query, plus the preview
//! image map, the detail overlays and the insertion selection.
//!
//! Every query change bumps a generation counter. Page requests carry the
//! generation they were issued under as a [`QueryTicket`]; a response whose
//! ticket no longer matches is stale and is dropped without being merged.

use std::collections::{HashMap, HashSet};

use damview_core::models::{Asset, AssetDetail, ListQuery, PageCursor, TokenData};

use crate::state::StoreError;

/// Most assets that can be selected for insertion at once.
pub const MAX_SELECTION: usize = 20;

/// Identifies the query generation a page request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryTicket(u64);

/// A page fetch to run against the Asset Service.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub ticket: QueryTicket,
    pub query: ListQuery,
    /// `None` for the first page of the query
    pub cursor: Option<PageCursor>,
    pub token: TokenData,
}

/// Result of toggling an asset in the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    Selected,
    Deselected,
    /// The selection is full; nothing changed.
    LimitReached,
}

#[derive(Debug, Clone, Default)]
pub struct AssetListStore {
    query: Option<ListQuery>,
    generation: u64,
    image_list: Vec<Asset>,
    cursor: Option<PageCursor>,
    loaded_all: bool,
    loading: bool,
    error: Option<StoreError>,
    preview_images: HashMap<String, String>,
    detail_data: HashMap<String, AssetDetail>,
    detail_loading: Option<String>,
    detail_error: Option<StoreError>,
    selected: HashSet<String>,
    selection_limit_reached: bool,
}

impl AssetListStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> Option<&ListQuery> {
        self.query.as_ref()
    }

    pub fn image_list(&self) -> &[Asset] {
        &self.image_list
    }

    pub fn loaded_all(&self) -> bool {
        self.loaded_all
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&StoreError> {
        self.error.as_ref()
    }

    pub fn cursor(&self) -> Option<&PageCursor> {
        self.cursor.as_ref()
    }

    /// Drop the list, previews, details and selection for a new session.
    ///
    /// The generation keeps counting so tickets issued before the reset stay stale.
    pub fn clear(&mut self) {
        let generation = self.generation + 1;
        *self = Self {
            generation,
            ..Self::default()
        };
    }

    /// Whether a response carrying `ticket` still belongs to the active query.
    pub fn is_current(&self, ticket: QueryTicket) -> bool {
        self.query.is_some() && ticket.0 == self.generation
    }

    /// Switch to a new query: clear the list and start its first page.
    pub fn set_query(&mut self, query: ListQuery, token: TokenData) -> PageRequest {
        self.generation += 1;
        self.query = Some(query.clone());
        self.image_list.clear();
        self.cursor = None;
        self.loaded_all = false;
        self.loading = true;
        self.error = None;
        self.selected.clear();
        self.selection_limit_reached = false;

        tracing::debug!(
            scheme = %query.scheme,
            node_id = ?query.node_id,
            keywords = ?query.keywords,
            generation = self.generation,
            "List query changed"
        );

        PageRequest {
            ticket: QueryTicket(self.generation),
            query,
            cursor: None,
            token,
        }
    }

    /// Request the next page of the active query.
    ///
    /// No-op while a page is in flight or once everything is loaded, so pages
    /// are strictly sequential per query.
    pub fn load_more(&mut self, token: TokenData) -> Option<PageRequest> {
        if self.loading || self.loaded_all {
            return None;
        }
        let query = self.query.clone()?;
        self.loading = true;
        Some(PageRequest {
            ticket: QueryTicket(self.generation),
            query,
            cursor: self.cursor.clone(),
            token,
        })
    }

    /// Append a page. Returns the newly added assets, or `None` when the
    /// response was stale and dropped.
    pub fn apply_page(
        &mut self,
        ticket: QueryTicket,
        items: Vec<Asset>,
        next: Option<PageCursor>,
    ) -> Option<&[Asset]> {
        if !self.is_current(ticket) {
            tracing::debug!(
                ticket = ticket.0,
                generation = self.generation,
                "Dropping stale page response"
            );
            return None;
        }
        let start = self.image_list.len();
        self.image_list.extend(items);
        self.loaded_all = next.is_none();
        self.cursor = next;
        self.loading = false;
        self.error = None;
        Some(&self.image_list[start..])
    }

    /// A failed page keeps the list as it was and re-enables `load_more`.
    pub fn fail_page(&mut self, ticket: QueryTicket, error: StoreError) {
        if !self.is_current(ticket) {
            tracing::debug!(ticket = ticket.0, "Dropping stale page failure");
            return;
        }
        self.loading = false;
        self.error = Some(error);
    }

    pub fn preview_images(&self) -> &HashMap<String, String> {
        &self.preview_images
    }

    pub fn preview(&self, asset_id: &str) -> Option<&str> {
        self.preview_images.get(asset_id).map(String::as_str)
    }

    pub fn set_preview(&mut self, asset_id: impl Into<String>, src: impl Into<String>) {
        self.preview_images.insert(asset_id.into(), src.into());
    }

    pub fn detail(&self, content_id: &str) -> Option<&AssetDetail> {
        self.detail_data.get(content_id)
    }

    pub fn detail_loading(&self) -> Option<&str> {
        self.detail_loading.as_deref()
    }

    pub fn detail_error(&self) -> Option<&StoreError> {
        self.detail_error.as_ref()
    }

    pub fn begin_detail(&mut self, content_id: &str) {
        self.detail_loading = Some(content_id.to_string());
        self.detail_error = None;
    }

    /// Cache a detail under the content id it was requested with.
    ///
    /// Only the detail currently loading is accepted; anything else is a late
    /// response and is dropped. Returns whether the detail was stored.
    pub fn store_detail(&mut self, content_id: &str, detail: AssetDetail) -> bool {
        if self.detail_loading.as_deref() != Some(content_id) {
            tracing::debug!(content_id = %content_id, "Dropping detail that is no longer loading");
            return false;
        }
        self.detail_loading = None;
        self.detail_error = None;
        self.detail_data.insert(content_id.to_string(), detail);
        true
    }

    pub fn fail_detail(&mut self, content_id: &str, error: StoreError) {
        if self.detail_loading.as_deref() == Some(content_id) {
            self.detail_loading = None;
        }
        self.detail_error = Some(error);
    }

    pub fn selected(&self) -> &HashSet<String> {
        &self.selected
    }

    pub fn is_selected(&self, asset_id: &str) -> bool {
        self.selected.contains(asset_id)
    }

    pub fn selection_limit_reached(&self) -> bool {
        self.selection_limit_reached
    }

    pub fn toggle_selected(&mut self, asset_id: &str) -> SelectionChange {
        if self.selected.remove(asset_id) {
            self.selection_limit_reached = false;
            return SelectionChange::Deselected;
        }
        if self.selected.len() >= MAX_SELECTION {
            self.selection_limit_reached = true;
            tracing::debug!(asset_id = %asset_id, "Selection limit reached");
            return SelectionChange::LimitReached;
        }
        self.selected.insert(asset_id.to_string());
        SelectionChange::Selected
    }
}
