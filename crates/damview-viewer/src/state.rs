//! Combined view state and per-store error flags.

use damview_core::models::ListScheme;
use damview_core::{AppError, ErrorKind};

use crate::auth::AuthState;
use crate::list::AssetListStore;
use crate::tree::TreeStore;

/// Error flag recorded by a store after a failed fetch.
///
/// Stores keep their last good data when this is set; presentation decides
/// how to render it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    pub kind: ErrorKind,
    pub message: String,
}

impl StoreError {
    pub fn auth(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Auth,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Network,
            message: message.into(),
        }
    }

    pub fn is_auth(&self) -> bool {
        self.kind == ErrorKind::Auth
    }
}

impl From<&AppError> for StoreError {
    fn from(err: &AppError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Everything the selectors read.
#[derive(Debug, Clone)]
pub struct ViewerState {
    pub auth: AuthState,
    pub tree: TreeStore,
    pub list: AssetListStore,
    /// Type filter picked in the filter bar, if any
    pub selected_filter: Option<ListScheme>,
    /// Current search box contents
    pub keywords: String,
    /// Content id of the asset whose detail pane is open
    pub selected_content_id: Option<String>,
    pub tree_panel_open: bool,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self {
            auth: AuthState::default(),
            tree: TreeStore::default(),
            list: AssetListStore::default(),
            selected_filter: None,
            keywords: String::new(),
            selected_content_id: None,
            tree_panel_open: true,
        }
    }
}
