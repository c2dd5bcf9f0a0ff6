//! Damview view-state model
//!
//! The in-memory model behind the asset library browser:
//!
//! - [`tree::TreeStore`] owns the folder/album hierarchy and its lazy expansion.
//! - [`list::AssetListStore`] owns the paginated asset list of the active query,
//!   preview images, detail overlays and the insertion selection.
//! - [`selectors`] are pure projections used by presentation.
//! - [`orchestrator::Viewer`] is the only component that talks to the
//!   [`AssetService`](damview_core::AssetService); every state transition is an
//!   explicit method on it.

pub mod auth;
pub mod list;
pub mod navigation;
pub mod orchestrator;
pub mod scroll;
pub mod selectors;
pub mod session;
pub mod state;
pub mod tree;

#[cfg(test)]
mod testing;

pub use auth::{AuthPhase, AuthState};
pub use list::{AssetListStore, PageRequest, QueryTicket, SelectionChange, MAX_SELECTION};
pub use navigation::{Navigator, Route};
pub use orchestrator::{DetailRequest, Pending, SubtreeRequest, Viewer};
pub use session::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use state::{StoreError, ViewerState};
pub use tree::{Expansion, TreeStore, VisibleRow};
