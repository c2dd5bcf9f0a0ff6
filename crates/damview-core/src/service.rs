//! Asset Service seam
//!
//! The viewer's orchestrator is the only component that talks to the network,
//! and it does so exclusively through this trait. `damview-api-client`
//! provides the HTTP implementation; tests supply scripted fakes.

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{AssetDetail, AssetPage, AssetScheme, ListQuery, PageCursor, TokenData, TreeNode};

#[async_trait]
pub trait AssetService: Send + Sync {
    /// Exchange an OAuth2 authorization code for a token payload.
    async fn exchange_code(&self, code: &str) -> AppResult<TokenData>;

    /// List the top-level folders and albums.
    async fn list_tree(&self, token: &TokenData) -> AppResult<Vec<TreeNode>>;

    /// List the direct children of a folder.
    async fn list_subtree(&self, token: &TokenData, node_id: &str) -> AppResult<Vec<TreeNode>>;

    /// Fetch one page of assets. `cursor` is `None` for the first page.
    async fn list_assets(
        &self,
        token: &TokenData,
        query: &ListQuery,
        cursor: Option<&PageCursor>,
    ) -> AppResult<AssetPage>;

    /// Fetch one asset's extended detail.
    async fn get_detail(
        &self,
        token: &TokenData,
        scheme: AssetScheme,
        content_id: &str,
    ) -> AppResult<AssetDetail>;

    /// Resolve a preview URL into a locally usable image reference.
    async fn fetch_preview(&self, token: &TokenData, preview_url: &str) -> AppResult<String>;
}
