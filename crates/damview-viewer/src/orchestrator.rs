//! Action Orchestrator
//!
//! [`Viewer`] owns the [`ViewerState`] and is the only component that talks to
//! the Asset Service. Network-issuing actions come in two halves: a
//! synchronous method that mutates state and returns a [`Pending`] request, and
//! a `complete_*` method that folds the result back in. [`Viewer::run`] chains
//! the two through the injected service.

use std::sync::Arc;
use std::time::Duration;

use damview_core::models::{
    Asset, AssetDetail, AssetPage, AssetScheme, ListQuery, ListScheme, NodeScheme, TokenData,
    TreeNode,
};
use damview_core::{AppError, AppResult, AssetService};

use crate::list::{PageRequest, QueryTicket, SelectionChange};
use crate::navigation::{Navigator, Route};
use crate::scroll::ScrollTrigger;
use crate::session::TokenStore;
use crate::state::{StoreError, ViewerState};
use crate::tree::Expansion;

/// Delay between clearing the session and leaving the view on logout.
pub const LOGOUT_GRACE: Duration = Duration::from_millis(20);

#[derive(Debug, Clone, PartialEq)]
pub struct SubtreeRequest {
    pub node_id: String,
    pub token: TokenData,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailRequest {
    pub content_id: String,
    pub scheme: AssetScheme,
    /// Preview to resolve alongside the detail; empty when the asset has none
    pub preview_url: String,
    pub token: TokenData,
}

/// A request issued by a state transition, waiting to be run.
#[derive(Debug, Clone, PartialEq)]
pub enum Pending {
    Subtree(SubtreeRequest),
    Page(PageRequest),
    Detail(DetailRequest),
}

pub struct Viewer {
    service: Arc<dyn AssetService>,
    tokens: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
    state: ViewerState,
    scroll: ScrollTrigger,
    logout_grace: Duration,
}

impl Viewer {
    pub fn new(
        service: Arc<dyn AssetService>,
        tokens: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            service,
            tokens,
            navigator,
            state: ViewerState::default(),
            scroll: ScrollTrigger::default(),
            logout_grace: LOGOUT_GRACE,
        }
    }

    pub fn with_logout_grace(mut self, grace: Duration) -> Self {
        self.logout_grace = grace;
        self
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    /// Seed auth from the token store and, when a tenant is known, load the
    /// root tree. Returns whether the session is logged in.
    pub async fn initialize(&mut self) -> bool {
        let stored = match self.tokens.load().await {
            Ok(token) => token.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read persisted token, starting logged out");
                TokenData::default()
            }
        };
        self.state.auth.seed(stored);

        if self.state.auth.is_logged_in() {
            tracing::info!(tenant = %self.state.auth.token().tenant, "Restored session");
            self.load_root().await;
            true
        } else {
            false
        }
    }

    pub fn begin_login(&mut self) {
        self.state.auth.begin_login();
    }

    /// Fold the outcome of a code exchange. Returns `true` on success.
    pub fn complete_login(&mut self, result: AppResult<TokenData>) -> bool {
        match result {
            Ok(token) if token.has_tenant() => {
                tracing::info!(tenant = %token.tenant, "Logged in");
                self.state.auth.complete_login(token);
                true
            }
            Ok(_) => {
                tracing::warn!("Token exchange returned no tenant");
                self.state
                    .auth
                    .fail_login(StoreError::auth("Token response carried no tenant"));
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "Token exchange failed");
                self.state.auth.fail_login(StoreError::auth(e.to_string()));
                false
            }
        }
    }

    /// Exchange an authorization code, persist the token and load the tree.
    pub async fn login(&mut self, code: &str) -> bool {
        self.begin_login();
        let result = self.service.exchange_code(code).await;
        if !self.complete_login(result) {
            return false;
        }
        if let Err(e) = self.tokens.save(self.state.auth.token()).await {
            tracing::warn!(error = %e, "Failed to persist token");
        }
        self.navigator.navigate(Route::View);
        self.load_root().await;
        true
    }

    pub async fn load_root(&mut self) {
        let Some(token) = self.require_token() else {
            return;
        };
        match self.service.list_tree(&token).await {
            Ok(nodes) => {
                tracing::debug!(count = nodes.len(), "Root tree loaded");
                self.state.tree.load_root(nodes);
            }
            Err(e) => {
                let flag = self.record_failure(&e, "Root tree load failed");
                self.state.tree.fail_root(flag);
            }
        }
    }

    /// Folder: toggle when open or cached, otherwise fetch its subtree.
    /// Album: list its assets. Library root: list everything.
    pub fn select_node(&mut self, scheme: NodeScheme, node_id: Option<&str>) -> Option<Pending> {
        self.scroll.reset();
        match scheme {
            NodeScheme::Folder => {
                let id = node_id?;
                let node = self.state.tree.find(id)?;
                if node.open || node.has_cached_children() {
                    self.state.tree.toggle_subtree(id);
                    return None;
                }
                let token = self.require_token()?;
                match self.state.tree.begin_expand(id) {
                    Expansion::FetchRequired => Some(Pending::Subtree(SubtreeRequest {
                        node_id: id.to_string(),
                        token,
                    })),
                    other => {
                        tracing::debug!(node_id = %id, expansion = ?other, "No subtree fetch issued");
                        None
                    }
                }
            }
            NodeScheme::Album => {
                let id = node_id?;
                self.start_query(ListQuery::album(id))
            }
            NodeScheme::Allfile => self.start_query(ListQuery::new(ListScheme::Allfile)),
        }
    }

    /// Remember the type filter and list it with the current keywords.
    pub fn apply_filter(&mut self, scheme: ListScheme) -> Option<Pending> {
        self.state.selected_filter = Some(scheme);
        let query = ListQuery::new(scheme).with_keywords(self.state.keywords.clone());
        self.start_query(query)
    }

    pub fn set_keywords(&mut self, keywords: impl Into<String>) {
        self.state.keywords = keywords.into();
    }

    /// Explicit search submit, scoped by the selected filter if any.
    pub fn search(&mut self, keywords: impl Into<String>) -> Option<Pending> {
        self.set_keywords(keywords);
        let scheme = self.state.selected_filter.unwrap_or(ListScheme::Allfile);
        let query = ListQuery::new(scheme).with_keywords(self.state.keywords.clone());
        self.start_query(query)
    }

    pub fn load_more(&mut self) -> Option<Pending> {
        let list = &self.state.list;
        if list.loading() || list.loaded_all() || list.query().is_none() {
            return None;
        }
        let token = self.require_token()?;
        self.state.list.load_more(token).map(Pending::Page)
    }

    /// Feed the end-of-list signal; only a rising edge loads the next page.
    pub fn scroll_reached_end(&mut self, reached: bool) -> Option<Pending> {
        if !self.scroll.observe(reached) {
            return None;
        }
        self.load_more()
    }

    /// Open the detail pane, fetching the detail unless it is already cached.
    pub fn open_detail(
        &mut self,
        content_id: &str,
        scheme: AssetScheme,
        preview_url: &str,
    ) -> Option<Pending> {
        self.state.selected_content_id = Some(content_id.to_string());
        if self.state.list.detail(content_id).is_some() {
            return None;
        }
        let token = self.require_token()?;
        self.state.list.begin_detail(content_id);
        Some(Pending::Detail(DetailRequest {
            content_id: content_id.to_string(),
            scheme,
            preview_url: preview_url.to_string(),
            token,
        }))
    }

    pub fn close_detail(&mut self) {
        self.state.selected_content_id = None;
    }

    pub fn toggle_selected(&mut self, asset_id: &str) -> SelectionChange {
        self.state.list.toggle_selected(asset_id)
    }

    pub fn toggle_tree_panel(&mut self) -> bool {
        self.state.tree_panel_open = !self.state.tree_panel_open;
        self.state.tree_panel_open
    }

    pub fn complete_subtree(&mut self, node_id: &str, result: AppResult<Vec<TreeNode>>) {
        match result {
            Ok(children) => {
                tracing::debug!(node_id = %node_id, count = children.len(), "Subtree loaded");
                self.state.tree.finish_expand(node_id, children);
            }
            Err(e) => {
                let flag = self.record_failure(&e, "Subtree fetch failed");
                self.state.tree.fail_expand(node_id, flag);
            }
        }
    }

    /// Fold a page response. Returns the assets it added; empty when the
    /// response failed or was stale.
    pub fn complete_page(&mut self, ticket: QueryTicket, result: AppResult<AssetPage>) -> Vec<Asset> {
        match result {
            Ok(page) => self
                .state
                .list
                .apply_page(ticket, page.items, page.next)
                .map(<[Asset]>::to_vec)
                .unwrap_or_default(),
            Err(e) => {
                let flag = self.record_failure(&e, "Page fetch failed");
                self.state.list.fail_page(ticket, flag);
                Vec::new()
            }
        }
    }

    pub fn complete_detail(&mut self, content_id: &str, result: AppResult<AssetDetail>) {
        match result {
            Ok(detail) => {
                self.state.list.store_detail(content_id, detail);
            }
            Err(e) => {
                let flag = self.record_failure(&e, "Detail fetch failed");
                self.state.list.fail_detail(content_id, flag);
            }
        }
    }

    /// Run a pending request against the service and fold its result in.
    pub async fn run(&mut self, pending: Pending) {
        match pending {
            Pending::Subtree(request) => {
                let result = self.fetch_subtree(&request).await;
                self.complete_subtree(&request.node_id, result);
            }
            Pending::Page(request) => {
                let result = self.fetch_page(&request).await;
                let added = self.complete_page(request.ticket, result);
                self.resolve_previews(&added, &request.token).await;
            }
            Pending::Detail(request) => {
                let result = self.fetch_detail(&request).await;
                self.complete_detail(&request.content_id, result);
            }
        }
    }

    pub async fn fetch_subtree(&self, request: &SubtreeRequest) -> AppResult<Vec<TreeNode>> {
        self.service
            .list_subtree(&request.token, &request.node_id)
            .await
    }

    pub async fn fetch_page(&self, request: &PageRequest) -> AppResult<AssetPage> {
        self.service
            .list_assets(&request.token, &request.query, request.cursor.as_ref())
            .await
    }

    /// Detail plus its resolved preview. A preview failure does not fail the detail.
    pub async fn fetch_detail(&self, request: &DetailRequest) -> AppResult<AssetDetail> {
        let mut detail = self
            .service
            .get_detail(&request.token, request.scheme, &request.content_id)
            .await?;
        if !request.preview_url.is_empty() {
            match self
                .service
                .fetch_preview(&request.token, &request.preview_url)
                .await
            {
                Ok(src) => detail.image_url = Some(src),
                Err(e) => {
                    tracing::debug!(content_id = %request.content_id, error = %e, "Detail preview unavailable");
                }
            }
        }
        Ok(detail)
    }

    /// Best-effort preview fetch for each new asset. Failures keep the placeholder.
    pub async fn resolve_previews(&mut self, assets: &[Asset], token: &TokenData) {
        for asset in assets {
            if asset.url.preview.is_empty() {
                continue;
            }
            match self.service.fetch_preview(token, &asset.url.preview).await {
                Ok(src) => self.state.list.set_preview(asset.id.clone(), src),
                Err(e) => {
                    tracing::debug!(asset_id = %asset.id, error = %e, "Preview unavailable");
                }
            }
        }
    }

    /// Clear the session, wait the grace delay, then go to the login view.
    pub async fn logout(&mut self) {
        if let Err(e) = self.tokens.clear().await {
            tracing::warn!(error = %e, "Failed to clear persisted token");
        }
        let mut list = std::mem::take(&mut self.state.list);
        list.clear();
        self.state = ViewerState {
            list,
            ..ViewerState::default()
        };
        self.scroll.reset();
        tracing::info!("Logged out");
        tokio::time::sleep(self.logout_grace).await;
        self.navigator.navigate(Route::Login);
    }

    fn start_query(&mut self, query: ListQuery) -> Option<Pending> {
        let token = self.require_token()?;
        self.scroll.reset();
        Some(Pending::Page(self.state.list.set_query(query, token)))
    }

    /// Token for an Asset Service call, or `None` with the auth error recorded.
    fn require_token(&mut self) -> Option<TokenData> {
        match self.state.auth.token_for_request() {
            Ok(token) => Some(token),
            Err(e) => {
                tracing::debug!(error = %e, "Asset Service call refused while logged out");
                self.state.auth.record_failure(StoreError::from(&e));
                None
            }
        }
    }

    fn record_failure(&mut self, err: &AppError, context: &str) -> StoreError {
        tracing::warn!(error = %err, "{}", context);
        let flag = StoreError::from(err);
        if flag.is_auth() {
            self.state.auth.record_failure(flag.clone());
        }
        flag
    }
}
