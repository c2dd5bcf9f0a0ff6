//! Scripted in-memory `AssetService` for orchestrator tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use damview_core::models::{
    AssetDetail, AssetPage, AssetScheme, ListQuery, PageCursor, TokenData, TreeNode,
};
use damview_core::{AppError, AppResult, AssetService};

use crate::navigation::{Navigator, Route};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ExchangeCode(String),
    Tree,
    Subtree(String),
    Assets {
        query: ListQuery,
        cursor: Option<String>,
    },
    Detail(String),
    Preview(String),
}

/// Each method pops the next scripted response; an empty script yields a
/// neutral default (empty tree, last empty page, not-found detail).
#[derive(Default)]
pub struct FakeAssetService {
    tokens: Mutex<VecDeque<AppResult<TokenData>>>,
    trees: Mutex<VecDeque<AppResult<Vec<TreeNode>>>>,
    subtrees: Mutex<VecDeque<AppResult<Vec<TreeNode>>>>,
    pages: Mutex<VecDeque<AppResult<AssetPage>>>,
    details: Mutex<VecDeque<AppResult<AssetDetail>>>,
    previews: Mutex<HashMap<String, String>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeAssetService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_token(&self, result: AppResult<TokenData>) {
        self.tokens.lock().unwrap().push_back(result);
    }

    pub fn push_tree(&self, result: AppResult<Vec<TreeNode>>) {
        self.trees.lock().unwrap().push_back(result);
    }

    pub fn push_subtree(&self, result: AppResult<Vec<TreeNode>>) {
        self.subtrees.lock().unwrap().push_back(result);
    }

    pub fn push_page(&self, result: AppResult<AssetPage>) {
        self.pages.lock().unwrap().push_back(result);
    }

    pub fn push_detail(&self, result: AppResult<AssetDetail>) {
        self.details.lock().unwrap().push_back(result);
    }

    /// Previews not registered here fail with a network error.
    pub fn add_preview(&self, url: &str, src: &str) {
        self.previews
            .lock()
            .unwrap()
            .insert(url.to_string(), src.to_string());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn asset_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Assets { .. }))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl AssetService for FakeAssetService {
    async fn exchange_code(&self, code: &str) -> AppResult<TokenData> {
        self.record(Call::ExchangeCode(code.to_string()));
        self.tokens
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::Unauthorized("no scripted token".to_string())))
    }

    async fn list_tree(&self, _token: &TokenData) -> AppResult<Vec<TreeNode>> {
        self.record(Call::Tree);
        self.trees.lock().unwrap().pop_front().unwrap_or(Ok(Vec::new()))
    }

    async fn list_subtree(&self, _token: &TokenData, node_id: &str) -> AppResult<Vec<TreeNode>> {
        self.record(Call::Subtree(node_id.to_string()));
        self.subtrees
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(Vec::new()))
    }

    async fn list_assets(
        &self,
        _token: &TokenData,
        query: &ListQuery,
        cursor: Option<&PageCursor>,
    ) -> AppResult<AssetPage> {
        self.record(Call::Assets {
            query: query.clone(),
            cursor: cursor.map(|c| c.as_str().to_string()),
        });
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(AssetPage::last(Vec::new())))
    }

    async fn get_detail(
        &self,
        _token: &TokenData,
        _scheme: AssetScheme,
        content_id: &str,
    ) -> AppResult<AssetDetail> {
        self.record(Call::Detail(content_id.to_string()));
        self.details
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::NotFound(content_id.to_string())))
    }

    async fn fetch_preview(&self, _token: &TokenData, preview_url: &str) -> AppResult<String> {
        self.record(Call::Preview(preview_url.to_string()));
        self.previews
            .lock()
            .unwrap()
            .get(preview_url)
            .cloned()
            .ok_or_else(|| AppError::Network(format!("preview unavailable: {}", preview_url)))
    }
}

/// Navigator that remembers every route it was sent to.
#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}
