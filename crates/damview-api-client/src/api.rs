//! Domain methods for the Asset Service client.
//!
//! Upstream list pages expose `start` / `limit` / `found`; they are turned into
//! an opaque [`PageCursor`] here so callers never interpret offsets.

use async_trait::async_trait;
use base64::Engine;
use damview_core::models::{
    Asset, AssetDetail, AssetPage, AssetScheme, ListQuery, ListScheme, PageCursor, TokenData,
    TreeNode,
};
use damview_core::{AppError, AppResult, AssetService};

use crate::{ApiClient, API_PREFIX};

/// Search and album listing response.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<Asset>,
    #[serde(default)]
    pub start: u64,
    #[serde(default)]
    pub limit: u64,
    /// Total number of matches for the query
    #[serde(default)]
    pub found: u64,
}

impl SearchResponse {
    /// Cursor for the page after this one, `None` when this is the last.
    pub fn next_cursor(&self) -> Option<PageCursor> {
        if self.results.is_empty() {
            return None;
        }
        let next = self.start + self.results.len() as u64;
        (next < self.found).then(|| PageCursor::new(next.to_string()))
    }

    pub fn into_page(self) -> AssetPage {
        let next = self.next_cursor();
        AssetPage {
            items: self.results,
            next,
        }
    }
}

/// Tree listing: either wrapped in `results` or a bare array.
#[derive(Debug, serde::Deserialize)]
#[serde(untagged)]
pub enum TreeResponse {
    Wrapped { results: Vec<TreeNode> },
    Bare(Vec<TreeNode>),
}

impl TreeResponse {
    pub fn into_nodes(self) -> Vec<TreeNode> {
        match self {
            TreeResponse::Wrapped { results } => results,
            TreeResponse::Bare(nodes) => nodes,
        }
    }
}

fn cursor_start(cursor: Option<&PageCursor>) -> AppResult<u64> {
    match cursor {
        None => Ok(0),
        Some(c) => c
            .as_str()
            .parse()
            .map_err(|_| AppError::InvalidInput(format!("Invalid page cursor: {}", c.as_str()))),
    }
}

impl ApiClient {
    pub async fn list_tree_nodes(&self, token: &TokenData) -> AppResult<Vec<TreeNode>> {
        let response: TreeResponse = self
            .get(
                &format!("{}/tree", API_PREFIX),
                token,
                &[("layer", "1".to_string())],
            )
            .await?;
        Ok(response.into_nodes())
    }

    pub async fn list_subtree_nodes(
        &self,
        token: &TokenData,
        node_id: &str,
    ) -> AppResult<Vec<TreeNode>> {
        let response: TreeResponse = self
            .get(
                &format!("{}/tree/{}", API_PREFIX, urlencoding::encode(node_id)),
                token,
                &[("layer", "1".to_string())],
            )
            .await?;
        Ok(response.into_nodes())
    }

    /// One page of a search or album listing.
    pub async fn search(
        &self,
        token: &TokenData,
        query: &ListQuery,
        cursor: Option<&PageCursor>,
    ) -> AppResult<SearchResponse> {
        let start = cursor_start(cursor)?;
        let mut params = vec![
            ("start", start.to_string()),
            ("limit", self.page_size().to_string()),
        ];
        if let Some(keywords) = &query.keywords {
            params.push(("keyword", keywords.clone()));
        }

        let path = match (query.scheme, &query.node_id) {
            (ListScheme::Album, Some(album_id)) => {
                format!("{}/album/{}", API_PREFIX, urlencoding::encode(album_id))
            }
            (ListScheme::Album, None) => {
                return Err(AppError::InvalidInput(
                    "Album listing requires a node id".to_string(),
                ))
            }
            (scheme, _) => {
                params.push(("scheme", scheme.as_str().to_string()));
                format!("{}/search", API_PREFIX)
            }
        };

        self.get(&path, token, &params).await
    }

    pub async fn get_asset_detail(
        &self,
        token: &TokenData,
        scheme: AssetScheme,
        content_id: &str,
    ) -> AppResult<AssetDetail> {
        self.get(
            &format!(
                "{}/{}/{}",
                API_PREFIX,
                scheme.as_str(),
                urlencoding::encode(content_id)
            ),
            token,
            &[],
        )
        .await
        .map_err(|e| match e {
            AppError::Upstream { status: 404, .. } => {
                AppError::NotFound(format!("Asset {} not found", content_id))
            }
            other => other,
        })
    }

    /// Download a preview and return it as a `data:` URL.
    pub async fn preview_data_url(&self, token: &TokenData, preview_url: &str) -> AppResult<String> {
        let (bytes, content_type) = self.get_bytes(preview_url, token).await?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        Ok(format!("data:{};base64,{}", content_type, encoded))
    }

    /// Exchange an authorization code through the server's `/token` route.
    pub async fn exchange_authorization_code(&self, code: &str) -> AppResult<TokenData> {
        self.get_public("/token", &[("code", code.to_string())])
            .await
    }
}

#[async_trait]
impl AssetService for ApiClient {
    async fn exchange_code(&self, code: &str) -> AppResult<TokenData> {
        self.exchange_authorization_code(code).await
    }

    async fn list_tree(&self, token: &TokenData) -> AppResult<Vec<TreeNode>> {
        self.list_tree_nodes(token).await
    }

    async fn list_subtree(&self, token: &TokenData, node_id: &str) -> AppResult<Vec<TreeNode>> {
        self.list_subtree_nodes(token, node_id).await
    }

    async fn list_assets(
        &self,
        token: &TokenData,
        query: &ListQuery,
        cursor: Option<&PageCursor>,
    ) -> AppResult<AssetPage> {
        Ok(self.search(token, query, cursor).await?.into_page())
    }

    async fn get_detail(
        &self,
        token: &TokenData,
        scheme: AssetScheme,
        content_id: &str,
    ) -> AppResult<AssetDetail> {
        self.get_asset_detail(token, scheme, content_id).await
    }

    async fn fetch_preview(&self, token: &TokenData, preview_url: &str) -> AppResult<String> {
        self.preview_data_url(token, preview_url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use damview_core::models::NodeScheme;
    use damview_core::ErrorKind;
    use mockito::Matcher;
    use std::time::Duration;

    fn token() -> TokenData {
        TokenData::new("access", "acme.example.com")
    }

    fn client(server: &mockito::ServerGuard) -> ApiClient {
        ApiClient::new(server.url(), Duration::from_secs(5))
            .unwrap()
            .with_page_size(2)
    }

    fn tenant_matcher(extra: Vec<Matcher>) -> Matcher {
        let mut all = vec![Matcher::UrlEncoded(
            "tenant".into(),
            "acme.example.com".into(),
        )];
        all.extend(extra);
        Matcher::AllOf(all)
    }

    #[test]
    fn cursor_is_derived_from_start_and_found() {
        let page = SearchResponse {
            results: vec![
                Asset::new("a1", AssetScheme::Image, "a1"),
                Asset::new("a2", AssetScheme::Image, "a2"),
            ],
            start: 0,
            limit: 2,
            found: 3,
        };
        assert_eq!(page.next_cursor(), Some(PageCursor::new("2")));

        let page = SearchResponse {
            results: vec![Asset::new("a3", AssetScheme::Image, "a3")],
            start: 2,
            limit: 2,
            found: 3,
        };
        assert_eq!(page.next_cursor(), None);

        let empty = SearchResponse {
            results: Vec::new(),
            start: 0,
            limit: 2,
            found: 10,
        };
        assert!(empty.into_page().is_last());
    }

    #[test]
    fn invalid_cursor_is_rejected() {
        let err = cursor_start(Some(&PageCursor::new("abc"))).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert_eq!(cursor_start(None).unwrap(), 0);
    }

    #[tokio::test]
    async fn tree_request_carries_tenant_and_bearer() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/tree")
            .match_query(tenant_matcher(vec![Matcher::UrlEncoded(
                "layer".into(),
                "1".into(),
            )]))
            .match_header("authorization", "Bearer access")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"results":[{"id":"r1","name":"Root","scheme":"folder","size":3},
                               {"id":"a1","name":"Album","scheme":"album"}]}"#,
            )
            .create_async()
            .await;

        let nodes = client(&server).list_tree(&token()).await.unwrap();
        mock.assert_async().await;
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].scheme, NodeScheme::Folder);
        assert_eq!(nodes[0].size, 3);
        assert!(nodes[1].children.is_none());
    }

    #[tokio::test]
    async fn subtree_accepts_bare_arrays() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/tree/r1")
            .match_query(tenant_matcher(Vec::new()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id":"f1","name":"Child","scheme":"folder"}]"#)
            .create_async()
            .await;

        let nodes = client(&server).list_subtree(&token(), "r1").await.unwrap();
        mock.assert_async().await;
        assert_eq!(nodes[0].id, "f1");
    }

    #[tokio::test]
    async fn search_pages_follow_the_cursor() {
        let mut server = mockito::Server::new_async().await;
        let first = server
            .mock("GET", "/api/v1/search")
            .match_query(tenant_matcher(vec![
                Matcher::UrlEncoded("scheme".into(), "image".into()),
                Matcher::UrlEncoded("keyword".into(), "cats".into()),
                Matcher::UrlEncoded("start".into(), "0".into()),
                Matcher::UrlEncoded("limit".into(), "2".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"start":0,"limit":2,"found":3,"results":[
                    {"id":"i1","scheme":"image","name":"i1.jpg","size":"2048","url":{"preview":"/p/i1"}},
                    {"id":"i2","scheme":"image","name":"i2.jpg","size":1024}]}"#,
            )
            .create_async()
            .await;
        let second = server
            .mock("GET", "/api/v1/search")
            .match_query(tenant_matcher(vec![Matcher::UrlEncoded(
                "start".into(),
                "2".into(),
            )]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"start":2,"limit":2,"found":3,"results":[
                    {"id":"i3","scheme":"image","name":"i3.jpg"}]}"#,
            )
            .create_async()
            .await;

        let api = client(&server);
        let query = ListQuery::new(ListScheme::Image).with_keywords("cats");
        let page = api.list_assets(&token(), &query, None).await.unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].size, 2048);
        let cursor = page.next.expect("more pages");

        let page = api.list_assets(&token(), &query, Some(&cursor)).await.unwrap();
        assert_eq!(page.items[0].id, "i3");
        assert!(page.is_last());

        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    async fn album_queries_use_the_album_route() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/album/a1")
            .match_query(tenant_matcher(vec![Matcher::UrlEncoded(
                "start".into(),
                "0".into(),
            )]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"start":0,"limit":2,"found":0,"results":[]}"#)
            .create_async()
            .await;

        let page = client(&server)
            .list_assets(&token(), &ListQuery::album("a1"), None)
            .await
            .unwrap();
        mock.assert_async().await;
        assert!(page.items.is_empty());
        assert!(page.is_last());
    }

    #[tokio::test]
    async fn non_success_status_maps_to_upstream_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/image/c1")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body("token expired")
            .create_async()
            .await;

        let err = client(&server)
            .get_detail(&token(), AssetScheme::Image, "c1")
            .await
            .unwrap_err();
        match &err {
            AppError::Upstream { status, body } => {
                assert_eq!(*status, 401);
                assert_eq!(body, "token expired");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(err.kind(), ErrorKind::Auth);
    }

    #[tokio::test]
    async fn detail_is_parsed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/video/c2")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"id":"c2","scheme":"video","name":"clip.mp4","size":4096,
                    "metadata":{"Create Date":"2023:01:15"},
                    "lastUploaded":"20230115103045123",
                    "additional":{"MDC Asset URL":"https://cdn.example.com/clip.mp4"}}"#,
            )
            .create_async()
            .await;

        let detail = client(&server)
            .get_detail(&token(), AssetScheme::Video, "c2")
            .await
            .unwrap();
        assert_eq!(detail.last_uploaded.as_deref(), Some("20230115103045123"));
        assert_eq!(
            detail.additional_str("MDC Asset URL"),
            Some("https://cdn.example.com/clip.mp4")
        );
    }

    #[tokio::test]
    async fn missing_detail_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/image/gone")
            .match_query(tenant_matcher(Vec::new()))
            .with_status(404)
            .with_body("no such asset")
            .create_async()
            .await;

        let err = client(&server)
            .get_detail(&token(), AssetScheme::Image, "gone")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m.contains("gone")));
        assert_eq!(err.kind(), ErrorKind::Network);
    }

    #[tokio::test]
    async fn preview_becomes_a_data_url() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/p/i1")
            .match_query(tenant_matcher(Vec::new()))
            .match_header("authorization", "Bearer access")
            .with_status(200)
            .with_header("content-type", "image/png")
            .with_body([1u8, 2, 3])
            .create_async()
            .await;

        let api = client(&server);
        let src = api.fetch_preview(&token(), "/p/i1").await.unwrap();
        assert_eq!(src, "data:image/png;base64,AQID");
    }

    #[tokio::test]
    async fn transport_failure_maps_to_network_error() {
        let api = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = api.list_tree(&token()).await.unwrap_err();
        assert!(matches!(err, AppError::Network(_)));
        assert_eq!(err.kind(), ErrorKind::Network);
    }

    #[tokio::test]
    async fn code_exchange_sends_no_credentials() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/token")
            .match_query(Matcher::UrlEncoded("code".into(), "abc".into()))
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token":"t1","tenant":"acme.example.com","expires_in":3600}"#)
            .create_async()
            .await;

        let token = client(&server).exchange_code("abc").await.unwrap();
        mock.assert_async().await;
        assert_eq!(token.access_token, "t1");
        assert!(token.has_tenant());
    }
}
