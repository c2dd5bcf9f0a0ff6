use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as JsonValue};

use super::scheme::AssetScheme;

/// URLs attached to an asset list entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetUrl {
    #[serde(default)]
    pub preview: String,
}

/// Asset as returned in list pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub scheme: AssetScheme,
    pub name: String,
    /// Size in bytes. The upstream sends it either as a number or a numeric string.
    #[serde(default, deserialize_with = "deserialize_size")]
    pub size: u64,
    #[serde(default)]
    pub url: AssetUrl,
}

/// Extended asset information, fetched on demand by content id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDetail {
    pub id: String,
    pub scheme: AssetScheme,
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_size")]
    pub size: u64,
    #[serde(default)]
    pub metadata: Map<String, JsonValue>,
    #[serde(default)]
    pub last_uploaded: Option<String>,
    #[serde(default)]
    pub approval_status: Option<String>,
    #[serde(default)]
    pub copyright: Option<String>,
    #[serde(default)]
    pub terms_and_conditions: Option<String>,
    #[serde(default)]
    pub additional: Map<String, JsonValue>,
    /// Resolved preview reference, filled in locally when the detail is loaded.
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Asset {
    pub fn new(id: impl Into<String>, scheme: AssetScheme, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            scheme,
            name: name.into(),
            size: 0,
            url: AssetUrl::default(),
        }
    }

    pub fn with_preview(mut self, preview: impl Into<String>) -> Self {
        self.url.preview = preview.into();
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }
}

impl AssetDetail {
    pub fn new(id: impl Into<String>, scheme: AssetScheme, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            scheme,
            name: name.into(),
            size: 0,
            metadata: Map::new(),
            last_uploaded: None,
            approval_status: None,
            copyright: None,
            terms_and_conditions: None,
            additional: Map::new(),
            image_url: None,
        }
    }

    /// Look up a string entry in the `metadata` map.
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(JsonValue::as_str)
    }

    /// Look up a string entry in the `additional` map.
    pub fn additional_str(&self, key: &str) -> Option<&str> {
        self.additional
            .get(key)
            .and_then(JsonValue::as_str)
            .filter(|s| !s.is_empty())
    }
}

fn deserialize_size<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawSize {
        Number(u64),
        Text(String),
        Null(Option<()>),
    }

    match RawSize::deserialize(deserializer)? {
        RawSize::Number(n) => Ok(n),
        RawSize::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
        RawSize::Null(_) => Ok(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_size_accepts_numeric_strings() {
        let asset: Asset = serde_json::from_str(
            r#"{"id":"a1","scheme":"image","name":"zhaosi.jpg","size":"36044","url":{"preview":"https://x/preview"}}"#,
        )
        .unwrap();
        assert_eq!(asset.size, 36044);
        assert_eq!(asset.url.preview, "https://x/preview");
    }

    #[test]
    fn detail_reads_camel_case_fields() {
        let detail: AssetDetail = serde_json::from_str(
            r#"{
                "id":"a1","scheme":"image","name":"zhaosi.jpg","size":1024,
                "metadata":{"Create Date":"2018:04:23 08:17:36"},
                "lastUploaded":"20180423081736585",
                "approvalStatus":"Pending",
                "termsAndConditions":"None",
                "additional":{"MDC Asset URL":"https://cdn.example.com/a1"}
            }"#,
        )
        .unwrap();
        assert_eq!(detail.last_uploaded.as_deref(), Some("20180423081736585"));
        assert_eq!(detail.approval_status.as_deref(), Some("Pending"));
        assert_eq!(detail.metadata_str("Create Date"), Some("2018:04:23 08:17:36"));
        assert_eq!(
            detail.additional_str("MDC Asset URL"),
            Some("https://cdn.example.com/a1")
        );
        assert!(detail.image_url.is_none());
    }

    #[test]
    fn empty_additional_entry_counts_as_missing() {
        let detail: AssetDetail = serde_json::from_str(
            r#"{"id":"a1","scheme":"video","name":"v.mp4","additional":{"MDC Asset URL":""}}"#,
        )
        .unwrap();
        assert_eq!(detail.additional_str("MDC Asset URL"), None);
    }
}
