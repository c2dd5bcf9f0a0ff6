use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scheme of a tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeScheme {
    Folder,
    Album,
    /// The library root entry
    Allfile,
}

/// Scheme of an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetScheme {
    Image,
    Video,
    Audio,
    Document,
    Presentation,
    #[serde(other)]
    Other,
}

/// Scheme a list query is scoped to: the whole library, one album, or one asset type filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListScheme {
    Allfile,
    Album,
    Image,
    Video,
    Audio,
    Document,
    Presentation,
    Other,
}

impl NodeScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeScheme::Folder => "folder",
            NodeScheme::Album => "album",
            NodeScheme::Allfile => "allfile",
        }
    }
}

impl AssetScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetScheme::Image => "image",
            AssetScheme::Video => "video",
            AssetScheme::Audio => "audio",
            AssetScheme::Document => "document",
            AssetScheme::Presentation => "presentation",
            AssetScheme::Other => "other",
        }
    }
}

impl ListScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListScheme::Allfile => "allfile",
            ListScheme::Album => "album",
            ListScheme::Image => "image",
            ListScheme::Video => "video",
            ListScheme::Audio => "audio",
            ListScheme::Document => "document",
            ListScheme::Presentation => "presentation",
            ListScheme::Other => "other",
        }
    }
}

impl From<AssetScheme> for ListScheme {
    fn from(scheme: AssetScheme) -> Self {
        match scheme {
            AssetScheme::Image => ListScheme::Image,
            AssetScheme::Video => ListScheme::Video,
            AssetScheme::Audio => ListScheme::Audio,
            AssetScheme::Document => ListScheme::Document,
            AssetScheme::Presentation => ListScheme::Presentation,
            AssetScheme::Other => ListScheme::Other,
        }
    }
}

impl fmt::Display for NodeScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for AssetScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ListScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "allfile" | "all" => Ok(ListScheme::Allfile),
            "album" => Ok(ListScheme::Album),
            "image" | "images" => Ok(ListScheme::Image),
            "video" | "videos" => Ok(ListScheme::Video),
            "audio" => Ok(ListScheme::Audio),
            "document" | "documents" => Ok(ListScheme::Document),
            "presentation" | "presentations" => Ok(ListScheme::Presentation),
            "other" | "others" => Ok(ListScheme::Other),
            other => Err(format!("Unknown scheme: {}", other)),
        }
    }
}

impl FromStr for AssetScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "image" => Ok(AssetScheme::Image),
            "video" => Ok(AssetScheme::Video),
            "audio" => Ok(AssetScheme::Audio),
            "document" => Ok(AssetScheme::Document),
            "presentation" => Ok(AssetScheme::Presentation),
            "other" => Ok(AssetScheme::Other),
            other => Err(format!("Unknown asset scheme: {}", other)),
        }
    }
}
