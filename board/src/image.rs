//! Image references and their resolution from host-provided values.
//!
//! Hosts hand the board images in whatever shape their platform uses: plain
//! URL strings, `{ "uri": ... }` source objects, nested wrappers such as
//! `{ "image": { "uri": ... } }`, or opaque numeric handles for bundled
//! assets. [`ImageResolver`] turns one of those into an [`ImageRef`] the board
//! can store, plus the canonical URL used to avoid importing the same picture
//! twice.

#[cfg(test)]
#[path = "image_test.rs"]
mod image_test;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Displayable image reference stored on an item.
///
/// Serialized untagged: a URL is a JSON string, an asset handle a JSON number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageRef {
    /// Remote or data URL.
    Url(String),
    /// Platform-local bundled asset handle.
    Asset(u64),
}

impl ImageRef {
    /// Canonical URL used for de-duplication, if this reference has one.
    #[must_use]
    pub fn canonical_url(&self) -> Option<&str> {
        match self {
            Self::Url(url) => Some(url),
            Self::Asset(_) => None,
        }
    }
}

/// Outcome of resolving a host image value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    /// Reference to store on the item.
    pub image_ref: ImageRef,
    /// Canonical URL, when the reference has one.
    pub url: Option<String>,
}

impl ResolvedImage {
    fn url(url: &str) -> Self {
        Self { image_ref: ImageRef::Url(url.to_owned()), url: Some(url.to_owned()) }
    }
}

/// Turns heterogeneous host image values into displayable references.
pub trait ImageResolver {
    /// Resolve `source`, or `None` if it cannot be displayed.
    fn resolve(&self, source: &Value) -> Option<ResolvedImage>;
}

/// Resolver for the JSON shapes hosts commonly send.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultImageResolver;

impl ImageResolver for DefaultImageResolver {
    fn resolve(&self, source: &Value) -> Option<ResolvedImage> {
        match source {
            Value::String(s) if !s.is_empty() => Some(ResolvedImage::url(s)),
            Value::Number(n) => n
                .as_u64()
                .map(|handle| ResolvedImage { image_ref: ImageRef::Asset(handle), url: None }),
            Value::Object(_) => nested_uri(source).map(ResolvedImage::url),
            _ => None,
        }
    }
}

/// First non-empty string among the known wrapper shapes.
fn nested_uri(source: &Value) -> Option<&str> {
    const PATHS: [&[&str]; 4] = [&["uri"], &["image", "uri"], &["data", "uri"], &["url"]];
    PATHS.iter().find_map(|path| {
        let mut cursor = source;
        for key in *path {
            cursor = cursor.get(key)?;
        }
        cursor.as_str().filter(|s| !s.is_empty())
    })
}
