//! Hypermedia links
//!
//! Links are attached to shaped resources only when the client asks for them
//! through the `Accept` header, e.g.
//! `Accept: application/vnd.dev-habit.hateoas+json`.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::{header::ACCEPT, request::Parts, HeaderMap, Method};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{Error, Result};

/// Media type that opts a client into hypermedia links
pub const HATEOAS_MEDIA_TYPE: &str = "application/vnd.dev-habit.hateoas+json";

const HATEOAS_SUBTYPE: &str = "hateoas";

/// A hypermedia link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    pub rel: String,
    pub method: String,
}

impl Link {
    pub fn new(href: impl Into<String>, rel: impl Into<String>, method: Method) -> Self {
        Self {
            href: href.into(),
            rel: rel.into(),
            method: method.as_str().to_string(),
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "href": self.href,
            "rel": self.rel,
            "method": self.method,
        })
    }
}

/// Render a list of links as a JSON array
pub fn links_to_json(links: &[Link]) -> Value {
    Value::Array(links.iter().map(Link::to_json).collect())
}

/// Builds absolute link hrefs from the configured public base URL
#[derive(Debug, Clone)]
pub struct LinkBuilder {
    base: Url,
}

impl LinkBuilder {
    /// Parse the public base URL
    ///
    /// Any path on the base URL is kept as a prefix for every generated href.
    pub fn new(public_base_url: &str) -> Result<Self> {
        let base = Url::parse(public_base_url).map_err(|e| {
            Error::Configuration(format!(
                "invalid public base URL '{public_base_url}': {e}"
            ))
        })?;

        if base.cannot_be_a_base() {
            return Err(Error::Configuration(format!(
                "public base URL '{public_base_url}' cannot be used as a base"
            )));
        }

        Ok(Self { base })
    }

    /// Absolute href for `path` with the given query pairs
    ///
    /// Pairs whose value is `None` are skipped; pair order is preserved.
    pub fn href(&self, path: &str, query: &[(&str, Option<String>)]) -> String {
        let mut url = self.base.clone();

        let prefix = self.base.path().trim_end_matches('/');
        let suffix = path.trim_start_matches('/');
        url.set_path(&format!("{prefix}/{suffix}"));

        let present: Vec<(&str, &str)> = query
            .iter()
            .filter_map(|(name, value)| value.as_deref().map(|v| (*name, v)))
            .collect();

        if present.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(present);
        }

        url.into()
    }

    pub fn link(
        &self,
        path: &str,
        query: &[(&str, Option<String>)],
        rel: &str,
        method: Method,
    ) -> Link {
        Link::new(self.href(path, query), rel, method)
    }
}

/// Whether the client asked for hypermedia links
///
/// True when any media range in `Accept` has a subtype (ignoring a `+json`
/// style suffix and parameters) containing `hateoas`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AcceptHeader {
    pub include_links: bool,
}

impl AcceptHeader {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let include_links = headers
            .get_all(ACCEPT)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(','))
            .any(requests_hateoas);

        Self { include_links }
    }
}

fn requests_hateoas(media_range: &str) -> bool {
    let essence = media_range.split(';').next().unwrap_or_default().trim();
    let Some((_, subtype)) = essence.split_once('/') else {
        return false;
    };
    let without_suffix = subtype.split('+').next().unwrap_or_default();
    without_suffix.to_ascii_lowercase().contains(HATEOAS_SUBTYPE)
}

impl<S> FromRequestParts<S> for AcceptHeader
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> std::result::Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}
