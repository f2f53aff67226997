//! Redirect target parsing.
//!
//! A route's `redirect_to` is split once, when the table is built, into
//! origin, path, query and fragment. The pieces are kept exactly as
//! written: nothing is decoded or re-encoded, so the `Location` header
//! reproduces the configured bytes.

use url::Url;

use crate::error::SignpostError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// `scheme://authority` for external targets, empty for internal ones.
    pub origin: String,
    pub path: String,
    pub query: Option<String>,
    pub fragment: Option<String>,
}

impl Target {
    pub fn parse(raw: &str) -> Result<Self, SignpostError> {
        let invalid = |reason: &str| SignpostError::InvalidTarget {
            target: raw.to_string(),
            reason: reason.to_string(),
        };

        if raw.is_empty() {
            return Err(invalid("target is empty"));
        }
        if raw.chars().any(|c| c.is_ascii_control() || c.is_whitespace()) {
            return Err(invalid("target contains whitespace or control characters"));
        }

        let (rest, fragment) = match raw.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment.to_string())),
            None => (raw, None),
        };
        let (rest, query) = match rest.split_once('?') {
            Some((rest, query)) => (rest, Some(query.to_string())),
            None => (rest, None),
        };

        if rest.starts_with('/') && !rest.starts_with("//") {
            return Ok(Self {
                origin: String::new(),
                path: rest.to_string(),
                query,
                fragment,
            });
        }

        let parsed = Url::parse(raw).map_err(|e| invalid(&e.to_string()))?;
        let scheme = parsed.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(invalid(&format!(
                "unsupported scheme '{scheme}' (expected http or https, or a path starting with '/')"
            )));
        }
        if parsed.host_str().is_none() {
            return Err(invalid("absolute target has no host"));
        }

        let after_scheme = rest
            .split_once("://")
            .map(|(_, tail)| tail)
            .ok_or_else(|| invalid("absolute target must use 'scheme://host'"))?;
        let (authority, path) = match after_scheme.find('/') {
            Some(idx) => after_scheme.split_at(idx),
            None => (after_scheme, ""),
        };
        let origin_len = rest.len() - after_scheme.len() + authority.len();

        Ok(Self {
            origin: rest[..origin_len].to_string(),
            path: path.to_string(),
            query,
            fragment,
        })
    }

    #[must_use]
    pub fn is_external(&self) -> bool {
        !self.origin.is_empty()
    }
}
