// Graph URL template
//
// The surrounding dashboard hands over one URL with a placeholder token
// standing in for the router id (e.g. `https://host/graph/none`). Every
// request substitutes the token with a concrete router id.

use std::fmt;

use url::Url;

use crate::error::Error;

/// Placeholder token used when none is configured.
pub const DEFAULT_PLACEHOLDER: &str = "none";

/// A URL with a replaceable router-id token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    raw: String,
    placeholder: String,
}

impl UrlTemplate {
    /// Validate and build a template.
    ///
    /// The template must contain `placeholder` and must parse as a URL once
    /// a representative router id has been substituted.
    pub fn new(raw: impl Into<String>, placeholder: impl Into<String>) -> Result<Self, Error> {
        let raw = raw.into();
        let placeholder = placeholder.into();

        if placeholder.is_empty() {
            return Err(Error::InvalidTemplate {
                template: raw,
                reason: "placeholder must not be empty".into(),
            });
        }
        if !raw.contains(&placeholder) {
            return Err(Error::InvalidTemplate {
                reason: format!("missing placeholder '{placeholder}'"),
                template: raw,
            });
        }

        let template = Self { raw, placeholder };
        template.resolve("probe")?;
        Ok(template)
    }

    /// Build a template using [`DEFAULT_PLACEHOLDER`].
    pub fn with_default_placeholder(raw: impl Into<String>) -> Result<Self, Error> {
        Self::new(raw, DEFAULT_PLACEHOLDER)
    }

    /// Substitute the router id and parse the result.
    ///
    /// Only the last occurrence of the placeholder is replaced, so a host or
    /// path segment that happens to contain the token stays intact.
    pub fn resolve(&self, router: &str) -> Result<Url, Error> {
        let Some(at) = self.raw.rfind(&self.placeholder) else {
            return Err(Error::InvalidTemplate {
                template: self.raw.clone(),
                reason: format!("missing placeholder '{}'", self.placeholder),
            });
        };
        let mut full = String::with_capacity(self.raw.len() + router.len());
        full.push_str(&self.raw[..at]);
        full.push_str(router);
        full.push_str(&self.raw[at + self.placeholder.len()..]);
        Ok(Url::parse(&full)?)
    }

    /// The raw template string.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The placeholder token.
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }
}

impl fmt::Display for UrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
