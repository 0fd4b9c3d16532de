// ── Core error types ──
//
// Panel-level errors from routerwatch-core. The `From<routerwatch_api::Error>`
// impl translates transport-layer errors into domain variants so that
// consumers never match on HTTP details directly.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Fetch errors ─────────────────────────────────────────────────
    #[error("Cannot reach graph endpoint: {reason}")]
    Unreachable { reason: String },

    #[error("Graph endpoint returned HTTP {status}: {message}")]
    Endpoint { status: u16, message: String },

    #[error("Malformed series for {router}: {reason}")]
    MalformedSeries { router: String, reason: String },

    // ── Identity errors ──────────────────────────────────────────────
    #[error("Invalid router id: {raw:?}")]
    InvalidRouterId { raw: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Whether the next poll tick has a reasonable chance of succeeding.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Unreachable { .. } => true,
            Self::Endpoint { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<routerwatch_api::Error> for CoreError {
    fn from(err: routerwatch_api::Error) -> Self {
        use routerwatch_api::Error as Api;

        match err {
            Api::Transport(e) => Self::Unreachable {
                reason: e.to_string(),
            },
            Api::Http { status, message } => Self::Endpoint { status, message },
            Api::Deserialization { message, .. } => Self::MalformedSeries {
                router: "(unknown)".into(),
                reason: message,
            },
            Api::InvalidUrl(e) => Self::Config {
                message: format!("invalid graph URL: {e}"),
            },
            Api::InvalidTemplate { template, reason } => Self::Config {
                message: format!("invalid graph URL template '{template}': {reason}"),
            },
            Api::Tls(message) => Self::Config { message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CoreError;

    #[test]
    fn http_errors_keep_status() {
        let core: CoreError = routerwatch_api::Error::Http {
            status: 502,
            message: "bad gateway".into(),
        }
        .into();
        assert!(matches!(core, CoreError::Endpoint { status: 502, .. }));
        assert!(core.is_transient());
    }

    #[test]
    fn template_errors_are_config() {
        let core: CoreError = routerwatch_api::Error::InvalidTemplate {
            template: "x".into(),
            reason: "missing placeholder".into(),
        }
        .into();
        assert!(matches!(core, CoreError::Config { .. }));
        assert!(!core.is_transient());
    }
}
