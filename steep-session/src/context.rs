//! Per-user session state

/// State one simulated user carries between steps and iterations.
///
/// Owned by exactly one user: stored as harness session data during load
/// runs, or held by the probe for a single run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    /// Most recent anti-forgery token seen
    pub token: Option<String>,
    pub authenticated: bool,
    /// Iterations started by this user
    pub iterations: u64,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `fresh` when a page carried a token; otherwise keep the old one.
    pub fn refresh_token(&mut self, fresh: Option<String>) {
        if let Some(token) = fresh {
            self.token = Some(token);
        }
    }

    /// Back to an anonymous session; the next iteration logs in again
    pub fn sign_out(&mut self) {
        self.authenticated = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_survives_pages_without_one() {
        let mut ctx = SessionContext::new();
        ctx.refresh_token(Some("first".to_string()));
        ctx.refresh_token(None);
        assert_eq!(ctx.token.as_deref(), Some("first"));

        ctx.refresh_token(Some("second".to_string()));
        assert_eq!(ctx.token.as_deref(), Some("second"));
    }

    #[test]
    fn test_sign_out_keeps_counters() {
        let mut ctx = SessionContext {
            token: Some("t".to_string()),
            authenticated: true,
            iterations: 3,
        };
        ctx.sign_out();
        assert!(!ctx.authenticated);
        assert_eq!(ctx.iterations, 3);
    }
}
