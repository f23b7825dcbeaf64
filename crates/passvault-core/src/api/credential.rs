use std::sync::{Arc, RwLock};

/// The bearer credential attached to outbound backend calls.
///
/// Every `ApiClient` clone holds the same slot, so detaching the token here
/// takes effect for requests built afterwards by any clone, including ones
/// owned by background tasks. Only the session layer writes to it.
#[derive(Debug, Clone, Default)]
pub struct Credential {
    token: Arc<RwLock<Option<String>>>,
}

impl Credential {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn attach(&self, token: &str) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = Some(token.to_string());
    }

    pub(crate) fn detach(&self) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    /// The token currently attached, if any.
    pub fn current(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn is_attached(&self) -> bool {
        self.token.read().map(|t| t.is_some()).unwrap_or(false)
    }

    /// `Authorization` header value for the attached token.
    pub fn bearer(&self) -> Option<String> {
        self.current().map(|t| format!("Bearer {}", t))
    }
}
