// API credential handling
//
// The key is supplied per session (CLI flag, env var, or the page's masked field)
// and passed explicitly into every backend call. It is never persisted or logged.

use std::fmt;

/// An API key for the text-generation backend.
///
/// Construction rejects blank input, so holding a `Credential` means a
/// non-empty key is available. `Debug` is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a user-supplied key. Returns `None` for absent, empty or
    /// whitespace-only input.
    pub fn new(key: Option<String>) -> Option<Self> {
        let key = key?;
        let trimmed = key.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_owned()))
    }

    /// Pick the key submitted with a request, falling back to the session default.
    pub fn resolve(submitted: Option<String>, fallback: Option<&Credential>) -> Option<Self> {
        Self::new(submitted).or_else(|| fallback.cloned())
    }

    /// Raw key, for request headers only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_keys_rejected() {
        assert!(Credential::new(None).is_none());
        assert!(Credential::new(Some(String::new())).is_none());
        assert!(Credential::new(Some("   \t".to_owned())).is_none());
    }

    #[test]
    fn test_key_is_trimmed() {
        let cred = Credential::new(Some("  k1 \n".to_owned())).unwrap();
        assert_eq!(cred.expose(), "k1");
    }

    #[test]
    fn test_debug_is_redacted() {
        let cred = Credential::new(Some("super-secret".to_owned())).unwrap();
        let printed = format!("{cred:?}");
        assert!(!printed.contains("super-secret"));
        assert_eq!(printed, "Credential(***)");
    }

    #[test]
    fn test_resolve_prefers_submitted_key() {
        let default = Credential::new(Some("default".to_owned()));
        let resolved = Credential::resolve(Some("mine".to_owned()), default.as_ref()).unwrap();
        assert_eq!(resolved.expose(), "mine");
    }

    #[test]
    fn test_resolve_falls_back_on_blank_submission() {
        let default = Credential::new(Some("default".to_owned()));
        let resolved = Credential::resolve(Some("  ".to_owned()), default.as_ref()).unwrap();
        assert_eq!(resolved.expose(), "default");
        assert!(Credential::resolve(None, None).is_none());
    }
}
