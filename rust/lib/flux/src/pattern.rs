//! MQTT-style path patterns shared by the store and the router.
//!
//! Paths use `/` as the level separator. In a pattern, `+` matches exactly
//! one level and `#` (last segment only) matches the remaining levels,
//! including none.

/// Returns true if `path` is matched by `pattern`.
pub fn matches(pattern: &str, path: &str) -> bool {
    let mut pat = pattern.split('/');
    let mut segs = path.split('/');
    loop {
        match (pat.next(), segs.next()) {
            (Some("#"), _) => return true,
            (Some("+"), Some(_)) => {}
            (Some(p), Some(s)) if p == s => {}
            (None, None) => return true,
            _ => return false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact() {
        assert!(matches("auth/state", "auth/state"));
        assert!(!matches("auth/state", "auth/stat"));
        assert!(!matches("auth/state", "auth/state/x"));
        assert!(!matches("auth/state/x", "auth/state"));
    }

    #[test]
    fn single_level() {
        assert!(matches("users/+", "users/console"));
        assert!(!matches("users/+", "users"));
        assert!(!matches("users/+", "users/form/email"));
        assert!(matches("+/state", "recovery/state"));
    }

    #[test]
    fn multi_level() {
        assert!(matches("users/#", "users/form/email"));
        assert!(matches("users/#", "users"));
        assert!(matches("#", "anything/at/all"));
        assert!(!matches("users/#", "auth/state"));
    }
}
