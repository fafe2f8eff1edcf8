//! OAuth scopes known to the library.
//!
//! See <https://developer.spotify.com/documentation/general/guides/scopes/>.

/// Every scope the platform documents, in the order they are requested by
/// default from [`Accounts::authorize_url`](super::Accounts::authorize_url).
pub const SCOPES: [&str; 19] = [
    "playlist-read-private",
    "playlist-read-collaborative",
    "playlist-modify-public",
    "playlist-modify-private",
    "ugc-image-upload",
    "user-follow-modify",
    "user-follow-read",
    "user-library-read",
    "user-library-modify",
    "user-read-private",
    "user-read-birthdate",
    "user-read-email",
    "user-top-read",
    "user-read-playback-state",
    "user-modify-playback-state",
    "user-read-currently-playing",
    "user-read-recently-played",
    "streaming",
    "app-remote-control",
];

/// All registered scopes joined the way the `scope` query parameter wants them.
pub fn all_scopes() -> String {
    SCOPES.join(" ")
}

/// An ordered, deduplicated list of scope identifiers.
///
/// Order is kept for URL construction and serialization; membership checks
/// ignore both order and ASCII case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeSet(Vec<String>);

impl ScopeSet {
    /// Parses the space-delimited `scope` string returned by the token endpoint.
    pub fn parse(scopes: &str) -> Self {
        scopes.split_whitespace().collect()
    }

    pub fn contains(&self, scope: &str) -> bool {
        self.0.iter().any(|s| s.eq_ignore_ascii_case(scope.trim()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.clone()
    }
}

impl<S: AsRef<str>> FromIterator<S> for ScopeSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut scopes: Vec<String> = Vec::new();
        for scope in iter {
            let scope = scope.as_ref().trim();
            if scope.is_empty() || scopes.iter().any(|s| s.eq_ignore_ascii_case(scope)) {
                continue;
            }
            scopes.push(scope.to_string());
        }
        ScopeSet(scopes)
    }
}

impl std::fmt::Display for ScopeSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_nineteen_unique_scopes() {
        let set: ScopeSet = SCOPES.iter().collect();
        assert_eq!(set.len(), 19);
        assert_eq!(SCOPES[0], "playlist-read-private");
        assert_eq!(SCOPES[18], "app-remote-control");
    }

    #[test]
    fn parse_dedups_and_keeps_order() {
        let set = ScopeSet::parse("user-read-email  streaming user-read-email");
        assert_eq!(set.to_vec(), vec!["user-read-email", "streaming"]);
        assert_eq!(set.to_string(), "user-read-email streaming");
    }

    #[test]
    fn contains_ignores_case() {
        let set = ScopeSet::parse("user-read-private");
        assert!(set.contains("USER-READ-PRIVATE"));
        assert!(set.contains("user-read-private"));
        assert!(!set.contains("streaming"));
    }

    #[test]
    fn empty_string_is_empty_set() {
        assert!(ScopeSet::parse("").is_empty());
    }
}
