//! The resolved key/value environment.
//!
//! A [`ResolvedEnv`] is built once per invocation from the ambient process
//! environment and the `KEY=VALUE` tokens given on the command line, then
//! handed stage by stage through the configure pipeline. Stages only ever
//! mutate it through two operations:
//!
//! - [`ResolvedEnv::fill`] - set a key only if it is absent (defaults)
//! - [`ResolvedEnv::set`] - overwrite a key (derived values)

use std::collections::BTreeMap;

/// An ordered mapping from configuration key to value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedEnv {
    vars: BTreeMap<String, String>,
}

impl ResolvedEnv {
    /// Create an empty environment.
    pub fn new() -> Self {
        ResolvedEnv {
            vars: BTreeMap::new(),
        }
    }

    /// Merge ambient environment entries with explicit `KEY=VALUE` tokens.
    ///
    /// Tokens seed the result (the last token for a key wins); ambient
    /// entries only fill keys no token set. Tokens without `=` are ignored.
    pub fn merge<A, K, V, T, S>(ambient: A, tokens: T) -> Self
    where
        A: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
        T: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut env = ResolvedEnv::new();

        for token in tokens {
            if let Some((key, value)) = parse_token(token.as_ref()) {
                env.set(key, value);
            }
        }

        for (key, value) in ambient {
            env.fill(key, value);
        }

        env
    }

    /// Look up a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Check whether a key is present (an empty value still counts).
    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// Set `key` only if it is not already present.
    ///
    /// Returns `true` if the value was inserted.
    pub fn fill(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        if self.vars.contains_key(&key) {
            return false;
        }
        self.vars.insert(key, value.into());
        true
    }

    /// Set `key`, replacing any existing value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether the environment is empty.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ResolvedEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut env = ResolvedEnv::new();
        for (key, value) in iter {
            env.set(key, value);
        }
        env
    }
}

/// Split a `KEY=VALUE` token at the first `=`.
fn parse_token(token: &str) -> Option<(&str, &str)> {
    match token.split_once('=') {
        Some((key, value)) if !key.is_empty() => Some((key, value)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ambient(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_token() {
        assert_eq!(parse_token("CXX=g++"), Some(("CXX", "g++")));
        assert_eq!(parse_token("FLAGS=-DX=1"), Some(("FLAGS", "-DX=1")));
        assert_eq!(parse_token("EMPTY="), Some(("EMPTY", "")));
        assert_eq!(parse_token("noequals"), None);
        assert_eq!(parse_token("=value"), None);
    }

    #[test]
    fn test_token_wins_over_ambient() {
        let env = ResolvedEnv::merge(
            ambient(&[("CXX", "clang++"), ("AR", "ar")]),
            ["CXX=g++-9"],
        );
        assert_eq!(env.get("CXX"), Some("g++-9"));
        assert_eq!(env.get("AR"), Some("ar"));
    }

    #[test]
    fn test_precedence_holds_for_every_shared_key() {
        let keys = ["CXX", "HDF5_INC", "HDF5_LIB", "PREFIX", "nohdf", "X"];
        let values = ["", "/a", "a b c", "=", "x=y=z"];

        for key in keys {
            for value in values {
                let token = format!("{}={}", key, value);
                let env = ResolvedEnv::merge(ambient(&[(key, "ambient-value")]), [token]);
                assert_eq!(env.get(key), Some(value), "key {key} value {value:?}");
            }
        }
    }

    #[test]
    fn test_last_token_wins() {
        let env = ResolvedEnv::merge(Vec::<(String, String)>::new(), ["A=1", "B=2", "A=3"]);
        assert_eq!(env.get("A"), Some("3"));
        assert_eq!(env.get("B"), Some("2"));
        assert_eq!(env.len(), 2);
    }

    #[test]
    fn test_tokens_without_equals_are_ignored() {
        let env = ResolvedEnv::merge(Vec::<(String, String)>::new(), ["all", "-j4", "A=1"]);
        assert_eq!(env.len(), 1);
        assert!(env.contains("A"));
    }

    #[test]
    fn test_fill_does_not_override() {
        let mut env: ResolvedEnv = [("SH_LIB_EXT", ".so.1")].into_iter().collect();
        assert!(!env.fill("SH_LIB_EXT", ".dylib"));
        assert!(env.fill("SET_LIB_NAME", "-soname"));
        assert_eq!(env.get("SH_LIB_EXT"), Some(".so.1"));
        assert_eq!(env.get("SET_LIB_NAME"), Some("-soname"));
    }
}
