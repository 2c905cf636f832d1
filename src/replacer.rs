//! Runtime placeholder resolution for configuration values.
//!
//! Configured values may embed `{key}` placeholders, e.g. `{env.API_TOKEN}`,
//! that are resolved once at startup. Static mappings are checked before
//! providers; a key nobody can resolve becomes the caller-supplied fallback.

use std::collections::HashMap;
use std::fmt;

type Provider = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

pub struct Replacer {
    statics: HashMap<String, String>,
    providers: Vec<Provider>,
}

impl Replacer {
    /// A replacer that knows the process environment as `{env.NAME}`.
    pub fn new() -> Self {
        let mut repl = Self::empty();
        repl.provider(|key| {
            key.strip_prefix("env.")
                .and_then(|name| std::env::var(name).ok())
        });
        repl
    }

    /// A replacer with no mappings at all.
    pub fn empty() -> Self {
        Self {
            statics: HashMap::new(),
            providers: Vec::new(),
        }
    }

    /// Register a fixed mapping. Checked before any provider.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.statics.insert(key.into(), value.into());
    }

    /// Register a dynamic lookup, consulted in registration order.
    pub fn provider<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.providers.push(Box::new(lookup));
    }

    fn resolve(&self, key: &str) -> Option<String> {
        if let Some(value) = self.statics.get(key) {
            return Some(value.clone());
        }
        self.providers.iter().find_map(|lookup| lookup(key))
    }

    /// Substitute every `{key}` in `input`, resolving each key exactly once.
    ///
    /// Unknown keys become `fallback`. A brace escaped as `\{` stays a
    /// literal `{`, and a `{` with no closing brace is left untouched.
    pub fn replace_all(&self, input: &str, fallback: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(open) = rest.find('{') {
            if open > 0 && rest.as_bytes()[open - 1] == b'\\' {
                out.push_str(&rest[..open - 1]);
                out.push('{');
                rest = &rest[open + 1..];
                continue;
            }

            out.push_str(&rest[..open]);
            let Some(close) = rest[open + 1..].find('}') else {
                // No closing brace: not a placeholder.
                out.push_str(&rest[open..]);
                return out;
            };

            let key = &rest[open + 1..open + 1 + close];
            match self.resolve(key) {
                Some(value) => out.push_str(&value),
                None => out.push_str(fallback),
            }
            rest = &rest[open + 1 + close + 1..];
        }

        out.push_str(rest);
        out
    }
}

impl Default for Replacer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Replacer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Replacer")
            .field("statics", &self.statics.len())
            .field("providers", &self.providers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_static_mappings() {
        let mut repl = Replacer::empty();
        repl.set("realm", "Restricted");
        assert_eq!(repl.replace_all("realm={realm}", ""), "realm=Restricted");
    }

    #[test]
    fn unknown_key_becomes_fallback() {
        let repl = Replacer::empty();
        assert_eq!(repl.replace_all("a{nope}b", ""), "ab");
        assert_eq!(repl.replace_all("{nope}", "-"), "-");
    }

    #[test]
    fn statics_win_over_providers() {
        let mut repl = Replacer::empty();
        repl.provider(|_| Some("from-provider".to_string()));
        repl.set("key", "from-static");
        assert_eq!(repl.replace_all("{key}", ""), "from-static");
    }

    #[test]
    fn providers_are_consulted_in_order() {
        let mut repl = Replacer::empty();
        repl.provider(|key| (key == "first").then(|| "1".to_string()));
        repl.provider(|_| Some("2".to_string()));
        assert_eq!(repl.replace_all("{first}{other}", ""), "12");
    }

    #[test]
    fn resolves_process_environment() {
        let path = std::env::var("PATH").unwrap_or_default();
        let repl = Replacer::new();
        assert_eq!(repl.replace_all("{env.PATH}", ""), path);
        assert_eq!(repl.replace_all("{env.APIPASS_SURELY_UNSET_9321}", ""), "");
    }

    #[test]
    fn escaped_brace_stays_literal() {
        let mut repl = Replacer::empty();
        repl.set("key", "value");
        assert_eq!(repl.replace_all(r"\{key}", ""), "{key}");
    }

    #[test]
    fn unclosed_brace_is_left_alone() {
        let repl = Replacer::empty();
        assert_eq!(repl.replace_all("abc{def", ""), "abc{def");
    }

    #[test]
    fn resolves_multiple_placeholders() {
        let mut repl = Replacer::empty();
        repl.set("a", "1");
        repl.set("b", "2");
        assert_eq!(repl.replace_all("{a}-{b}-{c}", "x"), "1-2-x");
    }
}
