//! Synchronous message lookup, routed by path pattern.
//!
//! Handlers are registered per pattern (`"error/#"`, `"ui/login/title"`)
//! and receive the matched path, parsed query arguments and the current
//! locale. Lookups use URL form: `"error/required?field=Nome"`.

use std::sync::{Arc, RwLock};

use crate::pattern;

/// Parsed `key=value&key2=value2` arguments.
#[derive(Debug, Clone, Default)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn parse(query: &str) -> Self {
        Self(
            query
                .split('&')
                .filter_map(|pair| pair.split_once('='))
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A translation handler.
pub trait I18nHandler: Send + Sync + 'static {
    fn translate(&self, path: &str, query: &QueryParams, locale: &str) -> String;
}

impl<F> I18nHandler for F
where
    F: Fn(&str, &QueryParams, &str) -> String + Send + Sync + 'static,
{
    fn translate(&self, path: &str, query: &QueryParams, locale: &str) -> String {
        (self)(path, query, locale)
    }
}

pub struct I18nStore {
    handlers: RwLock<Vec<(String, Arc<dyn I18nHandler>)>>,
    locale: RwLock<String>,
}

impl I18nStore {
    pub fn new(locale: &str) -> Self {
        Self {
            handlers: RwLock::new(Vec::new()),
            locale: RwLock::new(locale.to_string()),
        }
    }

    pub fn handle(&self, pattern: &str, handler: Arc<dyn I18nHandler>) {
        self.handlers
            .write()
            .unwrap()
            .push((pattern.to_string(), handler));
    }

    /// Translate `url`. The first registered matching handler wins; with no
    /// match the bare path is returned.
    pub fn get(&self, url: &str) -> String {
        let (path, query) = url.split_once('?').unwrap_or((url, ""));
        let params = QueryParams::parse(query);
        let locale = self.locale();

        let handler = self
            .handlers
            .read()
            .unwrap()
            .iter()
            .find(|(p, _)| pattern::matches(p, path))
            .map(|(_, h)| Arc::clone(h));
        match handler {
            Some(h) => h.translate(path, &params, &locale),
            None => path.to_string(),
        }
    }

    pub fn set_locale(&self, locale: &str) {
        *self.locale.write().unwrap() = locale.to_string();
    }

    pub fn locale(&self) -> String {
        self.locale.read().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> I18nStore {
        let i18n = I18nStore::new("pt-BR");
        i18n.handle(
            "greet/#",
            Arc::new(|path: &str, q: &QueryParams, locale: &str| {
                let name = q.get("name").unwrap_or("?");
                match locale {
                    "en" => format!("hello {name} ({path})"),
                    _ => format!("olá {name} ({path})"),
                }
            }),
        );
        i18n
    }

    #[test]
    fn query_args_reach_handler() {
        assert_eq!(store().get("greet/user?name=Ana"), "olá Ana (greet/user)");
    }

    #[test]
    fn locale_switch_applies_to_next_lookup() {
        let i18n = store();
        i18n.set_locale("en");
        assert_eq!(i18n.get("greet/x?name=Bo"), "hello Bo (greet/x)");
        assert_eq!(i18n.locale(), "en");
    }

    #[test]
    fn unmatched_path_echoes() {
        assert_eq!(store().get("ui/missing?x=1"), "ui/missing");
    }

    #[test]
    fn params_parse_skips_malformed_pairs() {
        let q = QueryParams::parse("a=1&junk&b=2");
        assert_eq!(q.get("a"), Some("1"));
        assert_eq!(q.get("b"), Some("2"));
        assert_eq!(q.get("junk"), None);
        assert!(QueryParams::parse("").is_empty());
    }
}
