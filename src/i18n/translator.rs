// SPDX-License-Identifier: MPL-2.0
use super::plural::{plural_category, PluralCategory};
use super::resources::ResourceLoader;
use super::sprintf::{sprintf, FormatValue, Values};
use crate::config::defaults::{CONTEXT_SEPARATOR, PLURAL_SUFFIX, SPRINTF_PROCESSOR};
use crate::config::I18nOptions;
use crate::error::{Error, Result};
use crate::locale::LocaleTag;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// A named transformation applied to a looked-up string.
///
/// Receives the translated value, the key and the lookup options.
pub type PostProcessor = Arc<dyn Fn(&str, &str, &LookupOptions) -> String + Send + Sync>;

/// Options of a single lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupOptions {
    /// Selects the plural form.
    pub count: Option<i64>,
    /// Disambiguates keys that translate differently depending on use.
    pub context: Option<String>,
    /// Post-processors to run, in order.
    pub post_process: Vec<String>,
    /// Values for the `sprintf` post-processor.
    pub values: Values,
    /// Returned when no catalog has the key.
    pub default_value: Option<String>,
}

impl LookupOptions {
    fn with_sprintf(values: Values) -> Self {
        Self {
            post_process: vec![SPRINTF_PROCESSOR.to_string()],
            values,
            ..Self::default()
        }
    }
}

/// Loaded translation catalogs for one language plus its fallbacks.
///
/// A `Translator` only exists once its catalogs are loaded, so every method
/// is usable right away. It is immutable after loading and can be shared
/// between threads.
#[derive(Clone)]
pub struct Translator {
    language: LocaleTag,
    /// Languages searched by lookups, most specific first.
    chain: Vec<LocaleTag>,
    options: I18nOptions,
    /// language → namespace → catalog
    catalogs: HashMap<LocaleTag, HashMap<String, Value>>,
    post_processors: HashMap<String, PostProcessor>,
}

impl fmt::Debug for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut loaded: Vec<_> = self.catalogs.keys().map(LocaleTag::as_str).collect();
        loaded.sort_unstable();
        let mut processors: Vec<_> = self.post_processors.keys().collect();
        processors.sort_unstable();
        f.debug_struct("Translator")
            .field("language", &self.language)
            .field("chain", &self.chain)
            .field("loaded", &loaded)
            .field("post_processors", &processors)
            .finish()
    }
}

impl Translator {
    /// Loads the catalogs needed for `language` and returns a ready
    /// translator.
    ///
    /// Loaded languages are `language`, its spelling with the other
    /// separator, its primary subtag, regional catalogs of the same language
    /// the loader knows of, the fallback language and every preloaded
    /// language, in every configured namespace. Missing or malformed catalogs
    /// are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error only when a loader fails to read an existing catalog.
    pub fn load(
        language: LocaleTag,
        options: I18nOptions,
        loader: &dyn ResourceLoader,
    ) -> Result<Self> {
        let mut catalogs: HashMap<LocaleTag, HashMap<String, Value>> = HashMap::new();
        let chain = language_chain(&language, &options.fallback_lng, &loader.languages());
        let mut to_load = chain.clone();
        for extra in &options.preload {
            if !to_load.contains(extra) {
                to_load.push(extra.clone());
            }
        }

        for lng in &to_load {
            for ns in &options.namespaces {
                let Some(text) = loader.load(lng, ns)? else {
                    debug!(language = %lng, namespace = %ns, "no catalog");
                    continue;
                };
                match serde_json::from_str::<Value>(&text) {
                    Ok(catalog @ Value::Object(_)) => {
                        catalogs
                            .entry(lng.clone())
                            .or_default()
                            .insert(ns.clone(), catalog);
                    }
                    Ok(_) => warn!(language = %lng, namespace = %ns, "catalog is not an object"),
                    Err(err) => warn!(language = %lng, namespace = %ns, %err, "malformed catalog"),
                }
            }
        }

        if !catalogs.contains_key(&options.fallback_lng) {
            warn!(fallback = %options.fallback_lng, "fallback catalog missing");
        }
        debug!(language = %language, loaded = catalogs.len(), "translations loaded");

        let mut translator = Self {
            language,
            chain,
            options,
            catalogs,
            post_processors: HashMap::new(),
        };
        translator.add_post_processor(SPRINTF_PROCESSOR, |value, _key, options| {
            if options.values.is_empty() {
                value.to_string()
            } else {
                sprintf(value, &options.values)
            }
        });
        Ok(translator)
    }

    /// Loads on the blocking thread pool and resolves once every catalog is
    /// in memory.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load); a panicking loader is reported as
    /// [`Error::Resource`].
    pub async fn load_async(
        language: LocaleTag,
        options: I18nOptions,
        loader: Arc<dyn ResourceLoader>,
    ) -> Result<Self> {
        tokio::task::spawn_blocking(move || Self::load(language, options, loader.as_ref()))
            .await
            .map_err(|err| Error::Resource(format!("catalog loading aborted: {}", err)))?
    }

    /// Registers a named post-processor, replacing one with the same name.
    pub fn add_post_processor<F>(&mut self, name: &str, processor: F)
    where
        F: Fn(&str, &str, &LookupOptions) -> String + Send + Sync + 'static,
    {
        self.post_processors
            .insert(name.to_string(), Arc::new(processor));
    }

    pub fn language(&self) -> &LocaleTag {
        &self.language
    }

    pub fn options(&self) -> &I18nOptions {
        &self.options
    }

    /// Whether any catalog was loaded for `lng`.
    pub fn has_catalog(&self, lng: &LocaleTag) -> bool {
        self.catalogs.contains_key(lng)
    }

    /// The lookup primitive behind every translation call.
    ///
    /// Resolution order: language chain (requested, primary subtag,
    /// fallback), and for each language the context and plural variants of
    /// the key. Unresolved keys yield the default value or the key itself.
    pub fn t(&self, key: &str, options: &LookupOptions) -> String {
        let (ns, bare_key) = self.split_namespace(key);
        let found = self.find(ns, bare_key, options.context.as_deref(), options.count);
        let value = found
            .or_else(|| options.default_value.clone())
            .unwrap_or_else(|| bare_key.to_string());
        self.post_process(value, key, options)
    }

    /// Translates `key`, substituting positional `values` when given.
    pub fn translate(&self, key: &str, values: &[FormatValue]) -> String {
        self.translate_with(key, Values::Positional(values.to_vec()))
    }

    /// Translates `key`, substituting positional or named `values`.
    pub fn translate_with(&self, key: &str, values: Values) -> String {
        if key.is_empty() {
            error!("translate called without a key");
            return String::new();
        }
        if values.is_empty() {
            return self.t(key, &LookupOptions::default());
        }
        self.t(key, &LookupOptions::with_sprintf(values))
    }

    /// Translates a countable message. `count` selects the plural form and is
    /// the sole substitution value. `plural` is returned when no catalog has
    /// a translation and `count` calls for a plural form.
    pub fn translate_plural(&self, singular: &str, plural: &str, count: i64) -> String {
        self.plural_lookup(None, singular, plural, count)
    }

    /// Translates `key` in a disambiguating `context`.
    pub fn translate_with_context(&self, context: &str, key: &str) -> String {
        self.t(
            key,
            &LookupOptions {
                context: Some(context.to_string()),
                ..LookupOptions::default()
            },
        )
    }

    /// Combination of [`translate_plural`](Self::translate_plural) and
    /// [`translate_with_context`](Self::translate_with_context).
    pub fn translate_plural_with_context(
        &self,
        context: &str,
        singular: &str,
        plural: &str,
        count: i64,
    ) -> String {
        self.plural_lookup(Some(context), singular, plural, count)
    }

    fn plural_lookup(&self, context: Option<&str>, singular: &str, plural: &str, count: i64) -> String {
        let is_plural = plural_category(&self.language.language(), count) != PluralCategory::One;
        let mut options = LookupOptions::with_sprintf(Values::Positional(vec![count.into()]));
        options.count = Some(count);
        options.context = context.map(str::to_string);
        if is_plural && !plural.is_empty() {
            options.default_value = Some(plural.to_string());
        }
        self.t(singular, &options)
    }

    fn split_namespace<'k>(&'k self, key: &'k str) -> (&'k str, &'k str) {
        let default_ns = self
            .options
            .namespaces
            .first()
            .map(String::as_str)
            .unwrap_or(crate::config::defaults::DEFAULT_NAMESPACE);
        let separator = self.options.ns_separator.as_str();
        if separator.is_empty() {
            return (default_ns, key);
        }
        match key.split_once(separator) {
            Some((ns, rest)) if !ns.is_empty() && !rest.is_empty() => (ns, rest),
            _ => (default_ns, key),
        }
    }

    fn find(&self, ns: &str, key: &str, context: Option<&str>, count: Option<i64>) -> Option<String> {
        for lng in &self.chain {
            let Some(catalog) = self.catalogs.get(lng).and_then(|by_ns| by_ns.get(ns)) else {
                continue;
            };
            for candidate in key_variants(key, context, count, &lng.language()) {
                if let Some(value) = self.resolve_in(catalog, &candidate) {
                    return Some(value);
                }
            }
        }
        None
    }

    fn resolve_in(&self, catalog: &Value, key: &str) -> Option<String> {
        let value = lookup_path(catalog, key, &self.options.key_separator)?;
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => return None,
        };
        if text.is_empty() && self.options.fallback_on_empty {
            return None;
        }
        Some(text)
    }

    fn post_process(&self, mut value: String, key: &str, options: &LookupOptions) -> String {
        let global = self.options.post_process.iter();
        for name in options.post_process.iter().chain(global) {
            match self.post_processors.get(name) {
                Some(processor) => value = processor(&value, key, options),
                None => warn!(processor = %name, "unknown post-processor"),
            }
        }
        value
    }
}

/// Requested language, its other-separator spelling, its primary subtag,
/// known regional variants of the same language, then the fallback.
fn language_chain(
    language: &LocaleTag,
    fallback: &LocaleTag,
    available: &[LocaleTag],
) -> Vec<LocaleTag> {
    let mut chain = vec![language.clone()];
    chain.extend(language.with_swapped_separator());
    chain.extend(language.primary_tag());

    let mut siblings: Vec<&LocaleTag> = available
        .iter()
        .filter(|candidate| candidate.is_qualified() && candidate.same_language(language))
        .collect();
    siblings.sort();
    chain.extend(siblings.into_iter().cloned());

    chain.push(fallback.clone());
    let mut seen = Vec::with_capacity(chain.len());
    chain.retain(|tag| {
        if seen.contains(tag) {
            false
        } else {
            seen.push(tag.clone());
            true
        }
    });
    chain
}

/// Keys to try in one catalog, most specific first.
fn key_variants(key: &str, context: Option<&str>, count: Option<i64>, language: &str) -> Vec<String> {
    let mut bases = Vec::with_capacity(2);
    if let Some(context) = context.filter(|c| !c.is_empty()) {
        bases.push(format!("{}{}{}", key, CONTEXT_SEPARATOR, context));
    }
    bases.push(key.to_string());

    let category = count.map(|count| plural_category(language, count));
    let mut variants = Vec::with_capacity(bases.len() * 3);
    for base in bases {
        if let Some(category) = category.filter(|c| *c != PluralCategory::One) {
            variants.push(format!("{}{}_{}", base, PLURAL_SUFFIX, category));
            variants.push(format!("{}{}", base, PLURAL_SUFFIX));
        }
        variants.push(base);
    }
    variants
}

/// Walks nested objects along `separator`-delimited segments. A flat key
/// containing the separator literally is preferred.
fn lookup_path<'v>(catalog: &'v Value, key: &str, separator: &str) -> Option<&'v Value> {
    if let Some(value) = catalog.get(key) {
        return Some(value);
    }
    if separator.is_empty() || !key.contains(separator) {
        return None;
    }
    key.split(separator)
        .try_fold(catalog, |node, segment| node.get(segment))
}
