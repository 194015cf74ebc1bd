// SPDX-License-Identifier: MPL-2.0
//! Client startup: pick the language once, load its catalogs and resolve the
//! configuration.
//!
//! The resulting [`ClientSession`] carries everything the UI layer needs and
//! replaces process-wide translation functions that only become usable after
//! a load callback fires.

use crate::config::{
    Configuration, I18nOptions, Registry, ResolvedClient, DEFAULT_FALLBACK_LANGUAGE,
};
use crate::detect::{BrowserContext, CookieJar, DetectionSource, LanguageDetector};
use crate::error::Result;
use crate::i18n::{ResourceLoader, Translator};
use crate::locale::{LocaleCatalog, LocaleDictionary, LocaleTag};
use std::sync::Arc;
use tracing::{debug, info};

/// Why a language was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageOrigin {
    /// Set by `i18n.lng` in the configuration.
    Forced,
    Detected(DetectionSource),
    /// Nothing detected; the configured fallback language.
    Fallback,
}

/// Picks the session language: forced, detected, or fallback.
pub fn select_language(
    config: &Configuration,
    context: &BrowserContext,
) -> (LocaleTag, LanguageOrigin) {
    if let Some(forced) = &config.i18n.lng {
        return (forced.clone(), LanguageOrigin::Forced);
    }
    let detector = LanguageDetector::new(config.detection_options());
    match detector.detect_with_source(context) {
        Some((tag, source)) => (tag, LanguageOrigin::Detected(source)),
        None => (config.i18n.fallback_lng.clone(), LanguageOrigin::Fallback),
    }
}

/// Translation options for a session: the deployment language given by
/// `locale_short` is always preloaded.
pub fn session_options(config: &Configuration) -> I18nOptions {
    let mut options = config.i18n.clone();
    if !options.preload.contains(&config.locale_short) {
        options.preload.push(config.locale_short.clone());
    }
    options
}

fn locale_catalog(config: &Configuration) -> Result<LocaleCatalog> {
    LocaleCatalog::bundled(config.i18n.fallback_lng.clone())
        .or_else(|_| LocaleCatalog::bundled(LocaleTag::from_static(DEFAULT_FALLBACK_LANGUAGE)))
}

/// A started client: configuration, language and loaded translations.
#[derive(Debug)]
pub struct ClientSession {
    config: Configuration,
    language: LocaleTag,
    origin: LanguageOrigin,
    translator: Translator,
    locales: LocaleCatalog,
    resolved: ResolvedClient,
}

impl ClientSession {
    /// Starts a session, loading catalogs on the calling thread.
    ///
    /// # Errors
    ///
    /// Fails when the configuration does not resolve against `registry` or a
    /// catalog exists but cannot be read.
    pub fn start(
        config: Configuration,
        context: &BrowserContext,
        loader: &dyn ResourceLoader,
        registry: &Registry,
    ) -> Result<Self> {
        let resolved = registry.resolve(&config)?;
        let (language, origin) = select_language(&config, context);
        let translator = Translator::load(language.clone(), session_options(&config), loader)?;
        Self::assemble(config, language, origin, translator, resolved)
    }

    /// Starts a session, loading catalogs on the blocking thread pool.
    ///
    /// # Errors
    ///
    /// Same as [`start`](Self::start).
    pub async fn start_async(
        config: Configuration,
        context: &BrowserContext,
        loader: Arc<dyn ResourceLoader>,
        registry: &Registry,
    ) -> Result<Self> {
        let resolved = registry.resolve(&config)?;
        let (language, origin) = select_language(&config, context);
        let translator =
            Translator::load_async(language.clone(), session_options(&config), loader).await?;
        Self::assemble(config, language, origin, translator, resolved)
    }

    fn assemble(
        config: Configuration,
        language: LocaleTag,
        origin: LanguageOrigin,
        translator: Translator,
        resolved: ResolvedClient,
    ) -> Result<Self> {
        let locales = locale_catalog(&config)?;
        info!(language = %language, ?origin, "client session started");
        Ok(Self {
            config,
            language,
            origin,
            translator,
            locales,
            resolved,
        })
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn language(&self) -> &LocaleTag {
        &self.language
    }

    pub fn origin(&self) -> LanguageOrigin {
        self.origin
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    pub fn resolved(&self) -> &ResolvedClient {
        &self.resolved
    }

    /// Locale profile of the session language, or the default profile.
    pub fn locale(&self) -> &LocaleDictionary {
        self.locales.get(&self.language)
    }

    /// Whether distances should be shown in metric units. A locale profile
    /// that matches the session language wins over the configuration flag.
    pub fn use_metric(&self) -> bool {
        self.locales
            .find(&self.language)
            .map_or(self.config.metric, |(_, profile)| profile.use_metric)
    }

    /// Travel-mode labels in the session language.
    pub fn mode_labels(&self) -> Vec<(String, String)> {
        self.config.mode_labels(&self.translator)
    }

    /// `(module id, translated title)` pairs for the module selector.
    pub fn module_titles(&self) -> Vec<(String, String)> {
        self.resolved
            .modules()
            .iter()
            .map(|module| {
                (
                    module.id().to_string(),
                    self.translator.translate(module.title_key(), &[]),
                )
            })
            .collect()
    }

    /// Remembers an explicit language choice in `jar` and returns the link
    /// that reloads the client in that language.
    pub fn switch_language(&self, language: &LocaleTag, jar: &mut CookieJar) -> String {
        let options = &self.config.i18n;
        if options.use_cookie {
            let set_cookie = jar.create(
                &options.cookie_name,
                language.as_str(),
                options.cookie_expiration_minutes,
                options.cookie_domain.as_deref(),
            );
            debug!(%set_cookie, "language choice stored");
        }
        self.config.language_switch_link(language)
    }
}
