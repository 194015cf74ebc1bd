// SPDX-License-Identifier: MPL-2.0
use std::fs;
use tempfile::tempdir;
use tripplan_client::bootstrap::{ClientSession, LanguageOrigin};
use tripplan_client::config::{self, Configuration, Registry};
use tripplan_client::detect::{BrowserContext, CookieJar, DetectionSource, LanguageDetector};
use tripplan_client::i18n::{EmbeddedResources, FileResources};
use tripplan_client::locale::LocaleTag;

#[test]
fn test_language_change_via_config() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let config_path = dir.path().join("client.toml");

    let mut config = Configuration::default();
    config.i18n.lng = Some("it".parse().expect("valid tag"));
    config::save_to_path(&config, &config_path).expect("Failed to write config file");

    let loaded = config::load_from_path(&config_path).expect("Failed to load config");
    let session = ClientSession::start(
        loaded,
        &BrowserContext::default().with_search("?setLng=de"),
        &EmbeddedResources,
        &Registry::with_builtins(),
    )
    .expect("session starts");
    assert_eq!(session.language().as_str(), "it");
    assert_eq!(session.origin(), LanguageOrigin::Forced);
    assert_eq!(session.locale().time.date_format, "DD/MM/YYYY");

    config.i18n.lng = None;
    config::save_to_path(&config, &config_path).expect("Failed to rewrite config file");
    let loaded = config::load_from_path(&config_path).expect("Failed to reload config");
    let session = ClientSession::start(
        loaded,
        &BrowserContext::default().with_search("?setLng=de"),
        &EmbeddedResources,
        &Registry::with_builtins(),
    )
    .expect("session starts");
    assert_eq!(session.language().as_str(), "de");
}

#[test]
fn test_invalid_config_file_falls_back_to_defaults() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let config_path = dir.path().join("client.toml");
    fs::write(&config_path, "modules = \"not a list").expect("Failed to write file");

    let loaded = config::load_from_path(&config_path).expect("Invalid TOML is not an error");
    assert_eq!(loaded, Configuration::default());
}

#[test]
fn test_catalogs_read_from_disk() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let locale_dir = dir.path().join("locale");
    fs::create_dir_all(&locale_dir).expect("Failed to create locale dir");
    fs::write(
        locale_dir.join("fr.json"),
        r#"{"Transit": "Transports en commun", "Walk Only": ""}"#,
    )
    .expect("Failed to write fr catalog");
    fs::write(locale_dir.join("en.json"), r#"{"Walk Only": "On foot"}"#)
        .expect("Failed to write en catalog");

    let config = Configuration::default();
    let loader = FileResources::new(dir.path(), config.i18n.res_get_path.clone());
    let session = ClientSession::start(
        config,
        &BrowserContext::default().with_language("fr-CA"),
        &loader,
        &Registry::with_builtins(),
    )
    .expect("session starts");

    assert_eq!(session.language().as_str(), "fr-CA");
    let t = session.translator();
    assert_eq!(t.translate("Transit", &[]), "Transports en commun");
    // empty strings fall through to the fallback language by default
    assert_eq!(t.translate("Walk Only", &[]), "On foot");
    assert_eq!(t.translate("Drive Only", &[]), "Drive Only");
}

#[test]
fn test_cookie_remembers_choice_across_visits() {
    let session = ClientSession::start(
        Configuration::default(),
        &BrowserContext::default(),
        &EmbeddedResources,
        &Registry::with_builtins(),
    )
    .expect("session starts");

    let mut jar = CookieJar::new();
    let link = session.switch_language(&LocaleTag::new("ca_ES").expect("valid tag"), &mut jar);
    assert_eq!(link, "?setLng=ca_ES");

    let visit = BrowserContext::default()
        .with_cookie(jar.header())
        .with_language("de");
    let detector = LanguageDetector::new(session.config().detection_options());
    let (tag, source) = detector.detect_with_source(&visit).expect("cookie detected");
    assert_eq!(tag.as_str(), "ca_ES");
    assert_eq!(source, DetectionSource::Cookie);

    let next = ClientSession::start(
        Configuration::default(),
        &visit,
        &EmbeddedResources,
        &Registry::with_builtins(),
    )
    .expect("session starts");
    assert_eq!(next.locale().display_name, "Català");
    assert_eq!(next.locale().minutes_label(2, true), Some("mins"));
}

#[test]
fn test_query_string_beats_cookie_and_environment() {
    let detector = LanguageDetector::new(Configuration::default().detection_options());
    let visit = BrowserContext::default()
        .with_search("?foo=1&setLng=sl")
        .with_cookie("i18next=de")
        .with_language("it");
    assert_eq!(detector.detect(&visit).map(|t| t.to_string()), Some("sl".to_string()));

    let without_query = visit.clone().with_search("?setLng=");
    assert_eq!(
        detector.detect(&without_query).map(|t| t.to_string()),
        Some("de".to_string())
    );
}

#[tokio::test]
async fn test_async_session_with_disk_catalogs() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let locale_dir = dir.path().join("locale");
    fs::create_dir_all(&locale_dir).expect("Failed to create locale dir");
    fs::write(locale_dir.join("sl.json"), r#"{"About": "O aplikaciji"}"#)
        .expect("Failed to write sl catalog");

    let config = Configuration::default();
    let loader = std::sync::Arc::new(FileResources::new(
        dir.path(),
        config.i18n.res_get_path.clone(),
    ));
    let session = ClientSession::start_async(
        config,
        &BrowserContext::default().with_search("?setLng=sl"),
        loader,
        &Registry::with_builtins(),
    )
    .await
    .expect("async session");
    assert_eq!(session.translator().translate("About", &[]), "O aplikaciji");
}
