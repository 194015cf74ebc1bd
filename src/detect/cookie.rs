// SPDX-License-Identifier: MPL-2.0
//! A small cookie jar mirroring what a page sees through `document.cookie`.
//!
//! Writing goes through `Set-Cookie`-style strings so the exact string handed
//! to the browser (or an HTTP response) can be inspected. Reading works on the
//! rendered `name=value; other=value` header.

use chrono::{DateTime, TimeDelta, Utc};
use tracing::debug;

const EXPIRES_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// `Fri, 31 Dec 9999 23:59:59 GMT`, the latest date browsers accept.
const LATEST_EXPIRY_SECS: i64 = 253_402_300_799;

/// Expiry date for a lifetime in minutes, clamped between the epoch and the
/// latest representable cookie date.
fn expiry(now: DateTime<Utc>, minutes: i64) -> Option<DateTime<Utc>> {
    let earliest = DateTime::from_timestamp(0, 0)?;
    let latest = DateTime::from_timestamp(LATEST_EXPIRY_SECS, 0)?;
    let at = TimeDelta::try_minutes(minutes).and_then(|delta| now.checked_add_signed(delta));
    Some(match at {
        Some(at) => at.clamp(earliest, latest),
        None if minutes > 0 => latest,
        None => earliest,
    })
}

/// Builds a `Set-Cookie`-style string.
///
/// `path=/` is always present. The `expires` segment is only emitted for a
/// non-zero lifetime, the `domain` segment only when a domain is given.
pub fn set_cookie_string(
    name: &str,
    value: &str,
    minutes: Option<i64>,
    domain: Option<&str>,
    now: DateTime<Utc>,
) -> String {
    let expires = match minutes {
        Some(minutes) if minutes != 0 => expiry(now, minutes)
            .map(|at| format!("; expires={}", at.format(EXPIRES_FORMAT)))
            .unwrap_or_default(),
        _ => String::new(),
    };
    let domain = domain
        .filter(|d| !d.is_empty())
        .map(|d| format!("domain={};", d))
        .unwrap_or_default();
    format!("{}={}{};{}path=/", name, value, expires, domain)
}

/// Finds `name` in a cookie header.
///
/// Leading spaces of each pair are skipped and the pair must start with the
/// exact `name=` prefix.
pub fn read_header(header: &str, name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    header
        .split(';')
        .map(|pair| pair.trim_start_matches(' '))
        .find_map(|pair| pair.strip_prefix(prefix.as_str()))
        .map(str::to_string)
}

/// Cookies visible to the current page, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieJar {
    entries: Vec<(String, String)>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a jar from a `document.cookie`-style header.
    pub fn from_header(header: &str) -> Self {
        let entries = header
            .split(';')
            .map(|pair| pair.trim_start_matches(' '))
            .filter_map(|pair| pair.split_once('='))
            .filter(|(name, _)| !name.is_empty())
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        Self { entries }
    }

    /// Renders the jar the way `document.cookie` reads.
    pub fn header(&self) -> String {
        self.entries
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Writes a cookie and returns the `Set-Cookie` string that was applied.
    ///
    /// A negative lifetime produces an already-expired cookie, which removes
    /// any existing entry of that name.
    pub fn create(
        &mut self,
        name: &str,
        value: &str,
        minutes: Option<i64>,
        domain: Option<&str>,
    ) -> String {
        let set_cookie = set_cookie_string(name, value, minutes, domain, Utc::now());
        self.apply(&set_cookie);
        set_cookie
    }

    /// Applies a `Set-Cookie` string to the jar.
    pub fn apply(&mut self, set_cookie: &str) {
        let mut segments = set_cookie.split(';');
        let Some((name, value)) = segments.next().and_then(|pair| pair.split_once('=')) else {
            return;
        };
        let expired = segments
            .map(|segment| segment.trim_start())
            .filter_map(|segment| segment.strip_prefix("expires="))
            .filter_map(|date| DateTime::parse_from_rfc2822(date).ok())
            .any(|at| at.with_timezone(&Utc) <= Utc::now());

        self.entries.retain(|(existing, _)| existing != name);
        if expired {
            debug!(cookie = name, "cookie expired");
        } else {
            self.entries.push((name.to_string(), value.to_string()));
        }
    }

    pub fn read(&self, name: &str) -> Option<String> {
        read_header(&self.header(), name)
    }

    pub fn remove(&mut self, name: &str) {
        self.create(name, "", Some(-1), None);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn set_cookie_without_expiry_or_domain() {
        let s = set_cookie_string("i18next", "de", None, None, fixed_now());
        assert_eq!(s, "i18next=de;path=/");
    }

    #[test]
    fn set_cookie_with_expiry_and_domain() {
        let s = set_cookie_string("i18next", "de", Some(60), Some("example.org"), fixed_now());
        assert_eq!(
            s,
            "i18next=de; expires=Fri, 01 Mar 2024 13:00:00 GMT;domain=example.org;path=/"
        );
    }

    #[test]
    fn huge_lifetime_is_clamped_to_latest_date() {
        let s = set_cookie_string("i18next", "de", Some(200_000_000_000), None, fixed_now());
        assert_eq!(s, "i18next=de; expires=Fri, 31 Dec 9999 23:59:59 GMT;path=/");
        let s = set_cookie_string("i18next", "de", Some(i64::MAX), None, fixed_now());
        assert!(s.contains("expires=Fri, 31 Dec 9999 23:59:59 GMT"));
    }

    #[test]
    fn huge_lifetimes_keep_or_drop_the_cookie() {
        let mut jar = CookieJar::new();
        jar.create("i18next", "de", Some(200_000_000_000), None);
        assert_eq!(jar.read("i18next").as_deref(), Some("de"));
        jar.create("i18next", "de", Some(i64::MIN), None);
        assert_eq!(jar.read("i18next"), None);
    }

    #[test]
    fn zero_minutes_is_a_session_cookie() {
        let s = set_cookie_string("x", "1", Some(0), None, fixed_now());
        assert!(!s.contains("expires"));
    }

    #[test]
    fn create_then_read_round_trips() {
        let mut jar = CookieJar::new();
        jar.create("x", "1", Some(60), None);
        assert_eq!(jar.read("x").as_deref(), Some("1"));
    }

    #[test]
    fn remove_then_read_yields_none() {
        let mut jar = CookieJar::new();
        jar.create("x", "1", Some(60), None);
        jar.remove("x");
        assert_eq!(jar.read("x"), None);
        assert!(jar.is_empty());
    }

    #[test]
    fn read_matches_exact_name_prefix() {
        let jar = CookieJar::from_header("xlang=fr;  lang=de; lang2=it");
        assert_eq!(jar.read("lang").as_deref(), Some("de"));
        assert_eq!(jar.read("ang"), None);
    }

    #[test]
    fn header_round_trips_through_jar() {
        let jar = CookieJar::from_header("a=1; b=2");
        assert_eq!(jar.header(), "a=1; b=2");
    }

    #[test]
    fn rewriting_a_cookie_replaces_it() {
        let mut jar = CookieJar::new();
        jar.create("lang", "de", None, None);
        jar.create("lang", "sl", None, None);
        assert_eq!(jar.header(), "lang=sl");
    }

    #[test]
    fn read_header_keeps_empty_values() {
        assert_eq!(read_header("x=", "x").as_deref(), Some(""));
    }
}
