use std::collections::BTreeMap;

/// Cookie overriding language, region and time zone so that ages come back in
/// the German phrasing [`crate::age`] understands.
pub const GERMAN_LOCALE_PREF: &str = "f6=40000000&tz=Europe.Berlin&hl=de&gl=DE";

const PREF: &str = "PREF";

/// Cookies sent with every results request of one topic set.
///
/// Typically harvested from a browser the operator used to accept the consent
/// dialog, then overlaid with the locale cookie.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchSession {
    cookies: BTreeMap<String, String>,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cookies(cookies: BTreeMap<String, String>) -> Self {
        Self { cookies }
    }

    /// Replace any `PREF` cookie with `pref`.
    ///
    /// ```
    /// use tally_youtube::session::{SearchSession, GERMAN_LOCALE_PREF};
    ///
    /// let session = SearchSession::new().with_locale(GERMAN_LOCALE_PREF);
    /// assert_eq!(
    ///     session.cookie_header().as_deref(),
    ///     Some("PREF=f6=40000000&tz=Europe.Berlin&hl=de&gl=DE")
    /// );
    /// ```
    pub fn with_locale(mut self, pref: &str) -> Self {
        self.cookies.insert(PREF.to_string(), pref.to_string());
        self
    }

    pub fn cookies(&self) -> &BTreeMap<String, String> {
        &self.cookies
    }

    /// `Cookie` header value, or `None` without cookies.
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        let pairs: Vec<String> = self
            .cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        Some(pairs.join("; "))
    }
}
