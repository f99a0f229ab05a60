//! Locale resolution and localized message lookup.
//!
//! The request locale is negotiated from `Accept-Language` by
//! [`locale_middleware`] and kept in a tokio task-local for the duration of
//! the request. [`RequestLocaleResolver`] reads it back; outside a request
//! scope it falls back to the configured default locale.
//!
//! Messages come from per-locale JSON catalogues mapping a message code to a
//! template with positional `{0}`, `{1}` placeholders.

use axum::{
    extract::{Request, State},
    http::{HeaderValue, header},
    middleware::Next,
    response::Response,
};
use core_config::i18n::I18nConfig;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

const MESSAGES_EN: &str = include_str!("../messages/messages_en.json");
const MESSAGES_FI: &str = include_str!("../messages/messages_fi.json");

tokio::task_local! {
    static REQUEST_LOCALE: Locale;
}

/// Language tag such as `en`, `en-US` or `fi`.
///
/// The language subtag is stored lowercase and the region subtag uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale(String);

impl Locale {
    /// Parse a language tag, returning `None` for empty or wildcard tags
    pub fn parse(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        if tag.is_empty() || tag == "*" {
            return None;
        }

        let mut parts = tag.split(['-', '_']);
        let language = parts.next()?.to_ascii_lowercase();
        if language.is_empty() || !language.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }

        match parts.next() {
            Some(region) if !region.is_empty() => Some(Self(format!(
                "{}-{}",
                language,
                region.to_ascii_uppercase()
            ))),
            _ => Some(Self(language)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Language subtag, e.g. `en` for `en-US`
    pub fn language(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }

    /// The language-only locale, if this locale carries a region
    pub fn without_region(&self) -> Option<Locale> {
        (self.language() != self.0).then(|| Locale(self.language().to_string()))
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolves the locale used to localize messages
#[cfg_attr(test, mockall::automock)]
pub trait LocaleResolver: Send + Sync {
    fn current_locale(&self) -> Locale;
}

/// Looks up localized messages by code
#[cfg_attr(test, mockall::automock)]
pub trait MessageResolver: Send + Sync {
    /// Resolve `code` for `locale`, substituting `arguments`; `None` when unknown
    fn get_message(&self, code: &str, arguments: &[Value], locale: &Locale) -> Option<String>;
}

#[derive(Debug, Error)]
pub enum I18nError {
    #[error("Invalid locale tag: '{0}'")]
    InvalidLocale(String),

    #[error("Invalid message bundle for locale {locale}: {source}")]
    InvalidBundle {
        locale: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("No message catalogue for default locale {0}")]
    MissingDefaultCatalogue(String),
}

/// Picks the best supported locale for an `Accept-Language` header
#[derive(Debug, Clone)]
pub struct LocaleNegotiator {
    default: Locale,
    supported: Vec<Locale>,
}

impl LocaleNegotiator {
    pub fn new(default: Locale, supported: Vec<Locale>) -> Self {
        Self { default, supported }
    }

    pub fn from_config(config: &I18nConfig) -> Result<Self, I18nError> {
        let default = parse_locale(&config.default_locale)?;
        let supported = config
            .supported_locales
            .iter()
            .map(|tag| parse_locale(tag))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(default, supported))
    }

    pub fn default_locale(&self) -> &Locale {
        &self.default
    }

    /// Negotiate a locale from an `Accept-Language` header value.
    ///
    /// Ranges are tried by descending q-value; each range matches a supported
    /// locale exactly first and then by language.
    pub fn negotiate(&self, accept_language: Option<&str>) -> Locale {
        let Some(header) = accept_language else {
            return self.default.clone();
        };

        let mut ranges: Vec<(Locale, f32)> = header
            .split(',')
            .filter_map(|range| {
                let mut parts = range.split(';');
                let locale = Locale::parse(parts.next()?)?;
                let quality = parts
                    .find_map(|param| param.trim().strip_prefix("q="))
                    .and_then(|q| q.trim().parse::<f32>().ok())
                    .unwrap_or(1.0);
                (quality > 0.0).then_some((locale, quality))
            })
            .collect();
        ranges.sort_by(|(_, a), (_, b)| b.total_cmp(a));

        ranges
            .iter()
            .find_map(|(requested, _)| self.match_supported(requested))
            .unwrap_or_else(|| self.default.clone())
    }

    fn match_supported(&self, requested: &Locale) -> Option<Locale> {
        self.supported
            .iter()
            .find(|supported| *supported == requested)
            .or_else(|| {
                self.supported
                    .iter()
                    .find(|supported| supported.language() == requested.language())
            })
            .cloned()
    }
}

fn parse_locale(tag: &str) -> Result<Locale, I18nError> {
    Locale::parse(tag).ok_or_else(|| I18nError::InvalidLocale(tag.to_string()))
}

/// Run `future` with `locale` as the request locale
pub async fn with_request_locale<F: Future>(locale: Locale, future: F) -> F::Output {
    REQUEST_LOCALE.scope(locale, future).await
}

/// Resolves the locale negotiated for the current request
#[derive(Debug, Clone)]
pub struct RequestLocaleResolver {
    default: Locale,
}

impl RequestLocaleResolver {
    pub fn new(default: Locale) -> Self {
        Self { default }
    }
}

impl LocaleResolver for RequestLocaleResolver {
    fn current_locale(&self) -> Locale {
        REQUEST_LOCALE
            .try_with(Locale::clone)
            .unwrap_or_else(|_| self.default.clone())
    }
}

/// Middleware negotiating the request locale and scoping it for the handler
pub async fn locale_middleware(
    State(negotiator): State<Arc<LocaleNegotiator>>,
    request: Request,
    next: Next,
) -> Response {
    let accept_language = request
        .headers()
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok());
    let locale = negotiator.negotiate(accept_language);

    let mut response = with_request_locale(locale.clone(), next.run(request)).await;
    if let Ok(value) = HeaderValue::from_str(locale.as_str()) {
        response.headers_mut().insert(header::CONTENT_LANGUAGE, value);
    }
    response
}

/// Localized message catalogue
#[derive(Debug, Clone)]
pub struct MessageBundle {
    default: Locale,
    messages: HashMap<Locale, HashMap<String, String>>,
    use_code_as_default_message: bool,
}

impl MessageBundle {
    pub fn new(default: Locale) -> Self {
        Self {
            default,
            messages: HashMap::new(),
            use_code_as_default_message: false,
        }
    }

    /// Bundle with the catalogues shipped in this crate (`en`, `fi`).
    ///
    /// Fails when the configured default locale has no catalogue, since
    /// unmatched requests would otherwise never resolve a message.
    pub fn embedded(config: &I18nConfig) -> Result<Self, I18nError> {
        let default = parse_locale(&config.default_locale)?;
        let bundle = Self::new(default)
            .with_json(Locale(String::from("en")), MESSAGES_EN)?
            .with_json(Locale(String::from("fi")), MESSAGES_FI)?
            .use_code_as_default_message(config.use_code_as_default_message);

        if !bundle.has_catalogue_for(&bundle.default) {
            return Err(I18nError::MissingDefaultCatalogue(bundle.default.to_string()));
        }
        Ok(bundle)
    }

    /// Whether a catalogue exists for the locale or its language
    pub fn has_catalogue_for(&self, locale: &Locale) -> bool {
        self.messages.contains_key(locale)
            || locale
                .without_region()
                .is_some_and(|language| self.messages.contains_key(&language))
    }

    /// Return the code itself instead of `None` when no message is found
    pub fn use_code_as_default_message(mut self, enabled: bool) -> Self {
        self.use_code_as_default_message = enabled;
        self
    }

    /// Add messages for a locale from a JSON object of `code -> template`
    pub fn with_json(self, locale: Locale, json: &str) -> Result<Self, I18nError> {
        let messages: HashMap<String, String> =
            serde_json::from_str(json).map_err(|source| I18nError::InvalidBundle {
                locale: locale.to_string(),
                source,
            })?;
        Ok(self.with_messages(locale, messages))
    }

    pub fn with_messages(mut self, locale: Locale, messages: HashMap<String, String>) -> Self {
        self.messages.entry(locale).or_default().extend(messages);
        self
    }

    fn template(&self, code: &str, locale: &Locale) -> Option<&str> {
        let candidates = [
            Some(locale.clone()),
            locale.without_region(),
            Some(self.default.clone()),
            self.default.without_region(),
        ];
        candidates
            .into_iter()
            .flatten()
            .find_map(|candidate| self.messages.get(&candidate)?.get(code))
            .map(String::as_str)
    }
}

impl MessageResolver for MessageBundle {
    fn get_message(&self, code: &str, arguments: &[Value], locale: &Locale) -> Option<String> {
        match self.template(code, locale) {
            Some(template) => Some(format_message(template, arguments)),
            None if self.use_code_as_default_message => Some(code.to_string()),
            None => {
                tracing::debug!(code, locale = %locale, "No message found");
                None
            }
        }
    }
}

/// Substitute positional `{n}` placeholders in a single pass over the
/// template; unknown placeholders are kept and arguments are never rescanned
fn format_message(template: &str, arguments: &[Value]) -> String {
    let mut message = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        message.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let placeholder = after.find('}').and_then(|end| {
            let index = &after[..end];
            if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let argument = arguments.get(index.parse::<usize>().ok()?)?;
            Some((end, argument))
        });

        match placeholder {
            Some((end, Value::String(text))) => {
                message.push_str(text);
                rest = &after[end + 1..];
            }
            Some((end, other)) => {
                message.push_str(&other.to_string());
                rest = &after[end + 1..];
            }
            None => {
                message.push('{');
                rest = after;
            }
        }
    }

    message.push_str(rest);
    message
}
