//! External wiki link-status cache.
//!
//! Each record carries, per wiki source and page kind, whether the page is
//! known to exist and whether it redirects. Re-verification is deliberately
//! asymmetric: only negative outcomes are timestamped and rate-limited to
//! one probe per 24 hours, redirects stay eligible every run, and a page
//! confirmed to exist without redirecting is never probed again. The probe
//! itself is injected so the policy is testable without a network.

use std::time::Duration;

use anyhow::Result;
use herdbook_store::{PageStatus, WikiStatus};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use url::Url;

/// Negative results younger than this are not re-probed.
pub const RECHECK_WINDOW_SECS: i64 = 24 * 60 * 60;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WikiConfig {
    /// Wiki source key → site description, in display order.
    pub sources: IndexMap<String, WikiSite>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikiSite {
    /// Base URL; a trailing slash is added when missing.
    pub url: String,
    /// Page kind → path template; `{name}` expands to the entity slug.
    pub pages: IndexMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// HTTP 200.
    Found,
    /// HTTP 301.
    Redirect,
    /// Anything else.
    Missing,
}

pub trait PageProbe {
    fn head(&self, url: &str) -> Result<ProbeOutcome>;
}

/// Blocking HEAD prober. Redirects are not followed so a 301 stays
/// observable, and the client carries an explicit timeout.
pub struct HttpProbe {
    client: reqwest::blocking::Client,
}

impl HttpProbe {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(20))
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(concat!("herdbook/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl PageProbe for HttpProbe {
    fn head(&self, url: &str) -> Result<ProbeOutcome> {
        let response = self.client.head(url).send()?;
        Ok(match response.status().as_u16() {
            301 => ProbeOutcome::Redirect,
            200 => ProbeOutcome::Found,
            _ => ProbeOutcome::Missing,
        })
    }
}

/// Wiki slug for an entity: spaces to underscores, percent-encoded the way
/// a MediaWiki path expects.
pub fn wiki_slug(english_name: &str) -> String {
    let underscored = english_name.trim().replace(' ', "_");
    match Url::parse("https://wiki.invalid/") {
        Ok(mut url) => {
            url.set_path(&underscored);
            url.path().trim_start_matches('/').to_string()
        }
        Err(_) => underscored,
    }
}

/// Refresh the cached status map for one entity slug.
///
/// Without a probe only the `path` of newly-seen pages is populated and the
/// cached flags stay as they are. With a probe, candidates are checked per
/// the policy above; probe failures keep the cached state and are retried on
/// a later run.
pub fn refresh_pages(
    slug: &str,
    cached: &mut WikiStatus,
    config: &WikiConfig,
    probe: Option<&dyn PageProbe>,
    now: i64,
) {
    for (source, site) in &config.sources {
        let base = if site.url.ends_with('/') {
            site.url.clone()
        } else {
            format!("{}/", site.url)
        };

        let site_cache = cached.entry(source.clone()).or_default();
        for (kind, template) in &site.pages {
            let path = template.replace("{name}", slug);
            let entry = site_cache
                .entry(kind.clone())
                .or_insert_with(|| PageStatus {
                    exists: false,
                    redirect: false,
                    path: path.clone(),
                    timestamp: None,
                });

            let Some(probe) = probe else {
                continue;
            };
            if entry.exists && !entry.redirect {
                // Confirmed stable page; nothing to verify.
                continue;
            }

            entry.path = path;
            let url = format!("{base}{}", entry.path);

            if let Some(stamp) = entry.timestamp {
                if now - stamp < RECHECK_WINDOW_SECS {
                    tracing::debug!(url = %url, "negative result still fresh; skipping recheck");
                    continue;
                }
            }

            match probe.head(&url) {
                Ok(ProbeOutcome::Found) => {
                    entry.exists = true;
                    entry.redirect = false;
                }
                Ok(ProbeOutcome::Redirect) => {
                    entry.exists = true;
                    entry.redirect = true;
                }
                Ok(ProbeOutcome::Missing) => {
                    entry.exists = false;
                    entry.redirect = false;
                    entry.timestamp = Some(now);
                    tracing::warn!(url = %url, "no wiki page");
                }
                Err(error) => {
                    tracing::warn!(
                        url = %url,
                        error = %error,
                        "wiki page check failed; keeping cached status"
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_encodes_spaces_and_non_ascii() {
        assert_eq!(wiki_slug("Apple Bloom"), "Apple_Bloom");
        assert_eq!(wiki_slug("  Trixie  "), "Trixie");
        assert_eq!(wiki_slug("Señora Calzón"), "Se%C3%B1ora_Calz%C3%B3n");
    }

    #[test]
    fn slug_of_empty_name_is_empty() {
        assert_eq!(wiki_slug(""), "");
    }
}
