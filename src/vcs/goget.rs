use std::time::Duration;

use anyhow::{Context, Result};
use regex::Regex;
use reqwest::blocking::Client;
use reqwest::Url;
use tracing::debug;

use super::VcsDetector;

/// Resolves import paths through the `<meta name="go-import">` tags a hosting
/// server returns for `https://<path>?go-get=1`.
pub struct GoGetDetector {
    client: Client,
    meta: Regex,
    attr: Regex,
}

impl GoGetDetector {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("bom-merge/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            meta: Regex::new(r"(?is)<meta\s[^>]*>")?,
            attr: Regex::new(r#"(?i)([a-z-]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)?,
        })
    }

    /// Pick the import prefix of the `go-import` tag that covers `project`.
    pub fn parse_go_import(&self, project: &str, html: &str) -> Option<String> {
        for tag in self.meta.find_iter(html) {
            let mut name = None;
            let mut content = None;
            for cap in self.attr.captures_iter(tag.as_str()) {
                let value = cap.get(2).or_else(|| cap.get(3)).map(|m| m.as_str());
                match cap[1].to_ascii_lowercase().as_str() {
                    "name" => name = value,
                    "content" => content = value,
                    _ => {}
                }
            }

            if name != Some("go-import") {
                continue;
            }
            // content = "<import-prefix> <vcs> <repo-url>"
            let Some(prefix) = content.and_then(|c| {
                let fields: Vec<&str> = c.split_whitespace().collect();
                (fields.len() == 3).then(|| fields[0])
            }) else {
                continue;
            };

            let covers = project == prefix
                || project
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with('/'));
            if covers {
                return Some(prefix.to_string());
            }
        }
        None
    }
}

/// The `?go-get=1` URL for `project`, or `None` when its first path element
/// cannot be a hostname (npm scopes, bare package names, stray spaces).
pub fn go_get_url(project: &str) -> Option<Url> {
    let host = project.split('/').next().unwrap_or_default();
    let host_like = host.contains('.')
        && !host.starts_with('.')
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    if !host_like {
        return None;
    }

    let url = Url::parse(&format!("https://{}?go-get=1", project)).ok()?;
    url.host_str()
        .is_some_and(|h| h.eq_ignore_ascii_case(host))
        .then_some(url)
}

impl VcsDetector for GoGetDetector {
    fn detect_root(&self, project: &str) -> Result<Option<String>> {
        let Some(url) = go_get_url(project) else {
            debug!(project, "not a go-get import path");
            return Ok(None);
        };
        let response = self
            .client
            .get(url.clone())
            .send()
            .with_context(|| format!("fetching {}", url))?;

        if !response.status().is_success() {
            debug!(project, status = %response.status(), "go-get lookup not found");
            return Ok(None);
        }

        let body = response
            .text()
            .with_context(|| format!("reading response from {}", url))?;
        Ok(self.parse_go_import(project, &body))
    }
}
