use std::sync::LazyLock;

use anyhow::{bail, Context, Result};
use regex::Regex;
use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

const JSON_SUFFIX: &str = ".json";
const USER_AGENT: &str = "bestof_report/0.1 (nomination table generator)";

static REDDIT_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://(\w+\.)?redd").unwrap());

/// Does this URL point into reddit (any subdomain, including redd.it)?
pub fn is_reddit_url(url: &str) -> bool {
    REDDIT_URL_RE.is_match(url)
}

pub struct RedditClient {
    http: Client,
    no_redirect: Client,
}

impl RedditClient {
    pub fn new() -> Result<Self> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        let no_redirect = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(Policy::none())
            .build()?;
        Ok(Self { http, no_redirect })
    }

    /// Fetch a thread's JSON listing. Short links are resolved to their
    /// canonical location first, without following the redirect.
    pub fn fetch_thread(&self, url: &str) -> Result<Value> {
        if !url.contains("redd.it") {
            return self.get_json(&format!("{url}{JSON_SUFFIX}"));
        }
        let resolved = self.resolve_short_link(url)?;
        self.get_json(&format!("{resolved}{JSON_SUFFIX}"))
    }

    fn get_json(&self, url: &str) -> Result<Value> {
        info!("GET {url}");
        let resp = self.http.get(url).send()?.error_for_status()?;
        Ok(resp.json()?)
    }

    /// Short-link domains answer with a redirect to the full thread URL;
    /// anything other than a 3xx means the link is dead.
    fn resolve_short_link(&self, url: &str) -> Result<String> {
        info!("Resolving short link {url}");
        let resp = self.no_redirect.get(url).send()?;
        let status = resp.status();
        if !status.is_redirection() {
            let body = resp.text().unwrap_or_default();
            bail!("expected 3xx for {url}, but got {status}: body: {body}");
        }
        let location = resp
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .with_context(|| format!("redirect for {url} carries no Location header"))?;
        Ok(location.to_string())
    }
}

// ── Listing shape ──

/// Original post of a thread: element 0 of the listing.
#[derive(Debug, Clone)]
pub struct ThreadPost {
    pub title: String,
    pub selftext: String,
}

/// One nomination comment. Listing children without both fields
/// ("more" stubs and deleted entries) are skipped during parsing.
#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    pub author: String,
    pub body: String,
}

pub fn parse_post(thread: &Value) -> Result<ThreadPost> {
    let data = thread
        .get(0)
        .and_then(|listing| listing.pointer("/data/children/0/data"))
        .context("thread listing carries no post element")?;
    let field = |name: &str| {
        data.get(name)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    Ok(ThreadPost {
        title: field("title"),
        selftext: field("selftext"),
    })
}

pub fn parse_comments(thread: &Value) -> Result<Vec<Comment>> {
    let children = thread
        .get(1)
        .and_then(|listing| listing.pointer("/data/children"))
        .and_then(Value::as_array)
        .context("thread listing carries no comment element")?;
    Ok(children
        .iter()
        .filter_map(|child| child.get("data"))
        .filter_map(|data| serde_json::from_value(data.clone()).ok())
        .collect())
}

/// The index post must name the award year and call itself an index.
pub fn check_index_title(post: &ThreadPost, year: u16) -> Result<()> {
    let title = &post.title;
    if !title.contains(&year.to_string()) || !title.to_lowercase().contains("index") {
        bail!("\"{title}\" doesn't look like the correct index thread for the year {year}");
    }
    Ok(())
}

// ── Tests ──
