use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use anyhow::Result;
use chrono::NaiveDate;
use regex::Regex;
use url::Url;

use crate::markdown;
use crate::reddit::Comment;
use crate::store::Store;

/// Longest path segment that can still be a base-36 post/comment id.
const MAX_ID36_LEN: usize = 7;

const LINKS_NOT_FOUND: &str = "LINKS NOT FOUND";
const PLACEHOLDER: &str = "TODO";

static MENTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bu/([\w-]+)").unwrap());
static SUBDOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+\.reddit").unwrap());

/// One table column: a header label plus a per-comment cell renderer.
///
/// The two halves always agree: `header()` labels exactly the cells that
/// `render()` produces, one per comment, in comment order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    ThreadLink,
    Examples,
    Author,
    NominationAuthor,
    DateComments,
    DatePosts,
    Date,
    Reason,
    Why,
}

impl Column {
    /// The registry: configured column names resolve here or nowhere.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "thread_link" => Some(Self::ThreadLink),
            "examples" => Some(Self::Examples),
            "author" => Some(Self::Author),
            "nomination_author" => Some(Self::NominationAuthor),
            "date_comments" => Some(Self::DateComments),
            "date_posts" => Some(Self::DatePosts),
            "date" => Some(Self::Date),
            "reason" => Some(Self::Reason),
            "why" => Some(Self::Why),
            _ => None,
        }
    }

    pub fn header(self) -> &'static str {
        match self {
            Self::ThreadLink => "Thread/Link",
            Self::Examples => "Example(s)",
            Self::Author => "User",
            Self::NominationAuthor => "Nominated by",
            Self::DateComments | Self::DatePosts | Self::Date => "Date",
            Self::Reason => "Reason",
            Self::Why => "Why",
        }
    }

    /// Render one cell per comment, in comment order.
    pub fn render(self, comments: &[Comment], store: &Store) -> Result<Vec<String>> {
        match self {
            Self::ThreadLink | Self::Examples => Ok(thread_links(comments)),
            Self::Author => mentioned_users(comments, store),
            Self::NominationAuthor => Ok(comments
                .iter()
                .map(|c| format!("u/{}", c.author))
                .collect()),
            Self::DateComments => dates(comments, SlugRule::Last, "COMMENT NOT FOUND", |ids| {
                store.comment_dates(ids)
            }),
            Self::DatePosts => dates(comments, SlugRule::SecondToLast, "POST NOT FOUND", |ids| {
                store.post_dates(ids)
            }),
            Self::Date => dates(
                comments,
                SlugRule::FirstShortFromEnd,
                "POST/COMMENT NOT FOUND",
                |ids| store.any_dates(ids),
            ),
            Self::Reason | Self::Why => {
                Ok(comments.iter().map(|_| PLACEHOLDER.to_string()).collect())
            }
        }
    }
}

// ── Thread links ──

/// Outbound links per comment, rendered as generically-labeled markdown
/// links. Non-www reddit subdomains are normalized to www.
fn thread_links(comments: &[Comment]) -> Vec<String> {
    comments
        .iter()
        .map(|comment| {
            let links: Vec<String> = markdown::extract_links(&comment.body)
                .into_iter()
                .map(|link| SUBDOMAIN_RE.replace(&link.url, "www.reddit").into_owned())
                .collect();
            match links.as_slice() {
                [] => LINKS_NOT_FOUND.to_string(),
                [only] => format!("[{PLACEHOLDER}]({only})"),
                many => many
                    .iter()
                    .enumerate()
                    .map(|(i, url)| format!("[{PLACEHOLDER} {}]({url})", i + 1))
                    .collect::<Vec<_>>()
                    .join(", "),
            }
        })
        .collect()
}

// ── Mentioned users ──

/// u/name mentions per comment (lowercased, deduplicated in first-seen
/// order), resolved through the archive in one batched query. Names the
/// archive doesn't know contribute nothing to the cell.
fn mentioned_users(comments: &[Comment], store: &Store) -> Result<Vec<String>> {
    let batched: Vec<Vec<String>> = comments
        .iter()
        .map(|comment| {
            let mut seen = HashSet::new();
            MENTION_RE
                .captures_iter(&comment.body)
                .map(|caps| caps[1].to_lowercase())
                .filter(|name| seen.insert(name.clone()))
                .collect()
        })
        .collect();

    let to_look_up: HashSet<String> = batched.iter().flatten().cloned().collect();
    let resolved = store.lookup_users(&to_look_up)?;

    Ok(batched
        .iter()
        .map(|names| {
            names
                .iter()
                .filter_map(|name| resolved.get(name).cloned())
                .collect::<Vec<_>>()
                .join(", ")
        })
        .collect())
}

// ── Dates ──

/// Where in a link's path the short id lives.
#[derive(Clone, Copy)]
enum SlugRule {
    /// Comment permalinks: ".../comments/<post>/<title>/<id36>".
    Last,
    /// Post permalinks: ".../comments/<id36>/<title>/".
    SecondToLast,
    /// Unknown shape: first segment from the end short enough to be an id36.
    FirstShortFromEnd,
}

fn dates<F>(comments: &[Comment], rule: SlugRule, missing: &str, look_up: F) -> Result<Vec<String>>
where
    F: FnOnce(&[String]) -> Result<HashMap<String, NaiveDate>>,
{
    let batched: Vec<Vec<String>> = comments
        .iter()
        .map(|comment| {
            markdown::extract_links(&comment.body)
                .iter()
                .filter_map(|link| slug_from_url(&link.url, rule))
                .collect()
        })
        .collect();

    let all: Vec<String> = batched.iter().flatten().cloned().collect();
    let map = look_up(&all)?;

    Ok(batched
        .iter()
        .map(|slugs| {
            if slugs.is_empty() {
                return missing.to_string();
            }
            slugs
                .iter()
                .filter_map(|slug| map.get(slug))
                .map(|date| date.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        })
        .collect())
}

fn slug_from_url(url: &str, rule: SlugRule) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segments: Vec<&str> = parsed.path_segments()?.filter(|s| !s.is_empty()).collect();
    let slug = match rule {
        SlugRule::Last => segments.last().copied(),
        SlugRule::SecondToLast => segments
            .len()
            .checked_sub(2)
            .and_then(|i| segments.get(i))
            .copied(),
        SlugRule::FirstShortFromEnd => {
            segments.iter().rev().find(|s| s.len() <= MAX_ID36_LEN).copied()
        }
    }?;
    if slug.len() > MAX_ID36_LEN {
        return None;
    }
    Some(slug.to_string())
}

// ── Tests ──
