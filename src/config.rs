use anyhow::{bail, Result};

use crate::columns::Column;
use crate::markdown::Link;
use crate::reddit;

/// One award category: which index links belong to it and how its
/// nomination table is laid out.
#[derive(Debug, Clone)]
pub struct Category {
    pub keyword: String,
    pub header: String,
    pub columns: Vec<Column>,
}

impl Category {
    /// Column names are resolved eagerly so a typo fails before any
    /// network traffic happens.
    pub fn new(keyword: &str, header: &str, column_names: &[&str]) -> Result<Self> {
        let unknown: Vec<&str> = column_names
            .iter()
            .copied()
            .filter(|name| Column::from_name(name).is_none())
            .collect();
        if !unknown.is_empty() {
            bail!("column names [{}] are not defined", unknown.join(", "));
        }
        Ok(Self {
            keyword: keyword.to_lowercase(),
            header: header.to_string(),
            columns: column_names
                .iter()
                .filter_map(|name| Column::from_name(name))
                .collect(),
        })
    }
}

/// The standard award lineup, in matching priority order.
pub fn default_categories() -> Result<Vec<Category>> {
    Ok(vec![
        Category::new(
            "comment",
            "Best Comment",
            &["thread_link", "author", "date_comments", "nomination_author"],
        )?,
        Category::new(
            "rewatch",
            "Most Enjoyable Rewatch",
            &["thread_link", "reason", "author", "date_posts", "nomination_author"],
        )?,
        Category::new(
            "contributor",
            "Most Valuable Contributor",
            &["author", "nomination_author", "why"],
        )?,
        Category::new(
            "content",
            "Best Original Content",
            &["thread_link", "author", "date_posts", "nomination_author"],
        )?,
        Category::new(
            "essay",
            "Best Original Essay",
            &["thread_link", "author", "date", "nomination_author"],
        )?,
        Category::new(
            "review",
            "Best Original Review",
            &["thread_link", "author", "date", "nomination_author"],
        )?,
    ])
}

/// An index link that matched a category.
#[derive(Debug)]
pub struct NominationLink<'a> {
    pub link: Link,
    pub category: &'a Category,
}

/// Keep only links into reddit whose anchor text names a known category.
/// The first category in configuration order wins when several match;
/// links matching nothing are dropped silently.
pub fn match_links<'a>(links: Vec<Link>, categories: &'a [Category]) -> Vec<NominationLink<'a>> {
    links
        .into_iter()
        .filter(|link| reddit::is_reddit_url(&link.url))
        .filter_map(|link| {
            let text = link.text.to_lowercase();
            categories
                .iter()
                .find(|category| text.contains(&category.keyword))
                .map(|category| NominationLink { link, category })
        })
        .collect()
}

// ── Tests ──
