use std::collections::{HashMap, HashSet};

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{Connection, OpenFlags};

/// Read-only handle over the local archive of denormalized subreddit data.
///
/// Expected tables: `users(username)`, `comments(id36, created_time)`,
/// `posts(id36, created_time)`. Rows missing from the archive are simply
/// absent from lookup results, never errors.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("failed to open archive db at {path}"))?;
        Ok(Self { conn })
    }

    #[cfg(test)]
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Map lowercase usernames to their display form ("u/OriginalCase").
    pub fn lookup_users(&self, usernames: &HashSet<String>) -> Result<HashMap<String, String>> {
        if usernames.is_empty() {
            return Ok(HashMap::new());
        }
        let names: Vec<&str> = usernames.iter().map(String::as_str).collect();
        let sql = format!(
            "SELECT username FROM users WHERE lower(username) IN ({})",
            placeholders(names.len())
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(names), |row| {
            row.get::<_, String>(0)
        })?;

        let mut map = HashMap::new();
        for row in rows {
            let username = row?;
            map.insert(username.to_lowercase(), format!("u/{username}"));
        }
        Ok(map)
    }

    /// Creation dates for comment ids (id36 → date).
    pub fn comment_dates(&self, ids: &[String]) -> Result<HashMap<String, NaiveDate>> {
        self.dates_from("comments", ids)
    }

    /// Creation dates for post ids (id36 → date).
    pub fn post_dates(&self, ids: &[String]) -> Result<HashMap<String, NaiveDate>> {
        self.dates_from("posts", ids)
    }

    /// Creation dates from both tables; posts win on an id collision.
    pub fn any_dates(&self, ids: &[String]) -> Result<HashMap<String, NaiveDate>> {
        let mut map = self.comment_dates(ids)?;
        map.extend(self.post_dates(ids)?);
        Ok(map)
    }

    fn dates_from(&self, table: &str, ids: &[String]) -> Result<HashMap<String, NaiveDate>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let sql = format!(
            "SELECT id36, created_time FROM {} WHERE id36 IN ({})",
            table,
            placeholders(ids.len())
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(ids), |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut map = HashMap::new();
        for row in rows {
            let (id36, created) = row?;
            if let Some(date) = parse_created(&created) {
                map.insert(id36, date);
            }
        }
        Ok(map)
    }
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(",")
}

/// `created_time` is "YYYY-MM-DD HH:MM:SS" text; tolerate a bare date.
fn parse_created(s: &str) -> Option<NaiveDate> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.date())
        .ok()
        .or_else(|| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

// ── Tests ──
