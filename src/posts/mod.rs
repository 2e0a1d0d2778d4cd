//! Post list: records, cards and the post date format.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, Month, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Maximum excerpt length on a card, in characters.
pub const EXCERPT_CHARS: usize = 160;

#[derive(Debug, thiserror::Error)]
pub enum PostsError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// A post id; backends hand out either numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostId {
    Number(i64),
    Text(String),
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A stored post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: PostId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(alias = "createdAt", deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

/// What one card in the list shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostCard {
    pub id: PostId,
    pub title: String,
    pub excerpt: String,
    pub image: Option<String>,
    pub date: String,
}

/// Read a JSON array of post records.
pub fn load_posts(path: &Path) -> Result<Vec<PostRecord>, PostsError> {
    let raw = std::fs::read_to_string(path).map_err(|source| PostsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let posts: Vec<PostRecord> = serde_json::from_str(&raw).map_err(|source| PostsError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(count = posts.len(), path = %path.display(), "loaded posts");
    Ok(posts)
}

/// One card per record, in input order, with dates shown in `tz`.
pub fn post_cards<Tz: TimeZone>(records: &[PostRecord], tz: &Tz) -> Vec<PostCard> {
    records
        .iter()
        .map(|record| PostCard {
            id: record.id.clone(),
            title: record.title.clone(),
            excerpt: excerpt(&record.content, EXCERPT_CHARS),
            image: record.image.clone(),
            date: format_post_date(&record.created_at.with_timezone(tz)),
        })
        .collect()
}

/// Format a date as `October 18th, 2026`.
pub fn format_post_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String {
    let month = u8::try_from(date.month())
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map_or("", |m| m.name());
    let day = date.day();
    format!("{month} {day}{}, {}", ordinal_suffix(day), date.year())
}

const fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// Plain-text preview of markdown content.
///
/// Drops heading, list and quote markers and inline emphasis characters,
/// collapses whitespace, and cuts at `max_chars` with a trailing ellipsis.
pub fn excerpt(content: &str, max_chars: usize) -> String {
    let mut words = Vec::new();
    for line in content.lines() {
        let line = strip_block_markers(line);
        let line = line
            .strip_prefix("- ")
            .or_else(|| line.strip_prefix("* "))
            .or_else(|| line.strip_prefix("+ "))
            .unwrap_or(line);
        if line.starts_with("```") {
            continue;
        }
        let cleaned: String = line
            .chars()
            .filter(|ch| !matches!(ch, '*' | '_' | '`' | '~'))
            .collect();
        words.extend(cleaned.split_whitespace().map(str::to_string));
    }
    let text = words.join(" ");
    if text.chars().count() <= max_chars {
        return text;
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}…", cut.trim_end())
}

/// Remove leading heading (`#` to `######`) and quote (`>`) markers.
///
/// A marker only counts when whitespace or the end of the line follows it,
/// so `#hashtag` and `>_<` stay as written.
fn strip_block_markers(mut line: &str) -> &str {
    loop {
        line = line.trim_start();
        let hashes = line.len() - line.trim_start_matches('#').len();
        let marker = if (1..=6).contains(&hashes) {
            hashes
        } else if line.starts_with('>') {
            1
        } else {
            return line;
        };
        let rest = &line[marker..];
        if !(rest.is_empty() || rest.starts_with(char::is_whitespace)) {
            return line;
        }
        line = rest;
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    Text(String),
}

fn deserialize_timestamp<'de, D: Deserializer<'de>>(de: D) -> Result<DateTime<Utc>, D::Error> {
    use serde::de::Error;

    match RawTimestamp::deserialize(de)? {
        RawTimestamp::Millis(ms) => DateTime::from_timestamp_millis(ms)
            .ok_or_else(|| D::Error::custom(format!("timestamp out of range: {ms}"))),
        RawTimestamp::Text(text) => DateTime::parse_from_rfc3339(&text)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|err| D::Error::custom(format!("invalid date {text:?}: {err}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_format_post_date() {
        assert_eq!(format_post_date(&utc(2026, 10, 18)), "October 18th, 2026");
        assert_eq!(format_post_date(&utc(2021, 1, 1)), "January 1st, 2021");
        assert_eq!(format_post_date(&utc(2021, 3, 22)), "March 22nd, 2021");
        assert_eq!(format_post_date(&utc(2021, 5, 23)), "May 23rd, 2021");
        assert_eq!(format_post_date(&utc(2021, 6, 11)), "June 11th, 2021");
        assert_eq!(format_post_date(&utc(2021, 6, 13)), "June 13th, 2021");
    }

    #[test]
    fn test_date_follows_timezone() {
        let late = Utc.with_ymd_and_hms(2021, 12, 31, 23, 30, 0).unwrap();
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(
            format_post_date(&late.with_timezone(&plus_two)),
            "January 1st, 2022"
        );
    }

    #[test]
    fn test_records_accept_rfc3339_and_millis() {
        let json = r#"[
            {"id": 1, "title": "A", "content": "x", "createdAt": "2021-07-04T10:00:00Z"},
            {"id": "b", "title": "B", "content": "y", "image": "b.png", "created_at": 1625392800000}
        ]"#;
        let posts: Vec<PostRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(posts[0].id, PostId::Number(1));
        assert_eq!(posts[1].id.to_string(), "b");
        assert_eq!(posts[0].created_at, utc(2021, 7, 4) - chrono::Duration::hours(2));
        assert_eq!(posts[1].created_at.timestamp_millis(), 1_625_392_800_000);
    }

    #[test]
    fn test_bad_date_is_rejected() {
        let json = r#"[{"id": 1, "createdAt": "yesterday"}]"#;
        assert!(serde_json::from_str::<Vec<PostRecord>>(json).is_err());
    }

    #[test]
    fn test_cards_keep_order_and_fields() {
        let records = vec![
            PostRecord {
                id: PostId::Number(2),
                title: "Second".to_string(),
                content: "# Heading\n\nSome **bold** text".to_string(),
                image: Some("cover.png".to_string()),
                created_at: utc(2026, 10, 18),
            },
            PostRecord {
                id: PostId::Number(1),
                title: "First".to_string(),
                content: String::new(),
                image: None,
                created_at: utc(2021, 2, 2),
            },
        ];
        let cards = post_cards(&records, &Utc);
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].title, "Second");
        assert_eq!(cards[0].excerpt, "Heading Some bold text");
        assert_eq!(cards[0].date, "October 18th, 2026");
        assert_eq!(cards[1].date, "February 2nd, 2021");
        assert!(cards[1].image.is_none());
    }

    #[test]
    fn test_excerpt_truncates_with_ellipsis() {
        let long = "word ".repeat(100);
        let short = excerpt(&long, 20);
        assert!(short.ends_with('…'));
        assert!(short.chars().count() <= 21);
    }

    #[test]
    fn test_excerpt_strips_only_real_block_markers() {
        assert_eq!(excerpt("## Heading\n> quoted\n> > nested", 160), "Heading quoted nested");
        assert_eq!(excerpt("#rustlang is fun", 160), "#rustlang is fun");
        assert_eq!(excerpt(">not a quote", 160), ">not a quote");
        assert_eq!(excerpt("####### seven", 160), "####### seven");
        assert_eq!(excerpt("#\nbody", 160), "body");
    }

    #[test]
    fn test_load_posts_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_posts(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, PostsError::Io { .. }));
    }

    #[test]
    fn test_load_posts_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.json");
        std::fs::write(
            &path,
            r#"[{"id": 7, "title": "T", "content": "C", "createdAt": "2026-10-18T08:00:00Z"}]"#,
        )
        .unwrap();
        let posts = load_posts(&path).unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "T");
    }
}
