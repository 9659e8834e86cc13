//! Typed records produced by the extractors
//!
//! Field names on the wire follow the archive format the forum backups have
//! always used (`aid`, `cid`, `userID`, ...), so existing archives stay readable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::RecordKind;

/// Forum member profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "userID")]
    pub user_id: u64,

    #[serde(rename = "userName")]
    pub user_name: String,

    /// Registration time
    #[serde(rename = "regTime")]
    pub reg_time: DateTime<Utc>,

    /// Avatar embedded as a `data:` URL, never a remote reference
    pub avatar: String,

    /// Website entered in the profile
    pub url: Option<String>,

    /// Self description
    pub about: Option<String>,
}

/// A reply inside an article
///
/// Comments have no identity of their own; they only exist inside the
/// [`Article`] that owns them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "authorID")]
    pub author_id: u64,

    #[serde(rename = "addTime")]
    pub add_time: DateTime<Utc>,

    /// Rich text (HTML)
    pub content: String,
}

/// Forum thread with its replies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    #[serde(rename = "aid")]
    pub article_id: u64,

    #[serde(rename = "cid")]
    pub category_id: u64,

    #[serde(rename = "authorID")]
    pub author_id: u64,

    #[serde(rename = "addTime")]
    pub publish_time: DateTime<Utc>,

    pub title: String,

    /// Rich text (HTML)
    pub content: String,

    /// Tags in the order the page lists them
    pub tags: Vec<String>,

    pub comments: Vec<Comment>,
}

/// Board that articles are filed under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "cid")]
    pub category_id: u64,

    pub name: String,

    pub description: Option<String>,
}

/// Anything that can flow through the archive pipeline
///
/// Serialized untagged: the archive holds the bare record object. Variant
/// order matters for decoding, each variant is tried until its required
/// fields match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageRecord {
    Article(Article),
    User(User),
    Category(Category),
}

impl PageRecord {
    /// Returns the kind this record belongs to
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Article(_) => RecordKind::Article,
            Self::User(_) => RecordKind::User,
            Self::Category(_) => RecordKind::Category,
        }
    }

    /// Returns the record's own ID within its kind
    pub fn id(&self) -> u64 {
        match self {
            Self::Article(a) => a.article_id,
            Self::User(u) => u.user_id,
            Self::Category(c) => c.category_id,
        }
    }

    /// Returns the rich-text body of the record, if it has one
    ///
    /// This is `content` for articles, `about` for users and `description`
    /// for categories.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Article(a) => Some(a.content.as_str()),
            Self::User(u) => u.about.as_deref(),
            Self::Category(c) => c.description.as_deref(),
        }
    }

    /// Returns the serialized name of the body field
    pub fn body_field(&self) -> &'static str {
        match self {
            Self::Article(_) => "content",
            Self::User(_) => "about",
            Self::Category(_) => "description",
        }
    }
}

impl From<Article> for PageRecord {
    fn from(article: Article) -> Self {
        Self::Article(article)
    }
}

impl From<User> for PageRecord {
    fn from(user: User) -> Self {
        Self::User(user)
    }
}

impl From<Category> for PageRecord {
    fn from(category: Category) -> Self {
        Self::Category(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_user() -> User {
        User {
            user_id: 7,
            user_name: "alice".to_string(),
            reg_time: Utc.with_ymd_and_hms(2019, 8, 6, 16, 0, 0).unwrap(),
            avatar: "data:image/png;base64,AAEC".to_string(),
            url: None,
            about: Some("hello".to_string()),
        }
    }

    #[test]
    fn test_kind_and_id() {
        let record = PageRecord::from(sample_user());
        assert_eq!(record.kind(), RecordKind::User);
        assert_eq!(record.id(), 7);
        assert_eq!(record.body(), Some("hello"));
        assert_eq!(record.body_field(), "about");
    }

    #[test]
    fn test_archive_field_names() {
        let record = PageRecord::from(Category {
            category_id: 3,
            name: "General".to_string(),
            description: None,
        });
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["cid"], 3);
        assert_eq!(json["name"], "General");
        assert!(json["description"].is_null());
    }

    #[test]
    fn test_untagged_decode_picks_right_variant() {
        let json = serde_json::to_string(&PageRecord::from(sample_user())).unwrap();
        let decoded: PageRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.kind(), RecordKind::User);

        let json = r#"{"cid": 2, "name": "Off topic"}"#;
        let decoded: PageRecord = serde_json::from_str(json).unwrap();
        assert_eq!(
            decoded,
            PageRecord::Category(Category {
                category_id: 2,
                name: "Off topic".to_string(),
                description: None,
            })
        );
    }
}
