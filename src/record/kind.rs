/// Record kind definitions
///
/// Each kind owns its own dense ID space on the forum and its own page template.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// The kinds of records the archiver knows how to walk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Forum threads, addressed as `/t/<id>`
    Article,

    /// Member profiles, addressed as `/member/<id>`
    User,

    /// Board listings, addressed as `/n/<id>`
    Category,
}

impl RecordKind {
    /// Every kind, in the order a default run processes them
    pub const ALL: [RecordKind; 3] = [Self::Article, Self::User, Self::Category];

    /// Path segment used in the page address `<base>/<segment>/<id>`
    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::Article => "t",
            Self::User => "member",
            Self::Category => "n",
        }
    }

    /// Directory name under the output root
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::User => "user",
            Self::Category => "category",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for RecordKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "article" => Ok(Self::Article),
            "user" => Ok(Self::User),
            "category" => Ok(Self::Category),
            _ => Err(ConfigError::UnknownValue {
                field: "kind",
                value: s.to_string(),
            }),
        }
    }
}
