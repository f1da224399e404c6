use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

// Store-assigned post key (SQLite rowid)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct PostId(pub i64);

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Image,
    Video,
}

impl FileType {
    /// Derive the display kind from a media type such as `video/mp4`.
    ///
    /// Matches the exact `video/` or `image/` prefix; the check is
    /// case-sensitive and the subtype may be empty. Anything else yields
    /// `None`.
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        if media_type.starts_with("video/") {
            Some(Self::Video)
        } else if media_type.starts_with("image/") {
            Some(Self::Image)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

impl FromStr for FileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(Self::Image),
            "video" => Ok(Self::Video),
            other => Err(format!("unknown file type: {other}")),
        }
    }
}

/// Safety classification state of a post's link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    Pending,
    Safe,
    Malware,
    Porn,
    Error,
}

impl LinkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Safe => "safe",
            Self::Malware => "malware",
            Self::Porn => "porn",
            Self::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Statuses only move forward: absent -> pending -> terminal.
    pub fn can_follow(current: Option<LinkStatus>, next: LinkStatus) -> bool {
        match current {
            None => next == Self::Pending,
            Some(Self::Pending) => next.is_terminal(),
            Some(_) => false,
        }
    }
}

impl FromStr for LinkStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "safe" => Ok(Self::Safe),
            "malware" => Ok(Self::Malware),
            "porn" => Ok(Self::Porn),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown link status: {other}")),
        }
    }
}

impl std::fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Media attached to a post, kept together with its declared media type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attachment {
    pub media_type: String,
    pub data: Bytes,
}

impl Attachment {
    pub fn new(media_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            media_type: media_type.into(),
            data: data.into(),
        }
    }

    pub fn file_type(&self) -> Option<FileType> {
        FileType::from_media_type(&self.media_type)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
