//! Wire format of the external link classifier.

use serde::{Deserialize, Serialize};

use crate::error::ClassificationError;
use crate::types::LinkStatus;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassifyRequest {
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkCategory {
    Safe,
    Malware,
    Porn,
}

impl LinkCategory {
    pub fn status(&self) -> LinkStatus {
        match self {
            Self::Safe => LinkStatus::Safe,
            Self::Malware => LinkStatus::Malware,
            Self::Porn => LinkStatus::Porn,
        }
    }
}

/// A classifier answer that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkVerdict {
    pub category: LinkCategory,
    pub reason: String,
}

// Raw shape; `type` is checked by hand so unexpected values get their own error.
#[derive(Deserialize)]
struct RawVerdict {
    #[serde(rename = "type")]
    kind: Option<String>,
    reason: Option<String>,
}

impl LinkVerdict {
    pub fn parse(body: &[u8]) -> Result<Self, ClassificationError> {
        let value: serde_json::Value = serde_json::from_slice(body)
            .map_err(|e| ClassificationError::Malformed(e.to_string()))?;
        Self::from_value(value)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, ClassificationError> {
        let raw: RawVerdict = serde_json::from_value(value)
            .map_err(|e| ClassificationError::Malformed(e.to_string()))?;

        let kind = raw
            .kind
            .ok_or_else(|| ClassificationError::Malformed("missing `type`".into()))?;

        let category = match kind.as_str() {
            "safe" => LinkCategory::Safe,
            "malware" => LinkCategory::Malware,
            "porn" => LinkCategory::Porn,
            _ => return Err(ClassificationError::UnexpectedType(kind)),
        };

        Ok(Self {
            category,
            reason: raw.reason.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_valid_verdict() {
        let v = LinkVerdict::from_value(json!({"type": "malware", "reason": "flagged"})).unwrap();
        assert_eq!(v.category, LinkCategory::Malware);
        assert_eq!(v.reason, "flagged");
        assert_eq!(v.category.status(), LinkStatus::Malware);
    }

    #[test]
    fn test_unexpected_type_rejected() {
        let err = LinkVerdict::from_value(json!({"type": "bogus"})).unwrap_err();
        assert!(matches!(err, ClassificationError::UnexpectedType(ref t) if t == "bogus"));
    }

    #[test]
    fn test_wrong_shape_rejected() {
        assert!(matches!(
            LinkVerdict::parse(b"[1, 2, 3]"),
            Err(ClassificationError::Malformed(_))
        ));
        assert!(matches!(
            LinkVerdict::parse(b"{\"reason\": \"x\"}"),
            Err(ClassificationError::Malformed(_))
        ));
        assert!(matches!(
            LinkVerdict::parse(b"not json"),
            Err(ClassificationError::Malformed(_))
        ));
    }

    #[test]
    fn test_request_shape() {
        let body = serde_json::to_value(ClassifyRequest {
            url: "http://example.com".into(),
        })
        .unwrap();
        assert_eq!(body, json!({"url": "http://example.com"}));
    }
}
