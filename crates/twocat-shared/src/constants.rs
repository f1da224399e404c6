/// Name shown for posts submitted without a username
pub const DEFAULT_USERNAME: &str = "Anonymous";

/// Comment placeholder used by views when a post has no text
pub const EMPTY_COMMENT: &str = "No comment.";

/// Database file name inside the data directory
pub const DB_FILE_NAME: &str = "2cat.db";

/// Schema version the store upgrades to on open
pub const SCHEMA_VERSION: u32 = 5;

/// Path of the link classification endpoint, relative to the classifier base URL
pub const CLASSIFY_PATH: &str = "/api/check-link";

/// Default classifier base URL
pub const DEFAULT_CLASSIFIER_URL: &str = "http://127.0.0.1:8080";

/// Reason recorded when the classifier could not be reached or failed
pub const REASON_CHECK_FAILED: &str = "Link check failed or classifier unavailable.";

/// Reason recorded when the classifier answered with an unusable verdict
pub const REASON_INVALID_RESPONSE: &str = "Invalid classifier response type or format.";

/// Prefix of attachment display URLs
pub const BLOB_URL_PREFIX: &str = "blob:twocat/";

/// Default capacity of the view event channel
pub const DEFAULT_EVENT_CAPACITY: usize = 64;
