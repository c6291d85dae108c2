//! Fixed routing topology shared with CentralEGA.
//!
//! Other components depend on these names verbatim; changing them
//! breaks interoperability with the deployed brokers.

/// Topic exchange every event goes through.
pub const DEFAULT_EXCHANGE: &str = "localega.v1";

pub const QUEUE_FILES: &str = "v1.files";
pub const QUEUE_INBOX: &str = "v1.files.inbox";
pub const QUEUE_ERROR: &str = "v1.files.error";
pub const QUEUE_PROCESSING: &str = "v1.files.processing";
pub const QUEUE_COMPLETED: &str = "v1.files.completed";
pub const QUEUE_VERIFIED: &str = "v1.files.verified";

/// All durable queues, in declaration order.
pub const QUEUES: [&str; 6] = [
    QUEUE_FILES,
    QUEUE_INBOX,
    QUEUE_ERROR,
    QUEUE_PROCESSING,
    QUEUE_COMPLETED,
    QUEUE_VERIFIED,
];

/// `(routing key pattern, destination queue)` pairs.
pub const BINDINGS: [(&str, &str); 8] = [
    ("accession", QUEUE_FILES),
    ("files", QUEUE_FILES),
    ("mapping", QUEUE_FILES),
    ("files.inbox", QUEUE_INBOX),
    ("files.error", QUEUE_ERROR),
    ("files.processing", QUEUE_PROCESSING),
    ("files.completed", QUEUE_COMPLETED),
    ("files.verified", QUEUE_VERIFIED),
];

/// Topic-exchange pattern match: `*` stands for exactly one word, `#`
/// for zero or more words, words separated by dots.
#[must_use]
pub fn routing_key_matches(pattern: &str, key: &str) -> bool {
    fn matches(pattern: &[&str], key: &[&str]) -> bool {
        match (pattern.split_first(), key.split_first()) {
            (None, None) => true,
            (Some((&"#", rest)), _) => {
                // `#` may swallow zero words or one and keep going.
                matches(rest, key) || (!key.is_empty() && matches(pattern, &key[1..]))
            }
            (Some((&"*", rest)), Some((_, key_rest))) => matches(rest, key_rest),
            (Some((&word, rest)), Some((&key_word, key_rest))) => {
                word == key_word && matches(rest, key_rest)
            }
            _ => false,
        }
    }
    let pattern: Vec<&str> = pattern.split('.').collect();
    let key: Vec<&str> = key.split('.').collect();
    matches(&pattern, &key)
}
