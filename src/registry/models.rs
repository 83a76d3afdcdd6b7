use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single image stored in a registry repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Tags attached to the image, in the order the registry reports them
    #[serde(default)]
    pub tags: Vec<String>,
    /// Content digest (e.g., "sha256:...")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    /// When the image was pushed, if the registry reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pushed_at: Option<DateTime<Utc>>,
}

impl ImageRecord {
    /// Create a record carrying only tags
    pub fn with_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// First tag of the image, if it has any
    pub fn first_tag(&self) -> Option<&str> {
        self.tags.first().map(String::as_str)
    }
}

/// Configuration for the AWS ECR registry client
#[derive(Debug, Clone, Deserialize)]
pub struct EcrConfig {
    /// AWS region the repositories live in (e.g., "us-east-1")
    #[serde(default = "default_region")]
    pub region: String,
    /// Optional endpoint override (e.g., a LocalStack URL)
    #[serde(default)]
    pub endpoint_url: Option<String>,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl Default for EcrConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            endpoint_url: None,
        }
    }
}

/// Order records most recently pushed first.
///
/// Records without a push timestamp are moved behind timestamped ones and keep
/// their relative order.
pub fn sort_most_recent_first(records: &mut [ImageRecord]) {
    records.sort_by(|a, b| match (a.pushed_at, b.pushed_at) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn pushed(tag: &str, secs: Option<i64>) -> ImageRecord {
        ImageRecord {
            tags: vec![tag.to_string()],
            digest: None,
            pushed_at: secs.map(|s| Utc.timestamp_opt(s, 0).unwrap()),
        }
    }

    #[test]
    fn test_first_tag() {
        assert_eq!(ImageRecord::with_tags(["v2", "v1"]).first_tag(), Some("v2"));
        assert_eq!(ImageRecord::default().first_tag(), None);
    }

    #[test]
    fn test_sort_most_recent_first() {
        let mut records = vec![
            pushed("old", Some(100)),
            pushed("untimed-a", None),
            pushed("new", Some(300)),
            pushed("untimed-b", None),
            pushed("mid", Some(200)),
        ];
        sort_most_recent_first(&mut records);

        let order: Vec<_> = records.iter().filter_map(|r| r.first_tag()).collect();
        assert_eq!(order, vec!["new", "mid", "old", "untimed-a", "untimed-b"]);
    }
}
