//! Project comments with `@handle` mentions.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use uuid::Uuid;

fn mention_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // A mention starts a word: "@ana" or "(@ana.perez", but not "ana@uni.cl".
        Regex::new(r"(?:^|[^\w@.])@([A-Za-z0-9][\w.\-]*@?[\w.\-]*[A-Za-z0-9])")
            .expect("mention pattern is a valid literal")
    })
}

/// Handles mentioned in `body`, deduplicated, in order of first appearance.
pub fn parse_mentions(body: &str) -> Vec<String> {
    let mut mentions: Vec<String> = Vec::new();
    for caps in mention_pattern().captures_iter(body) {
        let handle = caps[1].to_lowercase();
        if !mentions.contains(&handle) {
            mentions.push(handle);
        }
    }
    mentions
}

/// A comment left on a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub mentions: Vec<String>,
}

impl Comment {
    pub fn new(author: impl Into<String>, body: impl Into<String>) -> Self {
        let body = body.into();
        Self {
            id: Uuid::new_v4().to_string(),
            author: author.into(),
            mentions: parse_mentions(&body),
            body,
            created_at: Utc::now(),
        }
    }

    pub fn mentions_user(&self, handle: &str) -> bool {
        let handle = handle.to_lowercase();
        self.mentions.iter().any(|m| *m == handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mentions() {
        assert_eq!(
            parse_mentions("@ana revisa esto con @Jorge.Soto y @ana"),
            vec!["ana", "jorge.soto"]
        );
    }

    #[test]
    fn test_email_is_not_a_mention() {
        assert!(parse_mentions("escribir a ana@uni.cl").is_empty());
    }

    #[test]
    fn test_mention_of_email_address() {
        assert_eq!(
            parse_mentions("cc (@ana.perez@uni.cl)."),
            vec!["ana.perez@uni.cl"]
        );
    }

    #[test]
    fn test_comment_new_collects_mentions() {
        let comment = Comment::new("jefe@uni.cl", "Listo el plano, @arq1 por favor revisa");
        assert_eq!(comment.mentions, vec!["arq1"]);
        assert!(comment.mentions_user("ARQ1"));
        assert!(!comment.mentions_user("jefe"));
    }
}
