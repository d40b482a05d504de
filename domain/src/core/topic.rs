//! Topic value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// The subject a discussion is about (Value Object)
///
/// Becomes the first record of every transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    content: String,
}

impl Topic {
    /// Create a topic, rejecting empty or whitespace-only text
    pub fn try_new(content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(DomainError::InvalidTopic(
                "topic cannot be empty".to_string(),
            ));
        }
        Ok(Self { content })
    }

    /// Get the topic text
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Consume and return the inner text
    pub fn into_content(self) -> String {
        self.content
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl TryFrom<&str> for Topic {
    type Error = DomainError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Topic::try_new(s)
    }
}

impl TryFrom<String> for Topic {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Topic::try_new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_topic() {
        let topic = Topic::try_new("Will AI replace programmers?").unwrap();
        assert_eq!(topic.content(), "Will AI replace programmers?");
        assert_eq!(topic.to_string(), "Will AI replace programmers?");
    }

    #[test]
    fn test_blank_topic_rejected() {
        assert!(matches!(
            Topic::try_new("   \n\t"),
            Err(DomainError::InvalidTopic(_))
        ));
        assert!(Topic::try_from("").is_err());
    }

    #[test]
    fn test_surrounding_whitespace_is_kept() {
        let topic = Topic::try_from(String::from("  pineapple pizza ")).unwrap();
        assert_eq!(topic.into_content(), "  pineapple pizza ");
    }
}
