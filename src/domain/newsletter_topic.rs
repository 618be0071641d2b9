use serde::{Deserialize, Serialize};

/// Closed set of content categories a subscriber can opt into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NewsletterTopic {
    Aviation,
    DevStartup,
    Education,
    All,
}

impl NewsletterTopic {
    pub const ALL_TOPICS: [NewsletterTopic; 4] = [
        NewsletterTopic::Aviation,
        NewsletterTopic::DevStartup,
        NewsletterTopic::Education,
        NewsletterTopic::All,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NewsletterTopic::Aviation => "aviation",
            NewsletterTopic::DevStartup => "dev-startup",
            NewsletterTopic::Education => "education",
            NewsletterTopic::All => "all",
        }
    }
}

impl std::fmt::Display for NewsletterTopic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for NewsletterTopic {
    type Error = InvalidNewsletterTopic;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "aviation" => Ok(NewsletterTopic::Aviation),
            "dev-startup" => Ok(NewsletterTopic::DevStartup),
            "education" => Ok(NewsletterTopic::Education),
            "all" => Ok(NewsletterTopic::All),
            other => Err(InvalidNewsletterTopic(other.to_string())),
        }
    }
}

impl Serialize for NewsletterTopic {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NewsletterTopic {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NewsletterTopic::try_from(s.as_str())
            .map_err(serde::de::Error::custom)
    }
}

#[derive(thiserror::Error, Debug)]
#[error("{0} is not a recognized newsletter topic.")]
pub struct InvalidNewsletterTopic(String);
