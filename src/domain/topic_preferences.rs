use super::NewsletterTopic;

/// Desired subscription value for every enumerated topic.
///
/// Serialized shape matches the public API: one boolean per topic,
/// keyed by the kebab-case topic name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TopicPreferences {
    pub aviation: bool,
    #[serde(rename = "dev-startup")]
    pub dev_startup: bool,
    pub education: bool,
    pub all: bool,
}

impl TopicPreferences {
    pub fn none() -> Self {
        Self {
            aviation: false,
            dev_startup: false,
            education: false,
            all: false,
        }
    }

    pub fn any_subscribed(&self) -> bool {
        self.aviation || self.dev_startup || self.education || self.all
    }

    pub fn get(&self, topic: NewsletterTopic) -> bool {
        match topic {
            NewsletterTopic::Aviation => self.aviation,
            NewsletterTopic::DevStartup => self.dev_startup,
            NewsletterTopic::Education => self.education,
            NewsletterTopic::All => self.all,
        }
    }

    pub fn set(&mut self, topic: NewsletterTopic, value: bool) {
        match topic {
            NewsletterTopic::Aviation => self.aviation = value,
            NewsletterTopic::DevStartup => self.dev_startup = value,
            NewsletterTopic::Education => self.education = value,
            NewsletterTopic::All => self.all = value,
        }
    }

    /// Entries in the enumeration order of the topic set.
    pub fn entries(&self) -> [(NewsletterTopic, bool); 4] {
        NewsletterTopic::ALL_TOPICS.map(|topic| (topic, self.get(topic)))
    }

    pub fn subscribed_topics(&self) -> Vec<NewsletterTopic> {
        self.entries()
            .into_iter()
            .filter_map(|(topic, on)| on.then_some(topic))
            .collect()
    }

    pub fn from_subscribed_topics(topics: &[NewsletterTopic]) -> Self {
        let mut preferences = Self::none();
        for topic in topics {
            preferences.set(*topic, true);
        }
        preferences
    }
}
