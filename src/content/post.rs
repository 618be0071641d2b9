use chrono::NaiveDate;
use pulldown_cmark::{html, Options, Parser};

const WORDS_PER_MINUTE: usize = 200;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct FrontMatter {
    pub title: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub draft: bool,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct Post {
    pub slug: String,
    pub title: String,
    pub date: NaiveDate,
    pub tags: Vec<String>,
    pub description: Option<String>,
    pub body: String,
    pub reading_time_minutes: usize,
}

impl Post {
    pub fn parse(slug: &str, document: &str) -> Result<Self, ParsePostError> {
        let (front_matter, body) = split_front_matter(document)?;
        let front_matter: FrontMatter =
            serde_yaml::from_str(front_matter)?;
        let reading_time_minutes = reading_time(body);
        Ok(Post {
            slug: slug.to_string(),
            title: front_matter.title,
            date: front_matter.date,
            tags: front_matter.tags,
            description: front_matter.description,
            body: body.to_string(),
            reading_time_minutes,
        })
    }

    pub fn is_draft(document: &str) -> Result<bool, ParsePostError> {
        let (front_matter, _) = split_front_matter(document)?;
        let front_matter: FrontMatter =
            serde_yaml::from_str(front_matter)?;
        Ok(front_matter.draft)
    }

    pub fn body_html(&self) -> String {
        let parser =
            Parser::new_ext(&self.body, Options::ENABLE_STRIKETHROUGH);
        let mut rendered = String::new();
        html::push_html(&mut rendered, parser);
        rendered
    }
}

fn split_front_matter(
    document: &str,
) -> Result<(&str, &str), ParsePostError> {
    let rest = document
        .strip_prefix("---\n")
        .ok_or(ParsePostError::MissingFrontMatter)?;
    match rest.split_once("\n---\n") {
        Some((front_matter, body)) => Ok((front_matter, body)),
        None => match rest.strip_suffix("\n---") {
            Some(front_matter) => Ok((front_matter, "")),
            None => Err(ParsePostError::MissingFrontMatter),
        },
    }
}

fn reading_time(body: &str) -> usize {
    let words = body.split_whitespace().count();
    std::cmp::max(1, words.div_ceil(WORDS_PER_MINUTE))
}

#[derive(thiserror::Error, Debug)]
pub enum ParsePostError {
    #[error("Document has no front matter block.")]
    MissingFrontMatter,
    #[error("Front matter is not valid YAML.")]
    InvalidFrontMatter(#[from] serde_yaml::Error),
}
