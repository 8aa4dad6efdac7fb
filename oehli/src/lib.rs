//! ÖHli: keyword-scoring assistant for the ÖH Wirtschaft website.
//!
//! A [`KnowledgeBase`] is a list of intents, each with trigger keywords, a
//! canned response and follow-up buttons. [`Matcher`] scores a free-text
//! question against every intent and picks the best one, falling back to a
//! generic reply when nothing scores high enough.
//!
//! Matching works on a folded alphabet (see [`normalize`]) so umlauts,
//! punctuation and case never decide whether a keyword hits.

use serde::{Deserialize, Serialize};

const EMBEDDED_KNOWLEDGE: &str = include_str!("../knowledge.yaml");

/// Greeting score above which the greeting intent wins outright.
pub const GREETING_THRESHOLD: f64 = 40.0;
/// Minimum score a category needs before it beats the fallback.
pub const CATEGORY_THRESHOLD: f64 = 25.0;

/// Error returned when a knowledge base cannot be loaded.
#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    #[error("invalid knowledge base: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("knowledge base category {0:?} has no keywords")]
    EmptyCategory(String),
}

// =============================================================================
// TYPES
// =============================================================================

/// Follow-up suggestion shown under a reply. Either re-asks ÖHli (`query`)
/// or navigates to a page of the site (`link`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// An intent without an id: the greeting and the fallback.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    #[serde(default)]
    pub keywords: Vec<String>,
    pub response: String,
    #[serde(default)]
    pub buttons: Vec<Button>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub keywords: Vec<String>,
    pub response: String,
    #[serde(default)]
    pub buttons: Vec<Button>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub greeting: Intent,
    pub categories: Vec<Category>,
    #[serde(default)]
    pub quick_actions: Vec<Button>,
    pub fallback: Intent,
}

/// What ÖHli answers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    pub buttons: Vec<Button>,
}

impl From<&Intent> for Reply {
    fn from(intent: &Intent) -> Self {
        Self { text: intent.response.clone(), buttons: intent.buttons.clone() }
    }
}

impl From<&Category> for Reply {
    fn from(category: &Category) -> Self {
        Self { text: category.response.clone(), buttons: category.buttons.clone() }
    }
}

impl KnowledgeBase {
    /// Parse a knowledge base from YAML.
    ///
    /// # Errors
    ///
    /// Returns [`KnowledgeError::Parse`] for malformed YAML and
    /// [`KnowledgeError::EmptyCategory`] when a category could never match.
    pub fn from_yaml(raw: &str) -> Result<Self, KnowledgeError> {
        let kb: Self = serde_yaml::from_str(raw)?;
        if let Some(empty) = kb.categories.iter().find(|c| c.keywords.is_empty()) {
            return Err(KnowledgeError::EmptyCategory(empty.id.clone()));
        }
        Ok(kb)
    }

    /// The knowledge base compiled into the crate.
    ///
    /// # Errors
    ///
    /// Only fails if the bundled `knowledge.yaml` is broken.
    pub fn embedded() -> Result<Self, KnowledgeError> {
        Self::from_yaml(EMBEDDED_KNOWLEDGE)
    }
}

// =============================================================================
// SCORING
// =============================================================================

/// Fold text to lowercase ASCII letters, digits and whitespace.
///
/// German umlauts collapse to their base vowel and `ß` becomes `ss`; every
/// other character outside `[a-z0-9\s]` is dropped.
#[must_use]
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars().flat_map(char::to_lowercase) {
        match c {
            'ä' => out.push('a'),
            'ö' => out.push('o'),
            'ü' => out.push('u'),
            'ß' => out.push_str("ss"),
            c if c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() => out.push(c),
            _ => {}
        }
    }
    out.trim().to_owned()
}

#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text).split_whitespace().map(str::to_owned).collect()
}

#[allow(clippy::cast_precision_loss)]
fn ratio(part: usize, whole: usize) -> f64 {
    part as f64 / whole as f64
}

#[allow(clippy::cast_precision_loss)]
fn as_f64(n: usize) -> f64 {
    n as f64
}

fn keyword_score(query: &str, query_tokens: &[String], keyword: &str) -> f64 {
    let keyword_norm = normalize(keyword);
    if query.is_empty() || keyword_norm.is_empty() {
        return 0.0;
    }
    if query == keyword_norm {
        return 100.0;
    }
    if query.contains(&keyword_norm) {
        return 70.0 + ratio(keyword_norm.len(), query.len()) * 20.0;
    }
    if keyword_norm.contains(query) {
        return 60.0 + ratio(query.len(), keyword_norm.len()) * 20.0;
    }

    let keyword_tokens = tokenize(keyword);
    let mut matched = 0.0;
    let mut partial = 0.0;
    for qt in query_tokens {
        for kt in &keyword_tokens {
            if qt == kt {
                matched += 1.0;
                partial += 15.0;
            } else if kt.starts_with(qt.as_str()) || qt.starts_with(kt.as_str()) {
                matched += 0.7;
                partial += 10.0;
            } else if kt.contains(qt.as_str()) || qt.contains(kt.as_str()) {
                matched += 0.4;
                partial += 6.0;
            }
        }
    }
    if matched > 0.0 {
        let widest = query_tokens.len().max(keyword_tokens.len());
        partial + matched / as_f64(widest) * 30.0
    } else {
        0.0
    }
}

/// Best score of `query` against any of `keywords`, in `0.0..`.
///
/// Exact matches score 100, containment 60..=90, and token overlap adds up
/// per matching token pair plus a coverage bonus.
#[must_use]
pub fn score<S: AsRef<str>>(query: &str, keywords: &[S]) -> f64 {
    let normalized = normalize(query);
    let tokens = tokenize(query);
    keywords
        .iter()
        .map(|k| keyword_score(&normalized, &tokens, k.as_ref()))
        .fold(0.0, f64::max)
}

// =============================================================================
// MATCHER
// =============================================================================

#[derive(Clone, Debug)]
pub struct Matcher {
    knowledge: KnowledgeBase,
}

impl Matcher {
    #[must_use]
    pub fn new(knowledge: KnowledgeBase) -> Self {
        Self { knowledge }
    }

    /// Matcher over the bundled knowledge base.
    ///
    /// # Errors
    ///
    /// See [`KnowledgeBase::embedded`].
    pub fn embedded() -> Result<Self, KnowledgeError> {
        KnowledgeBase::embedded().map(Self::new)
    }

    #[must_use]
    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Answer a question. Blank input yields `None`; anything else gets a
    /// reply, the fallback if no category scores above the threshold.
    #[must_use]
    pub fn find_response(&self, query: &str) -> Option<Reply> {
        if query.trim().is_empty() {
            return None;
        }
        if score(query, &self.knowledge.greeting.keywords) > GREETING_THRESHOLD {
            return Some(self.greeting());
        }

        let mut best: Option<&Category> = None;
        let mut best_score = 0.0;
        for category in &self.knowledge.categories {
            let s = score(query, &category.keywords);
            // Strictly greater: earlier categories win ties.
            if s > best_score {
                best_score = s;
                best = Some(category);
            }
        }

        match best {
            Some(category) if best_score > CATEGORY_THRESHOLD => Some(category.into()),
            _ => Some((&self.knowledge.fallback).into()),
        }
    }

    #[must_use]
    pub fn greeting(&self) -> Reply {
        (&self.knowledge.greeting).into()
    }

    #[must_use]
    pub fn quick_actions(&self) -> &[Button] {
        &self.knowledge.quick_actions
    }
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
