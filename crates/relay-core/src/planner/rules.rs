//! The ordered rule table.
//!
//! Rules are evaluated top to bottom and each matching rule emits exactly one
//! step. Parameter extraction inside a rule is first-match-wins over ordered
//! lists, and always produces every required parameter.

use serde_json::json;

use super::TaskText;
use crate::{
    models::Parameters,
    tools::{title_case, GITHUB_SEARCH, WEATHER_LOOKUP},
};

/// Tool used when no rule matches.
pub const DEFAULT_TOOL: &str = GITHUB_SEARCH;

pub const SEARCH_KEYWORDS: &[&str] = &[
    "github",
    "repo",
    "repository",
    "code",
    "project",
    "search",
    "find",
];

pub const WEATHER_KEYWORDS: &[&str] = &[
    "weather",
    "temp",
    "temperature",
    "forecast",
    "climate",
    "humid",
];

pub const LANGUAGES: &[&str] = &[
    "python",
    "javascript",
    "java",
    "typescript",
    "go",
    "rust",
    "php",
    "swift",
    "c++",
    "c#",
];

pub const TOPICS: &[&str] = &[
    "machine learning",
    "artificial intelligence",
    "ai",
    "ml",
    "deep learning",
    "web development",
    "data science",
    "blockchain",
    "iot",
    "cloud computing",
    "devops",
];

pub const CITIES: &[&str] = &[
    "tokyo",
    "london",
    "new york",
    "paris",
    "berlin",
    "mumbai",
    "delhi",
    "beijing",
    "shanghai",
    "dubai",
    "singapore",
    "sydney",
    "san francisco",
    "los angeles",
    "chicago",
    "toronto",
    "moscow",
    "rome",
    "madrid",
    "amsterdam",
    "vienna",
    "prague",
    "budapest",
];

/// Prepositions that introduce a city, in priority order.
const CITY_MARKERS: &[&str] = &["in", "at", "for"];

/// Words skipped when reading the city after a marker.
const CITY_STOPWORDS: &[&str] = &["the", "a", "an", "my", "our", "this", "that"];

const DEFAULT_CITY: &str = "London";
const DEFAULT_PER_PAGE: u64 = 5;

/// A step produced by a rule, before numbering.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedStep {
    pub description: String,
    pub parameters: Parameters,
    pub reasoning: String,
}

/// One entry of the rule table.
#[derive(Debug, Clone, Copy)]
pub struct PlanRule {
    /// Tool the emitted step invokes
    pub tool: &'static str,
    /// A keyword matches any word that starts with it
    pub keywords: &'static [&'static str],
    pub plan: fn(&TaskText) -> PlannedStep,
}

impl PlanRule {
    pub fn matches(&self, text: &TaskText) -> bool {
        self.keywords
            .iter()
            .any(|keyword| text.has_word_starting_with(keyword))
    }
}

/// Built-in rules: repository search first, then weather.
pub const DEFAULT_RULES: &[PlanRule] = &[
    PlanRule {
        tool: GITHUB_SEARCH,
        keywords: SEARCH_KEYWORDS,
        plan: search_step,
    },
    PlanRule {
        tool: WEATHER_LOOKUP,
        keywords: WEATHER_KEYWORDS,
        plan: weather_step,
    },
];

fn parameters(value: serde_json::Value) -> Parameters {
    match value {
        serde_json::Value::Object(map) => map,
        _ => Parameters::new(),
    }
}

/// Search query: a language, else a topic, else "open source" for explicit
/// GitHub/repository requests, else "ai".
pub fn extract_query(text: &TaskText) -> String {
    if let Some(language) = LANGUAGES.iter().find(|l| text.contains_phrase(l)) {
        return (*language).to_string();
    }
    if let Some(topic) = TOPICS.iter().find(|t| text.contains_phrase(t)) {
        return (*topic).to_string();
    }
    if text.has_word_starting_with("github") || text.has_word_starting_with("repo") {
        return "open source".to_string();
    }
    "ai".to_string()
}

/// City: a known city, else the word after `in`/`at`/`for`, else London.
pub fn extract_city(text: &TaskText) -> String {
    if let Some(city) = CITIES.iter().find(|c| text.contains_phrase(c)) {
        return title_case(city);
    }
    CITY_MARKERS
        .iter()
        .find_map(|marker| text.word_after(marker, CITY_STOPWORDS))
        .map(title_case)
        .unwrap_or_else(|| DEFAULT_CITY.to_string())
}

fn search_step(text: &TaskText) -> PlannedStep {
    let query = extract_query(text);
    PlannedStep {
        description: format!("Search GitHub for '{query}' repositories"),
        parameters: parameters(json!({"query": query, "per_page": DEFAULT_PER_PAGE})),
        reasoning: format!("User wants to search for {query} repositories."),
    }
}

fn weather_step(text: &TaskText) -> PlannedStep {
    let city = extract_city(text);
    PlannedStep {
        description: format!("Get current weather in {city}"),
        parameters: parameters(json!({ "city": city })),
        reasoning: format!("User wants weather information for {city}."),
    }
}

/// Step used when no rule matches.
pub fn default_step() -> PlannedStep {
    PlannedStep {
        description: "Search GitHub for trending AI repositories".to_string(),
        parameters: parameters(json!({
            "query": "artificial intelligence",
            "per_page": DEFAULT_PER_PAGE,
        })),
        reasoning: "No specific task mentioned. Providing GitHub search as example.".to_string(),
    }
}
