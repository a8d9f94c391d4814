//! GitHub repository search.

use async_trait::async_trait;
use log::debug;
use reqwest::{header::ACCEPT, Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{string_param, u64_param, ParameterSpec, Tool, GITHUB_SEARCH};
use crate::{error::ProviderError, models::Parameters};

const PROVIDER: &str = "github";
const DEFAULT_PER_PAGE: u64 = 5;
const MAX_PER_PAGE: u64 = 30;

const PARAMETERS: &[ParameterSpec] = &[
    ParameterSpec::required("query", "Search terms"),
    ParameterSpec::optional("per_page", "Number of repositories to return (max 30)"),
    ParameterSpec::optional("sort", "Sort field, defaults to stars"),
    ParameterSpec::optional("order", "Sort order, defaults to desc"),
];

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    total_count: u64,
    #[serde(default)]
    items: Vec<RepositoryItem>,
}

#[derive(Debug, Deserialize)]
struct RepositoryItem {
    name: String,
    full_name: String,
    description: Option<String>,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    language: Option<String>,
    html_url: String,
    #[serde(default)]
    created_at: String,
    #[serde(default)]
    updated_at: String,
    license: Option<License>,
    #[serde(default)]
    topics: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct License {
    name: String,
}

/// Normalised repository entry.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Repository {
    pub name: String,
    pub full_name: String,
    pub description: String,
    pub stars: u64,
    pub forks: u64,
    pub language: String,
    pub url: String,
    pub created_at: String,
    pub updated_at: String,
    pub license: Option<String>,
    pub topics: Vec<String>,
}

impl From<RepositoryItem> for Repository {
    fn from(item: RepositoryItem) -> Self {
        Self {
            name: item.name,
            full_name: item.full_name,
            description: item
                .description
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| "No description".to_string()),
            stars: item.stargazers_count,
            forks: item.forks_count,
            language: item
                .language
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| "Not specified".to_string()),
            url: item.html_url,
            created_at: date_part(&item.created_at),
            updated_at: date_part(&item.updated_at),
            license: item.license.map(|l| l.name),
            topics: item.topics,
        }
    }
}

fn date_part(timestamp: &str) -> String {
    timestamp.chars().take(10).collect()
}

/// Searches public repositories through the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GithubSearch {
    client: Client,
    api_base: String,
}

impl GithubSearch {
    pub fn new(client: Client, api_base: &str) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    fn per_page(params: &Parameters) -> u64 {
        u64_param(params, "per_page")
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE)
    }
}

#[async_trait]
impl Tool for GithubSearch {
    fn name(&self) -> &str {
        GITHUB_SEARCH
    }

    fn description(&self) -> &str {
        "Search GitHub repositories by keyword, sorted by stars"
    }

    fn parameters(&self) -> &[ParameterSpec] {
        PARAMETERS
    }

    async fn fetch(&self, params: &Parameters) -> Result<Value, ProviderError> {
        let query = string_param(params, "query").unwrap_or_default();
        let per_page = Self::per_page(params);
        let sort = string_param(params, "sort").unwrap_or_else(|| "stars".to_string());
        let order = string_param(params, "order").unwrap_or_else(|| "desc".to_string());

        let url = Url::parse_with_params(
            &format!("{}/search/repositories", self.api_base),
            &[
                ("q", query.as_str()),
                ("per_page", per_page.to_string().as_str()),
                ("sort", sort.as_str()),
                ("order", order.as_str()),
            ],
        )
        .map_err(|e| ProviderError::Transport {
            provider: PROVIDER.to_string(),
            message: format!("invalid URL: {e}"),
        })?;

        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/vnd.github.v3+json")
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(PROVIDER, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                provider: PROVIDER.to_string(),
                status: status.as_u16(),
            });
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::from_reqwest(PROVIDER, &e))?;

        let repositories: Vec<Repository> = body.items.into_iter().map(Repository::from).collect();
        Ok(json!({
            "query": query,
            "count": repositories.len(),
            "total_count": body.total_count,
            "repositories": repositories,
            "source": "github_api",
        }))
    }

    fn fallback(&self, params: &Parameters) -> Option<Value> {
        let query = string_param(params, "query").unwrap_or_default();
        let repositories: Vec<Repository> = sample_repositories(&query)
            .into_iter()
            .take(Self::per_page(params) as usize)
            .collect();

        Some(json!({
            "query": query,
            "count": repositories.len(),
            "total_count": repositories.len() * 50,
            "repositories": repositories,
            "source": "fallback_data",
        }))
    }
}

/// Parameter-derived sample repositories.
fn sample_repositories(query: &str) -> Vec<Repository> {
    let samples = [
        (
            "user",
            format!("A sample {query} project demonstrating best practices"),
            150,
            30,
            "Python",
            "MIT",
            ["example", "demo"],
            ("2023-01-15", "2024-12-20"),
        ),
        (
            "org",
            format!("Production-ready {query} application"),
            89,
            15,
            "JavaScript",
            "Apache-2.0",
            ["web", "application"],
            ("2023-05-20", "2024-11-10"),
        ),
        (
            "company",
            format!("Enterprise {query} framework with extensive documentation"),
            256,
            45,
            "Python",
            "GPL-3.0",
            ["framework", "enterprise"],
            ("2022-11-30", "2024-12-15"),
        ),
    ];

    samples
        .into_iter()
        .enumerate()
        .map(
            |(i, (owner, description, stars, forks, language, license, tags, (created, updated)))| {
                let name = format!("{query}-project-{}", i + 1);
                Repository {
                    full_name: format!("{owner}/{name}"),
                    url: format!("https://github.com/example/{name}"),
                    name,
                    description,
                    stars,
                    forks,
                    language: language.to_string(),
                    created_at: created.to_string(),
                    updated_at: updated.to_string(),
                    license: Some(license.to_string()),
                    topics: std::iter::once(query.to_string())
                        .chain(tags.iter().map(|t| t.to_string()))
                        .collect(),
                }
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(value: Value) -> Parameters {
        value.as_object().cloned().unwrap_or_default()
    }

    fn tool() -> GithubSearch {
        GithubSearch::new(Client::new(), "https://api.github.com/")
    }

    #[test]
    fn test_fallback_derives_from_query() {
        let data = tool()
            .fallback(&params(json!({"query": "rust", "per_page": 5})))
            .expect("github has a fallback");

        assert_eq!(data["count"], 3);
        assert_eq!(data["total_count"], 150);
        assert_eq!(data["source"], "fallback_data");
        assert_eq!(data["repositories"][0]["name"], "rust-project-1");
        assert_eq!(data["repositories"][1]["full_name"], "org/rust-project-2");
        assert_eq!(data["repositories"][2]["stars"], 256);
        assert_eq!(
            data["repositories"][0]["topics"],
            json!(["rust", "example", "demo"])
        );
    }

    #[test]
    fn test_fallback_truncates_to_per_page() {
        let data = tool()
            .fallback(&params(json!({"query": "go", "per_page": 2})))
            .expect("github has a fallback");
        assert_eq!(data["count"], 2);
        assert_eq!(data["total_count"], 100);
    }

    #[test]
    fn test_per_page_is_capped() {
        assert_eq!(GithubSearch::per_page(&params(json!({"per_page": 100}))), 30);
        assert_eq!(GithubSearch::per_page(&params(json!({"per_page": 0}))), 1);
        assert_eq!(GithubSearch::per_page(&Parameters::new()), 5);
    }

    #[test]
    fn test_repository_normalisation() {
        let item: RepositoryItem = serde_json::from_value(json!({
            "name": "relay",
            "full_name": "octo/relay",
            "description": null,
            "stargazers_count": 12,
            "forks_count": 3,
            "language": null,
            "html_url": "https://github.com/octo/relay",
            "created_at": "2024-02-03T10:00:00Z",
            "updated_at": "2025-01-01T00:00:00Z",
            "license": {"key": "mit", "name": "MIT License"}
        }))
        .expect("valid item");

        let repo = Repository::from(item);
        assert_eq!(repo.description, "No description");
        assert_eq!(repo.language, "Not specified");
        assert_eq!(repo.created_at, "2024-02-03");
        assert_eq!(repo.license.as_deref(), Some("MIT License"));
        assert!(repo.topics.is_empty());
    }
}
