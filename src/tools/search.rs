use serde::{Deserialize, Serialize};

use super::CollaboratorError;
use crate::state::Article;

const TAVILY_API_URL: &str = "https://api.tavily.com/search";

/// Caller-side knobs for one search call.
#[derive(Clone, Copy, Debug)]
pub struct SearchOptions {
    /// Maximum number of results to request and consume.
    pub result_limit: usize,
    /// Only consider articles published within this many days.
    pub recency_days: u32,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            result_limit: 5,
            recency_days: 7,
        }
    }
}

/// A news-search service.
///
/// Implementations return articles in their own relevance order; the caller
/// consumes at most `result_limit` of them and does no re-ranking.
pub trait SearchProvider: Send + Sync {
    fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<Article>, CollaboratorError>;
}

/// Tavily news-search adapter.
pub struct TavilySearch {
    http: ureq::Agent,
    endpoint: String,
    api_key: String,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    topic: &'static str,
    search_depth: &'static str,
    days: u32,
    max_results: usize,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Deserialize)]
struct SearchResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

impl TavilySearch {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_endpoint(api_key, TAVILY_API_URL)
    }

    pub fn with_endpoint(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(std::time::Duration::from_secs(30)))
            .build();

        Self {
            http: config.into(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    fn parse(body: &str) -> Result<Vec<Article>, CollaboratorError> {
        let response: SearchResponse = serde_json::from_str(body)
            .map_err(|e| CollaboratorError::MalformedResponse(e.to_string()))?;

        Ok(response
            .results
            .into_iter()
            .map(|r| Article {
                title: r.title,
                url: r.url,
                content: r.content,
            })
            .collect())
    }
}

impl SearchProvider for TavilySearch {
    fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<Article>, CollaboratorError> {
        let request = SearchRequest {
            api_key: &self.api_key,
            query,
            topic: "news",
            search_depth: "advanced",
            days: options.recency_days,
            max_results: options.result_limit,
        };

        let body = self
            .http
            .post(&self.endpoint)
            .send_json(&request)?
            .body_mut()
            .read_to_string()?;

        Self::parse(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "query": "AI safety",
        "results": [
            {"title": "First", "url": "https://a.example/1", "content": "alpha", "score": 0.9},
            {"title": "Second", "url": "https://a.example/2", "content": "beta", "score": 0.7}
        ],
        "response_time": 1.2
    }"#;

    #[test]
    fn parse_preserves_returned_order() {
        let articles = TavilySearch::parse(FIXTURE).unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "First");
        assert_eq!(articles[0].url, "https://a.example/1");
        assert_eq!(articles[1].content, "beta");
    }

    #[test]
    fn parse_rejects_non_json_body() {
        let err = TavilySearch::parse("<html>not json</html>").err().unwrap();
        assert!(matches!(err, CollaboratorError::MalformedResponse(_)));
    }

    #[test]
    fn parse_accepts_empty_result_set() {
        let articles = TavilySearch::parse(r#"{"results": []}"#).unwrap();
        assert!(articles.is_empty());
    }

    #[test]
    fn unreachable_endpoint_is_a_collaborator_error() {
        let search = TavilySearch::with_endpoint("key", "http://localhost:1/search");
        let err = search
            .search("q", &SearchOptions::default())
            .err()
            .unwrap();
        assert!(matches!(err, CollaboratorError::Http(_)));
    }
}
