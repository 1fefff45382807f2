use crate::agent::{Agent, AgentError, AgentParams};
use crate::state::WorkflowState;
use crate::tools::{SearchOptions, SearchProvider};

/// Finds relevant news articles for the state's `query` through a search
/// collaborator and writes them to `articles`.
pub struct NewsSearcher {
    search: Box<dyn SearchProvider>,
}

impl NewsSearcher {
    pub fn new(search: Box<dyn SearchProvider>) -> Self {
        Self { search }
    }
}

impl Agent for NewsSearcher {
    fn name(&self) -> &'static str {
        "news_searcher"
    }

    fn invoke(
        &self,
        state: &WorkflowState,
        params: &AgentParams,
    ) -> Result<WorkflowState, AgentError> {
        if state.query.trim().is_empty() {
            return Err(AgentError::MissingInput("query"));
        }

        let options = SearchOptions {
            result_limit: params.result_limit,
            recency_days: params.recency_days,
        };

        let mut articles = self.search.search(&state.query, &options)?;
        // The collaborator already returns most-relevant-first; just cap.
        articles.truncate(params.result_limit);

        Ok(state.clone().with_articles(articles))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Article;
    use crate::tools::CollaboratorError;

    struct StubSearch {
        results: Vec<Article>,
    }

    impl SearchProvider for StubSearch {
        fn search(
            &self,
            _query: &str,
            _options: &SearchOptions,
        ) -> Result<Vec<Article>, CollaboratorError> {
            Ok(self.results.clone())
        }
    }

    struct FailingSearch;

    impl SearchProvider for FailingSearch {
        fn search(
            &self,
            _query: &str,
            _options: &SearchOptions,
        ) -> Result<Vec<Article>, CollaboratorError> {
            Err(CollaboratorError::Http("connection refused".into()))
        }
    }

    fn article(n: u32) -> Article {
        Article {
            title: format!("t{n}"),
            url: format!("u{n}"),
            content: format!("c{n}"),
        }
    }

    #[test]
    fn writes_articles_in_returned_order() {
        let agent = NewsSearcher::new(Box::new(StubSearch {
            results: vec![article(1), article(2)],
        }));
        let out = agent
            .invoke(&WorkflowState::new("AI"), &AgentParams::default())
            .unwrap();

        let articles = out.articles.unwrap();
        assert_eq!(articles[0].title, "t1");
        assert_eq!(articles[1].title, "t2");
    }

    #[test]
    fn caps_results_at_the_configured_limit() {
        let agent = NewsSearcher::new(Box::new(StubSearch {
            results: (0..10).map(article).collect(),
        }));
        let params = AgentParams::default().result_limit(3);
        let out = agent.invoke(&WorkflowState::new("AI"), &params).unwrap();

        assert_eq!(out.articles.unwrap().len(), 3);
    }

    #[test]
    fn empty_query_is_missing_input() {
        let agent = NewsSearcher::new(Box::new(StubSearch { results: vec![] }));
        let err = agent
            .invoke(&WorkflowState::new("  "), &AgentParams::default())
            .err()
            .unwrap();
        assert!(matches!(err, AgentError::MissingInput("query")));
    }

    #[test]
    fn collaborator_failure_writes_nothing() {
        let agent = NewsSearcher::new(Box::new(FailingSearch));
        let state = WorkflowState::new("AI");
        let err = agent.invoke(&state, &AgentParams::default()).err().unwrap();

        assert!(matches!(err, AgentError::Collaborator(_)));
        assert!(state.articles.is_none());
    }
}
