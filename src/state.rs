use serde::{Deserialize, Serialize};

/// A single news article as returned by the search collaborator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Article headline.
    pub title: String,
    /// Source URL.
    pub url: String,
    /// Article body text.
    pub content: String,
}

/// A generated summary of one [`Article`]. `title` and `url` always match
/// the article the summary was produced from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub title: String,
    pub summary: String,
    pub url: String,
}

/// The shared context threaded through a workflow run.
///
/// Each field after `query` is written by exactly one pipeline node and read
/// by the nodes downstream of it. A node never clears a field written
/// upstream; it only adds or overwrites its own. Agents extend the state via
/// the consuming `with_*` helpers rather than mutating in place, so a failed
/// step can never leave a half-written state behind.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    /// The search query. Required before the run starts.
    pub query: String,
    /// Articles found by the search node.
    pub articles: Option<Vec<Article>>,
    /// One summary per article, in article order.
    pub summaries: Option<Vec<Summary>>,
    /// The final compiled report text.
    pub report: Option<String>,
    /// Set by the terminal node when the run reached the end of the graph.
    pub done: bool,
}

impl WorkflowState {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn with_articles(self, articles: Vec<Article>) -> Self {
        Self {
            articles: Some(articles),
            ..self
        }
    }

    pub fn with_summaries(self, summaries: Vec<Summary>) -> Self {
        Self {
            summaries: Some(summaries),
            ..self
        }
    }

    pub fn with_report(self, report: impl Into<String>) -> Self {
        Self {
            report: Some(report.into()),
            ..self
        }
    }

    /// Mark the run as having reached the terminal node.
    pub fn finished(self) -> Self {
        Self { done: true, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(n: u32) -> Article {
        Article {
            title: format!("title {n}"),
            url: format!("https://example.com/{n}"),
            content: format!("content {n}"),
        }
    }

    #[test]
    fn new_sets_query_and_nothing_else() {
        let state = WorkflowState::new("AI safety");
        assert_eq!(state.query, "AI safety");
        assert!(state.articles.is_none());
        assert!(state.summaries.is_none());
        assert!(state.report.is_none());
        assert!(!state.done);
    }

    #[test]
    fn with_articles_preserves_existing_fields() {
        let state = WorkflowState::new("q").with_report("r");
        let state = state.with_articles(vec![article(1)]);

        assert_eq!(state.query, "q");
        assert_eq!(state.report.as_deref(), Some("r"));
        assert_eq!(state.articles.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn helpers_return_new_values_not_aliases() {
        let before = WorkflowState::new("q");
        let after = before.clone().with_articles(vec![article(1)]);

        assert!(before.articles.is_none());
        assert!(after.articles.is_some());
    }

    #[test]
    fn overwrite_replaces_rather_than_appends() {
        let state = WorkflowState::new("q")
            .with_articles(vec![article(1), article(2)])
            .with_articles(vec![article(3)]);

        let articles = state.articles.unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "title 3");
    }

    #[test]
    fn finished_sets_done() {
        let state = WorkflowState::new("q").finished();
        assert!(state.done);
    }
}
