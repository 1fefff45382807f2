use crate::agent::{Agent, AgentError, AgentParams};
use crate::backend::{GenerationBackend, Message};
use crate::state::{Article, Summary, WorkflowState};

const SYSTEM_PROMPT: &str = "You are an AI expert who makes complex topics accessible \
to general audiences. Summarize this article in 2-3 sentences, focusing on the key \
points and explaining any technical terms simply.";

/// Summarizes each found article with one plain-mode generation call,
/// writing one `Summary` per `Article` in input order.
///
/// Partial-failure policy: fail fast. The first article whose generation
/// fails aborts the node and `summaries` stays unwritten, so downstream
/// nodes never see a truncated list.
pub struct Summarizer {
    backend: Box<dyn GenerationBackend>,
}

impl Summarizer {
    pub fn new(backend: Box<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    fn summarize(&self, article: &Article, system: &str) -> Result<String, AgentError> {
        let messages = [
            Message::system(system),
            Message::user(format!(
                "Title: {}\n\nContent: {}",
                article.title, article.content
            )),
        ];
        let result = self.backend.generate(&messages)?;
        Ok(result.text)
    }
}

impl Agent for Summarizer {
    fn name(&self) -> &'static str {
        "summarizer"
    }

    fn invoke(
        &self,
        state: &WorkflowState,
        params: &AgentParams,
    ) -> Result<WorkflowState, AgentError> {
        let articles = state
            .articles
            .as_ref()
            .ok_or(AgentError::MissingInput("articles"))?;
        let system = params.system_prompt.as_deref().unwrap_or(SYSTEM_PROMPT);

        let mut summaries = Vec::with_capacity(articles.len());
        for article in articles {
            let summary = self.summarize(article, system)?;
            summaries.push(Summary {
                title: article.title.clone(),
                summary,
                url: article.url.clone(),
            });
        }

        Ok(state.clone().with_summaries(summaries))
    }
}
