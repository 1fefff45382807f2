//! Runs the news pipeline end to end with stubbed collaborators, so it works
//! offline. Shows graph assembly, tracing hooks, and report persistence.

use newsflow::tools::{FileReportSink, ReportSink, SearchOptions, SearchProvider};
use newsflow::{
    AgentParams, Article, CollaboratorError, Executor, GenerationBackend, GenerationResult,
    Message, ProviderError, WorkflowGraph, WorkflowState,
};
use newsflow::agents::{EndAgent, NewsSearcher, Publisher, Summarizer};

struct CannedSearch;

impl SearchProvider for CannedSearch {
    fn search(
        &self,
        query: &str,
        _options: &SearchOptions,
    ) -> Result<Vec<Article>, CollaboratorError> {
        Ok(vec![
            Article {
                title: format!("Breakthrough in {query}"),
                url: "https://news.example/1".into(),
                content: "Researchers announced a new alignment technique.".into(),
            },
            Article {
                title: "Regulators weigh in".into(),
                url: "https://news.example/2".into(),
                content: "A draft framework for model evaluations was published.".into(),
            },
        ])
    }
}

struct CannedBackend;

impl GenerationBackend for CannedBackend {
    fn generate(&self, messages: &[Message]) -> Result<GenerationResult, ProviderError> {
        // One canned answer per caller: the publisher's prompt mentions the
        // report format, the summarizer's does not.
        let text = if messages[0].content.contains("news report") {
            "## This week in AI\n\nTwo stories worth your time.".to_string()
        } else {
            format!("In short: {}", messages.last().unwrap().content.lines().next().unwrap())
        };
        Ok(GenerationResult { text })
    }

    fn generate_structured(
        &self,
        _messages: &[Message],
        _schema: &serde_json::Value,
    ) -> Result<serde_json::Value, ProviderError> {
        Err(ProviderError::SchemaViolation("demo backend is plain-only".into()))
    }
}

fn main() {
    let graph = WorkflowGraph::builder("news_report")
        .node(
            NewsSearcher::new(Box::new(CannedSearch)),
            AgentParams::default().result_limit(2),
        )
        .node(Summarizer::new(Box::new(CannedBackend)), AgentParams::default())
        .node(Publisher::new(Box::new(CannedBackend)), AgentParams::default())
        .node(EndAgent, AgentParams::default())
        .edge("news_searcher", "summarizer")
        .edge("summarizer", "publisher")
        .edge("publisher", "end")
        .entry("news_searcher")
        .terminal("end")
        .build()
        .expect("static pipeline is valid");

    let mut executor = Executor::new(&graph).with_tracing();
    match executor.run(WorkflowState::new("AI safety")) {
        Ok(state) => {
            println!("=== Summaries ===");
            for summary in state.summaries.as_deref().unwrap_or(&[]) {
                println!("- {} ({})", summary.title, summary.url);
                println!("  {}", summary.summary);
            }

            let report = state.report.as_deref().unwrap_or("");
            println!("\n=== Report ===\n{report}\n");

            let sink = FileReportSink::new("reports");
            let today = chrono::Local::now().date_naive();
            match sink.write_report(report, today) {
                Ok(filename) => println!("saved: reports/{filename}"),
                Err(e) => eprintln!("could not save report: {e}"),
            }
        }
        Err(failure) => {
            eprintln!("run failed at '{}': {}", failure.node, failure.error);
            eprintln!("last good state: {:?}", failure.last_state);
        }
    }
}
