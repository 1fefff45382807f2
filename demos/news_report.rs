//! Runs the real pipeline against live providers.
//!
//! Requires `TAVILY_API_KEY`, and an API key for the chosen provider unless
//! it is local:
//!
//! ```text
//! NEWSFLOW_PROVIDER=openai OPENAI_API_KEY=... TAVILY_API_KEY=... \
//!     cargo run --example news_report "AI safety"
//! ```

use newsflow::tools::{FileReportSink, ReportSink, TavilySearch};
use newsflow::{
    AgentParams, BackendFactory, BackendOptions, Executor, WorkflowState, news_pipeline,
};

fn main() {
    let query = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "artificial intelligence".to_string());
    let provider = std::env::var("NEWSFLOW_PROVIDER").unwrap_or_else(|_| "openai".to_string());
    let model = std::env::var("NEWSFLOW_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());

    let Ok(tavily_key) = std::env::var("TAVILY_API_KEY") else {
        eprintln!("TAVILY_API_KEY is not set");
        std::process::exit(1);
    };

    let mut options = BackendOptions::new(model).temperature(0.0);
    // Provider key, if the provider wants one.
    for var in ["OPENAI_API_KEY", "GROQ_API_KEY", "ANTHROPIC_API_KEY"] {
        if let Ok(key) = std::env::var(var) {
            options = options.api_key(key);
            break;
        }
    }

    let factory = BackendFactory::with_defaults();
    let graph = match news_pipeline(
        &factory,
        &provider,
        &options,
        Box::new(TavilySearch::new(tavily_key)),
        AgentParams::default().result_limit(5).recency_days(7),
    ) {
        Ok(graph) => graph,
        Err(e) => {
            eprintln!("could not assemble pipeline: {e}");
            std::process::exit(1);
        }
    };

    let mut executor = Executor::new(&graph).with_tracing();
    match executor.run(WorkflowState::new(query)) {
        Ok(state) => {
            let report = state.report.as_deref().unwrap_or("");
            println!("{report}");

            let sink = FileReportSink::new("reports");
            let today = chrono::Local::now().date_naive();
            match sink.write_report(report, today) {
                Ok(filename) => eprintln!("saved: reports/{filename}"),
                Err(e) => eprintln!("could not save report: {e}"),
            }
        }
        Err(failure) => {
            eprintln!("run failed at '{}': {}", failure.node, failure.error);
            std::process::exit(1);
        }
    }
}
