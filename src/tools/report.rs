use std::path::PathBuf;

use chrono::NaiveDate;

use super::CollaboratorError;

/// Persists a finished report somewhere durable.
///
/// Called after a completed run, outside the executor; a sink failure never
/// affects the run's result.
pub trait ReportSink: Send + Sync {
    /// Write `content` stamped with `date`, returning the name it was stored
    /// under.
    fn write_report(&self, content: &str, date: NaiveDate) -> Result<String, CollaboratorError>;
}

/// Writes reports to a directory as `ai_news_report_<YYYY-MM-DD>.md`.
pub struct FileReportSink {
    dir: PathBuf,
}

impl FileReportSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ReportSink for FileReportSink {
    fn write_report(&self, content: &str, date: NaiveDate) -> Result<String, CollaboratorError> {
        let stamp = date.format("%Y-%m-%d");
        let filename = format!("ai_news_report_{stamp}.md");
        let body = format!("Generated on: {stamp}\n\n{content}\n");

        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.dir.join(&filename), body)?;
        Ok(filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    #[test]
    fn filename_follows_the_date_convention() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileReportSink::new(dir.path());

        let name = sink.write_report("weekly news", date()).unwrap();
        assert_eq!(name, "ai_news_report_2025-03-14.md");
    }

    #[test]
    fn written_file_carries_header_and_content() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileReportSink::new(dir.path());

        let name = sink.write_report("weekly news", date()).unwrap();
        let body = std::fs::read_to_string(dir.path().join(name)).unwrap();
        assert!(body.starts_with("Generated on: 2025-03-14"));
        assert!(body.contains("weekly news"));
    }

    #[test]
    fn unwritable_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not_a_dir");
        std::fs::write(&file, "x").unwrap();

        let sink = FileReportSink::new(&file);
        let err = sink.write_report("r", date()).err().unwrap();
        assert!(matches!(err, CollaboratorError::Io(_)));
    }
}
