//! Turns a raw video (title, description, transcript) into structured job
//! fields via the extraction service.
//!
//! This is the sole error-containment point for that unreliable call: both
//! operations are infallible at the component boundary. A failed request, an
//! empty reply or unparseable output degrade to the sentinel values, never
//! to an error the pipeline has to handle.

pub mod llm;
pub mod model;
pub mod parse;
pub mod prompts;

pub use llm::{CompletionClient, CompletionError, OpenRouterClient};
pub use model::{ExtractionOutcome, JobDetails, NO_LINK_FOUND, NOT_SPECIFIED};

use std::sync::Arc;
use tracing::warn;

pub struct ContentExtractor {
    llm: Arc<dyn CompletionClient>,
}

impl ContentExtractor {
    pub fn new(llm: Arc<dyn CompletionClient>) -> Self {
        Self { llm }
    }

    /// First application URL found in the description, or [`NO_LINK_FOUND`].
    pub async fn application_link(&self, title: &str, description: &str) -> String {
        let prompt = prompts::application_link(title, description);
        match self.llm.complete(&prompt).await {
            Ok(reply) => parse::normalize_link(&reply).unwrap_or_else(|| NO_LINK_FOUND.to_string()),
            Err(err) => {
                warn!(error = %err, "link extraction call failed");
                NO_LINK_FOUND.to_string()
            }
        }
    }

    /// Structured details from the transcript. Every field is a concrete
    /// value or [`NOT_SPECIFIED`].
    pub async fn job_details(&self, title: &str, transcript: &str) -> JobDetails {
        let prompt = prompts::job_details(title, transcript);
        match self.llm.complete(&prompt).await {
            Ok(reply) => parse::parse_details(&reply).into_details(),
            Err(err) => {
                warn!(error = %err, "detail extraction call failed");
                JobDetails::unspecified()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::llm::MockCompletionClient;
    use super::*;

    fn extractor_replying(reply: &'static str) -> ContentExtractor {
        let mut llm = MockCompletionClient::new();
        llm.expect_complete()
            .returning(move |_| Ok(reply.to_string()));
        ContentExtractor::new(Arc::new(llm))
    }

    fn extractor_failing() -> ContentExtractor {
        let mut llm = MockCompletionClient::new();
        llm.expect_complete()
            .returning(|_| Err(CompletionError::Empty));
        ContentExtractor::new(Arc::new(llm))
    }

    #[tokio::test]
    async fn parsed_reply_produces_details() {
        let extractor = extractor_replying(
            r#"{"company_name":"Acme","role":"SWE","location":"Remote","job_requirements":"• 2 yrs exp","package_range":"Not specified"}"#,
        );
        let details = extractor.job_details("Acme Hiring SWE", "transcript").await;
        assert_eq!(details.company_name, "Acme");
        assert_eq!(details.requirements, "• 2 yrs exp");
    }

    #[tokio::test]
    async fn malformed_reply_degrades_to_sentinels() {
        let extractor = extractor_replying("I could not find a JSON for you, sorry!");
        let details = extractor.job_details("Acme Hiring SWE", "transcript").await;
        assert_eq!(details, JobDetails::unspecified());
    }

    #[tokio::test]
    async fn failed_call_degrades_to_sentinels() {
        let extractor = extractor_failing();
        let details = extractor.job_details("Acme Hiring SWE", "transcript").await;
        assert_eq!(details, JobDetails::unspecified());

        let link = extractor.application_link("Acme Hiring SWE", "desc").await;
        assert_eq!(link, NO_LINK_FOUND);
    }

    #[tokio::test]
    async fn labeled_link_reply_is_normalized() {
        let extractor = extractor_replying("Link: https://jobs.acme.dev/swe-1");
        let link = extractor
            .application_link("Acme Hiring SWE", "Link: https://jobs.acme.dev/swe-1")
            .await;
        assert_eq!(link, "https://jobs.acme.dev/swe-1");
    }
}
