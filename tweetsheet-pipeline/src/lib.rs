//! The sequential posting loop: compose a tweet per sheet row, publish it,
//! pause, move on.
//!
//! Row order is publish order. A failure while composing or publishing one
//! row skips that row and continues immediately; the fixed pause applies
//! only after a successful publish, and never after the final row. The loop
//! itself is infallible once it has rows: per-row failures are recorded as
//! [`RowOutcome::Skipped`], not propagated.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use tweetsheet_common::Result;
use tweetsheet_llm::LlmClient;
use tweetsheet_sheets::SheetRow;
use tweetsheet_social::TwitterApi;

/// Fixed pause after each successful publish, to stay under the platform's
/// rate limit. No adaptive backoff, no jitter.
pub const POST_DELAY: Duration = Duration::from_secs(5);

/// Turns one sheet row into post text.
#[async_trait]
pub trait TweetComposer: Send + Sync {
    async fn compose(&self, row: &SheetRow) -> Result<String>;
}

/// Publishes post text, returning the platform id of the created post.
#[async_trait]
pub trait TweetPublisher: Send + Sync {
    async fn publish(&self, text: &str) -> Result<String>;
}

/// Composer backed by any [`LlmClient`].
pub struct LlmComposer {
    llm: Arc<dyn LlmClient>,
}

impl LlmComposer {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl TweetComposer for LlmComposer {
    async fn compose(&self, row: &SheetRow) -> Result<String> {
        self.llm.compose_tweet(&row.content, &row.tag).await
    }
}

#[async_trait]
impl TweetPublisher for TwitterApi {
    async fn publish(&self, text: &str) -> Result<String> {
        let posted = self.create_tweet(text).await?;
        Ok(posted.id)
    }
}

/// Terminal state of one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Published { tweet_id: String },
    Skipped { reason: String },
}

/// Per-row outcomes in sheet order, for logging. The HTTP response does not
/// distinguish partial from full success; this report is where the detail
/// lives.
#[derive(Debug, Default)]
pub struct PipelineReport {
    pub outcomes: Vec<RowOutcome>,
}

impl PipelineReport {
    pub fn published(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, RowOutcome::Published { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.published()
    }
}

pub struct TweetPipeline<C, P> {
    composer: C,
    publisher: P,
    post_delay: Duration,
}

impl<C: TweetComposer, P: TweetPublisher> TweetPipeline<C, P> {
    pub fn new(composer: C, publisher: P) -> Self {
        Self {
            composer,
            publisher,
            post_delay: POST_DELAY,
        }
    }

    /// Override the post-success pause (operational knob; tests use a short
    /// delay, production keeps [`POST_DELAY`]).
    pub fn with_post_delay(mut self, delay: Duration) -> Self {
        self.post_delay = delay;
        self
    }

    /// Drive every row to a terminal state, in order.
    pub async fn run(&self, rows: &[SheetRow]) -> PipelineReport {
        let mut report = PipelineReport::default();

        for (index, row) in rows.iter().enumerate() {
            tracing::info!(index, content = %row.content, tag = %row.tag, "row.preparing");

            let outcome = self.process_row(row).await;
            let published = matches!(outcome, RowOutcome::Published { .. });
            match &outcome {
                RowOutcome::Published { tweet_id } => {
                    tracing::info!(index, %tweet_id, "row.published");
                }
                RowOutcome::Skipped { reason } => {
                    tracing::warn!(index, %reason, "row.skipped");
                }
            }
            report.outcomes.push(outcome);

            // Rate-limit pause, only between rows and only after a publish.
            if published && index + 1 < rows.len() {
                sleep(self.post_delay).await;
            }
        }

        tracing::info!(
            published = report.published(),
            skipped = report.skipped(),
            "pipeline.finished"
        );
        report
    }

    async fn process_row(&self, row: &SheetRow) -> RowOutcome {
        let text = match self.composer.compose(row).await {
            Ok(text) => text,
            Err(e) => {
                return RowOutcome::Skipped {
                    reason: e.to_string(),
                }
            }
        };

        match self.publisher.publish(&text).await {
            Ok(tweet_id) => RowOutcome::Published { tweet_id },
            Err(e) => RowOutcome::Skipped {
                reason: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::time::Instant;
    use tweetsheet_common::TweetsheetError;

    fn row(content: &str, tag: &str) -> SheetRow {
        SheetRow {
            content: content.to_string(),
            tag: tag.to_string(),
        }
    }

    /// Composer scripted per row index: `Some(text)` composes, `None` fails.
    struct ScriptedComposer {
        script: Vec<Option<&'static str>>,
        calls: Mutex<Vec<String>>,
        cursor: Mutex<usize>,
    }

    impl ScriptedComposer {
        fn new(script: Vec<Option<&'static str>>) -> Self {
            Self {
                script,
                calls: Mutex::new(Vec::new()),
                cursor: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl TweetComposer for ScriptedComposer {
        async fn compose(&self, row: &SheetRow) -> Result<String> {
            self.calls.lock().unwrap().push(row.content.clone());
            let mut cursor = self.cursor.lock().unwrap();
            let step = self.script[*cursor];
            *cursor += 1;
            match step {
                Some(text) => Ok(text.to_string()),
                None => Err(TweetsheetError::Generation("model unavailable".into())),
            }
        }
    }

    /// Publisher that records published text; fails when text contains
    /// "reject".
    struct RecordingPublisher {
        published: Mutex<Vec<String>>,
    }

    impl RecordingPublisher {
        fn new() -> Self {
            Self {
                published: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TweetPublisher for RecordingPublisher {
        async fn publish(&self, text: &str) -> Result<String> {
            if text.contains("reject") {
                return Err(TweetsheetError::Publish("duplicate content".into()));
            }
            let mut published = self.published.lock().unwrap();
            published.push(text.to_string());
            Ok(format!("id-{}", published.len()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn all_success_runs_in_order_with_n_minus_one_delays() {
        let composer = ScriptedComposer::new(vec![Some("t1"), Some("t2"), Some("t3")]);
        let publisher = RecordingPublisher::new();
        let pipeline = TweetPipeline::new(composer, publisher);

        let rows = vec![row("a", "#a"), row("b", "#b"), row("c", "#c")];
        let start = Instant::now();
        let report = pipeline.run(&rows).await;

        // Three successes, two inter-row pauses, none after the last row.
        assert_eq!(start.elapsed(), POST_DELAY * 2);
        assert_eq!(report.published(), 3);
        assert_eq!(report.skipped(), 0);

        let composed = pipeline.composer.calls.lock().unwrap().clone();
        assert_eq!(composed, vec!["a", "b", "c"]);
        let published = pipeline.publisher.published.lock().unwrap().clone();
        assert_eq!(published, vec!["t1", "t2", "t3"]);
    }

    #[tokio::test(start_paused = true)]
    async fn compose_failure_skips_publish_and_delay() {
        let composer = ScriptedComposer::new(vec![Some("t1"), None, Some("t3")]);
        let publisher = RecordingPublisher::new();
        let pipeline = TweetPipeline::new(composer, publisher);

        let rows = vec![row("a", "#a"), row("b", "#b"), row("c", "#c")];
        let start = Instant::now();
        let report = pipeline.run(&rows).await;

        // Only the first publish is followed by a pause; the skipped middle
        // row moves on immediately.
        assert_eq!(start.elapsed(), POST_DELAY);
        assert_eq!(report.published(), 2);
        assert_eq!(report.skipped(), 1);
        assert_eq!(
            report.outcomes[1],
            RowOutcome::Skipped {
                reason: "Generation error: model unavailable".to_string()
            }
        );

        // The failed row's publish step never ran.
        let published = pipeline.publisher.published.lock().unwrap().clone();
        assert_eq!(published, vec!["t1", "t3"]);
    }

    #[tokio::test(start_paused = true)]
    async fn publish_failure_skips_delay_and_continues() {
        let composer = ScriptedComposer::new(vec![Some("reject me"), Some("t2")]);
        let publisher = RecordingPublisher::new();
        let pipeline = TweetPipeline::new(composer, publisher);

        let rows = vec![row("a", "#a"), row("b", "#b")];
        let start = Instant::now();
        let report = pipeline.run(&rows).await;

        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(report.published(), 1);
        assert_eq!(report.skipped(), 1);
        assert!(matches!(report.outcomes[0], RowOutcome::Skipped { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_sheet_does_nothing() {
        let composer = ScriptedComposer::new(vec![]);
        let publisher = RecordingPublisher::new();
        let pipeline = TweetPipeline::new(composer, publisher);

        let report = pipeline.run(&[]).await;

        assert!(report.outcomes.is_empty());
        assert!(pipeline.composer.calls.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn single_row_success_has_no_trailing_delay() {
        let composer = ScriptedComposer::new(vec![Some("t1")]);
        let publisher = RecordingPublisher::new();
        let pipeline = TweetPipeline::new(composer, publisher);

        let start = Instant::now();
        let report = pipeline.run(&[row("a", "#a")]).await;

        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(report.published(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn custom_delay_is_honored() {
        let composer = ScriptedComposer::new(vec![Some("t1"), Some("t2")]);
        let publisher = RecordingPublisher::new();
        let pipeline =
            TweetPipeline::new(composer, publisher).with_post_delay(Duration::from_millis(10));

        let start = Instant::now();
        pipeline.run(&[row("a", "#a"), row("b", "#b")]).await;

        assert_eq!(start.elapsed(), Duration::from_millis(10));
    }
}
