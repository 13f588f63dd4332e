use thiserror::Error;

use super::{build_sentiment_prompt, Credential, GenerateError, TextGenerator};

/// Prefix of every displayed classification failure
pub const ERROR_PREFIX: &str = "An error occurred: ";

#[derive(Error, Debug)]
#[error(transparent)]
pub struct ClassifyError(#[from] pub GenerateError);

impl ClassifyError {
    /// Text shown in place of a classification when the call failed
    pub fn display_text(&self) -> String {
        format!("{ERROR_PREFIX}{}", self.0)
    }

    pub fn reason(&self) -> &GenerateError {
        &self.0
    }
}

/// Classify one post with a single backend call.
///
/// The model's reply is returned unmodified. No retry is attempted.
pub async fn classify<G: TextGenerator>(
    generator: &G,
    post_text: &str,
    credential: &Credential,
) -> Result<String, ClassifyError> {
    let prompt = build_sentiment_prompt(post_text);
    tracing::trace!(post_text, "classifying post");
    let text = generator.generate(credential, &prompt).await?;
    Ok(text)
}

/// Classify one post and render the outcome as displayable text.
pub async fn classify_for_display<G: TextGenerator>(
    generator: &G,
    post_text: &str,
    credential: &Credential,
) -> String {
    match classify(generator, post_text, credential).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, "classification failed");
            e.display_text()
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::MockGenerator;
    use super::*;

    fn key() -> Credential {
        Credential::new(Some("k1".to_owned())).unwrap()
    }

    #[tokio::test]
    async fn test_classify_returns_backend_text_verbatim() {
        let reply = "Sentiment: Positive\nExplanation: praise for the service";
        let mock = MockGenerator::always(reply);

        let text = classify(&mock, "Great service!", &key()).await.unwrap();

        assert_eq!(text, reply);
        assert_eq!(mock.call_count(), 1);
        assert!(mock.prompts()[0].contains("Post: \"Great service!\""));
    }

    #[tokio::test]
    async fn test_failure_is_typed() {
        let mock = MockGenerator::with_replies(vec![Err(GenerateError::Api {
            status: 403,
            message: "API key not valid.".to_owned(),
        })]);

        let err = classify(&mock, "hello", &key()).await.unwrap_err();

        assert!(matches!(err.reason(), GenerateError::Api { status: 403, .. }));
    }

    #[tokio::test]
    async fn test_display_text_carries_error_prefix() {
        let mock = MockGenerator::with_replies(vec![Err(GenerateError::Transport(
            "connection refused".to_owned(),
        ))]);

        let text = classify_for_display(&mock, "hello", &key()).await;

        assert!(text.starts_with(ERROR_PREFIX));
        assert!(text.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_display_text_is_never_empty() {
        let mock = MockGenerator::with_replies(vec![Err(GenerateError::EmptyResponse)]);
        let text = classify_for_display(&mock, "hello", &key()).await;
        assert_eq!(text, "An error occurred: empty response from model");
    }
}
