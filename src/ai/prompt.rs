// Prompt template for post sentiment classification
//
// Asks the model for three labeled fields. The reply is not parsed; callers
// treat it as opaque display text.

/// Build the classification prompt, embedding the post verbatim.
pub fn build_sentiment_prompt(post_text: &str) -> String {
    format!(
        r#"
Analyze the sentiment of the following social media post.

Post: "{post_text}"

Respond with:
- Sentiment: Positive, Negative, or Neutral
- Explanation: Brief reason for the sentiment classification
- Suggestion: (Optional) How the tone could be improved if needed
"#
    )
}
