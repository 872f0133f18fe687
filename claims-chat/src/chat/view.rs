//! Render-ready projections of transcript messages.

use crate::models::{Message, ResponseMetadata, Role, Source};

#[derive(Debug, Clone, PartialEq)]
pub struct SourceView {
    pub summary: String,
    pub excerpt: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessageView {
    pub role: &'static str,
    /// Bubble alignment: user messages sit on the right.
    pub align: &'static str,
    pub content: String,
    pub sources: Vec<SourceView>,
    pub footer: Option<String>,
}

/// `Claim: C-1 (Score: 0.82)`
pub fn source_summary(source: &Source) -> String {
    format!(
        "Claim: {} (Score: {:.2})",
        source.claim_id.as_deref().unwrap_or("-"),
        source.retrieval_score
    )
}

/// `Latency: 0.042s | Model: mock`
pub fn metadata_footer(metadata: &ResponseMetadata) -> String {
    format!(
        "Latency: {:.3}s | Model: {}",
        metadata.processing_latency, metadata.llm_type
    )
}

impl From<&Message> for MessageView {
    fn from(message: &Message) -> Self {
        let align = match message.role {
            Role::User => "end",
            Role::System | Role::Assistant | Role::Error => "start",
        };

        // Only assistant answers carry citations and timing.
        let (sources, footer) = match message.role {
            Role::Assistant => (
                message
                    .sources
                    .iter()
                    .flatten()
                    .map(|source| SourceView {
                        summary: source_summary(source),
                        excerpt: source.excerpt.clone(),
                    })
                    .collect(),
                message.metadata.as_ref().map(metadata_footer),
            ),
            Role::System | Role::User | Role::Error => (Vec::new(), None),
        };

        Self {
            role: message.role.as_str(),
            align,
            content: message.content.clone(),
            sources,
            footer,
        }
    }
}

pub fn transcript_views(transcript: &[Message]) -> Vec<MessageView> {
    transcript.iter().map(MessageView::from).collect()
}
