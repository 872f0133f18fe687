use serde::{Deserialize, Serialize};

/// Display tag of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Error,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Error => "error",
        }
    }
}

/// A retrieval citation attached to an assistant answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    /// Nullable on the backend side.
    #[serde(default)]
    pub claim_id: Option<String>,
    pub retrieval_score: f64,
    pub excerpt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    /// Seconds spent by the backend answering the query.
    pub processing_latency: f64,
    pub llm_type: String,
}

/// One entry of the chat transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Source>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ResponseMetadata>,
}

impl Message {
    fn plain(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            sources: None,
            metadata: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::plain(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::plain(Role::User, content)
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self::plain(Role::Error, content)
    }

    pub fn assistant(
        content: impl Into<String>,
        sources: Option<Vec<Source>>,
        metadata: Option<ResponseMetadata>,
    ) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            sources,
            metadata,
        }
    }
}
