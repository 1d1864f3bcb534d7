use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::entity::Resource;
use super::types::ResourceId;
use crate::scoring::CriterionScores;

/// Raw, loosely-typed resource input as received from a caller.
///
/// Fields are kept as JSON values so that wrong types are reported by validation
/// instead of failing deserialization wholesale.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourceInput {
    #[serde(default, alias = "resource_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl ResourceInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn title(mut self, title: impl Into<Value>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<Value>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn author(mut self, author: impl Into<Value>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn url(mut self, url: impl Into<Value>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn publication_date(mut self, date: impl Into<Value>) -> Self {
        self.publication_date = Some(date.into());
        self
    }

    pub fn metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    fn text(field: &Option<Value>) -> &str {
        field.as_ref().and_then(Value::as_str).unwrap_or_default()
    }

    /// Caller-supplied id, or one derived from title and URL.
    pub fn resource_id(&self) -> ResourceId {
        match &self.id {
            Some(id) if !id.trim().is_empty() => ResourceId::new(id.trim()),
            _ => ResourceId::derive(Self::text(&self.title), Self::text(&self.url)),
        }
    }
}

/// Input accepted by the orchestrator: raw fields, or an already-built entity.
#[derive(Debug, Clone, PartialEq)]
pub enum RatingInput {
    Raw(ResourceInput),
    Entity(Box<Resource>),
}

impl RatingInput {
    pub fn resource_id(&self) -> ResourceId {
        match self {
            RatingInput::Raw(input) => input.resource_id(),
            RatingInput::Entity(resource) => resource.id().clone(),
        }
    }
}

impl From<ResourceInput> for RatingInput {
    fn from(input: ResourceInput) -> Self {
        RatingInput::Raw(input)
    }
}

impl From<Resource> for RatingInput {
    fn from(resource: Resource) -> Self {
        RatingInput::Entity(Box::new(resource))
    }
}

/// The rating shape surfaced to every caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingResult {
    pub resource_id: ResourceId,
    pub title: String,
    pub scores: CriterionScores,
    pub final_score: f64,
    pub rating_timestamp: DateTime<Utc>,
    pub metadata: Map<String, Value>,
}
