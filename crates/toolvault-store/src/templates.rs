//! Saved parameter sets for re-running tools

use crate::store::RecordStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use toolvault_core::{Error, Result};
use uuid::Uuid;

const COLLECTION: &str = "templates";

/// A named, reusable set of tool parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionTemplate {
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Tool the parameters belong to
    pub tool_id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parameters: Value,
    pub created_at: DateTime<Utc>,
}

impl ExecutionTemplate {
    pub fn builder(name: impl Into<String>, tool_id: impl Into<String>) -> TemplateBuilder {
        TemplateBuilder {
            id: None,
            name: name.into(),
            tool_id: tool_id.into(),
            description: String::new(),
            parameters: Value::Object(Default::default()),
        }
    }
}

/// Builder for [`ExecutionTemplate`]
pub struct TemplateBuilder {
    id: Option<String>,
    name: String,
    tool_id: String,
    description: String,
    parameters: Value,
}

impl TemplateBuilder {
    /// Use a fixed id instead of a generated one
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn parameters(mut self, parameters: Value) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn add_parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        if let Value::Object(map) = &mut self.parameters {
            map.insert(key.into(), value.into());
        }
        self
    }

    pub fn build(self) -> ExecutionTemplate {
        ExecutionTemplate {
            id: self.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: self.name,
            tool_id: self.tool_id,
            description: self.description,
            parameters: self.parameters,
            created_at: Utc::now(),
        }
    }
}

/// Template collection over a [`RecordStore`]
pub struct TemplateLibrary<S: RecordStore> {
    store: Arc<S>,
}

impl<S: RecordStore> TemplateLibrary<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Insert or replace a template by id
    pub async fn save(&self, template: &ExecutionTemplate) -> Result<()> {
        if template.name.trim().is_empty() {
            return Err(Error::store_error("Template name must not be empty"));
        }
        let record = serde_json::to_value(template)
            .map_err(|e| Error::store_error(format!("Failed to serialize template: {}", e)))?;
        self.store.put(COLLECTION, &template.id, record).await
    }

    pub async fn get(&self, id: &str) -> Result<Option<ExecutionTemplate>> {
        match self.store.get(COLLECTION, id).await? {
            Some(record) => Ok(Some(decode(record)?)),
            None => Ok(None),
        }
    }

    /// All templates, sorted by name
    pub async fn list(&self) -> Result<Vec<ExecutionTemplate>> {
        let mut templates = self
            .store
            .list(COLLECTION)
            .await?
            .into_iter()
            .map(|(_, record)| decode(record))
            .collect::<Result<Vec<_>>>()?;
        templates.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(templates)
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        self.store.delete(COLLECTION, id).await
    }

    /// All templates as a pretty JSON array
    pub async fn export_json(&self) -> Result<String> {
        let templates = self.list().await?;
        serde_json::to_string_pretty(&templates)
            .map_err(|e| Error::store_error(format!("Failed to export templates: {}", e)))
    }

    /// Import a JSON array of templates, replacing any with the same id.
    /// Nothing is written unless the whole document parses.
    pub async fn import_json(&self, json: &str) -> Result<usize> {
        let templates: Vec<ExecutionTemplate> = serde_json::from_str(json)
            .map_err(|e| Error::parse_error(format!("Invalid template export: {}", e)))?;
        for template in &templates {
            self.save(template).await?;
        }
        log::info!("Imported {} template(s)", templates.len());
        Ok(templates.len())
    }
}

fn decode(record: Value) -> Result<ExecutionTemplate> {
    serde_json::from_value(record)
        .map_err(|e| Error::store_error(format!("Corrupt template: {}", e)))
}
