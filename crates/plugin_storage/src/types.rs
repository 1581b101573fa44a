//! Data model for plugin configuration options and log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use settings_manager::ComponentType;

/// One configuration option of a plugin, scoped to an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginConfigOption {
    pub plugin_id: String,
    pub event_id: i32,
    pub option_name: String,
    pub option_value: Option<String>,
    pub description: String,
    pub component_type: ComponentType,
}

/// Severity of a plugin log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PluginLogKind {
    Success,
    Warning,
    Error,
}

/// A timestamped log line recorded by a plugin for an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginLogEntry {
    pub plugin_id: String,
    pub event_id: i32,
    pub description: String,
    pub kind: PluginLogKind,
    pub timestamp: DateTime<Utc>,
}
