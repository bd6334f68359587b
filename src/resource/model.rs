use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::stream::ForwardSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Compute,
    Containers,
    Network,
    Storage,
    Identity,
    Cost,
}

impl ResourceKind {
    pub const ALL: [Self; 6] = [
        Self::Compute,
        Self::Containers,
        Self::Network,
        Self::Storage,
        Self::Identity,
        Self::Cost,
    ];

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Compute => "Compute",
            Self::Containers => "Containers",
            Self::Network => "Network",
            Self::Storage => "Storage",
            Self::Identity => "Identity",
            Self::Cost => "Cost",
        }
    }

    /// Parse the lowercase name used in the inventory file and on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.display_name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One cloud resource as listed and described by a [`ResourceClient`].
///
/// [`ResourceClient`]: super::ResourceClient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub name: String,
    pub kind: ResourceKind,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    /// Fully qualified reference, e.g. a resource path or ARN-like URI.
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    /// Interactive shell command run with the terminal handed off.
    #[serde(default)]
    pub shell: Option<String>,
    /// Command whose output is tailed in the logs view.
    #[serde(default)]
    pub logs: Option<String>,
    #[serde(default)]
    pub forward: Option<ForwardSpec>,
}

impl Resource {
    pub fn created_label(&self) -> String {
        self.created
            .map(|created| created.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string())
    }

    /// Name/value rows for the overview tab, fixed fields first.
    pub fn overview(&self) -> Vec<(String, String)> {
        let mut rows = vec![
            ("ID".to_string(), self.id.clone()),
            ("Name".to_string(), self.name.clone()),
            ("Kind".to_string(), self.kind.to_string()),
            ("Region".to_string(), self.region.clone()),
            ("State".to_string(), self.state.clone()),
            ("Created".to_string(), self.created_label()),
            ("Reference".to_string(), self.reference.clone()),
        ];
        if let Some(forward) = &self.forward {
            rows.push((
                "Forward".to_string(),
                format!("localhost:{} → {}", forward.local_port, forward.remote_port),
            ));
        }
        rows.extend(
            self.properties
                .iter()
                .map(|(name, value)| (name.clone(), value.clone())),
        );
        rows
    }
}

/// Resource count per kind, shown on the root screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindSummary {
    pub kind: ResourceKind,
    pub count: usize,
    pub regions: BTreeSet<String>,
}

impl KindSummary {
    pub fn regions_label(&self) -> String {
        if self.regions.is_empty() {
            "-".to_string()
        } else {
            self.regions.iter().cloned().collect::<Vec<_>>().join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(ResourceKind::from_name("compute"), Some(ResourceKind::Compute));
        assert_eq!(ResourceKind::from_name("COST"), Some(ResourceKind::Cost));
        assert_eq!(ResourceKind::from_name("database"), None);
        assert_eq!(
            serde_json::to_string(&ResourceKind::Containers).unwrap(),
            "\"containers\""
        );
    }

    #[test]
    fn test_minimal_resource_deserializes() {
        let resource: Resource =
            serde_json::from_str(r#"{ "id": "vm-1", "name": "web", "kind": "compute" }"#).unwrap();
        assert_eq!(resource.created_label(), "-");
        assert!(resource.tags.is_empty());
        assert!(resource.forward.is_none());
    }

    #[test]
    fn test_overview_puts_fixed_fields_first() {
        let resource: Resource = serde_json::from_str(
            r#"{
                "id": "vm-1", "name": "web", "kind": "compute",
                "created": "2025-03-01T10:30:00Z",
                "properties": { "machine_type": "e2-small" },
                "forward": { "local_port": 8080, "remote_port": 80, "command": "sleep 1" }
            }"#,
        )
        .unwrap();

        let overview = resource.overview();
        assert_eq!(overview[0], ("ID".to_string(), "vm-1".to_string()));
        assert_eq!(overview[5].1, "2025-03-01 10:30");
        assert_eq!(overview[7].1, "localhost:8080 → 80");
        assert_eq!(
            overview.last(),
            Some(&("machine_type".to_string(), "e2-small".to_string()))
        );
    }
}
