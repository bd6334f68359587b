//! A [`ResourceClient`] backed by an inventory snapshot in JSON.

use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::FetchError;
use crate::resource::{KindSummary, Resource, ResourceClient, ResourceKind};
use crate::screen::Page;
use crate::screen::table::Cursor;

/// Inventory shipped with the binary, used when no file is configured.
const SAMPLE_INVENTORY: &str = include_str!("../../demos/inventory.json");

#[derive(Debug, Deserialize)]
struct InventoryFile {
    resources: Vec<Resource>,
}

/// Serves resources from memory with offset cursors.
///
/// An optional latency is added to every call so that loading states,
/// cancellation and stale-result handling can be seen in the UI.
#[derive(Debug, Clone, Default)]
pub struct InventoryClient {
    resources: Vec<Resource>,
    latency: Duration,
}

impl InventoryClient {
    pub const fn from_resources(resources: Vec<Resource>) -> Self {
        Self {
            resources,
            latency: Duration::ZERO,
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        let file: InventoryFile =
            serde_json::from_str(content).wrap_err("Invalid inventory JSON")?;
        Ok(Self::from_resources(file.resources))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read inventory {}", path.display()))?;
        let client = Self::parse(&content)
            .wrap_err_with(|| format!("Failed to load inventory {}", path.display()))?;
        info!(path = %path.display(), resources = client.resources.len(), "Loaded inventory");
        Ok(client)
    }

    pub fn sample() -> Result<Self> {
        Self::parse(SAMPLE_INVENTORY)
    }

    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    async fn pause(&self, token: &CancellationToken) -> Result<(), FetchError> {
        if token.is_cancelled() {
            return Err(FetchError::Cancelled);
        }
        if self.latency.is_zero() {
            return Ok(());
        }
        tokio::select! {
            biased;
            () = token.cancelled() => Err(FetchError::Cancelled),
            () = tokio::time::sleep(self.latency) => Ok(()),
        }
    }
}

#[async_trait]
impl ResourceClient for InventoryClient {
    async fn summaries(&self, token: CancellationToken) -> Result<Vec<KindSummary>, FetchError> {
        self.pause(&token).await?;
        Ok(ResourceKind::ALL
            .into_iter()
            .map(|kind| {
                let matching = self.resources.iter().filter(|r| r.kind == kind);
                KindSummary {
                    kind,
                    count: matching.clone().count(),
                    regions: matching
                        .map(|r| r.region.clone())
                        .filter(|region| !region.is_empty())
                        .collect::<BTreeSet<_>>(),
                }
            })
            .collect())
    }

    async fn list_page(
        &self,
        token: CancellationToken,
        kind: ResourceKind,
        cursor: Option<Cursor>,
        page_size: usize,
    ) -> Result<Page<Resource>, FetchError> {
        self.pause(&token).await?;
        let offset = match cursor {
            Some(cursor) => cursor
                .parse::<usize>()
                .map_err(|_| FetchError::failed(format!("invalid cursor {cursor:?}")))?,
            None => 0,
        };
        let matching: Vec<&Resource> = self.resources.iter().filter(|r| r.kind == kind).collect();
        let end = offset.saturating_add(page_size.max(1)).min(matching.len());
        let items: Vec<Resource> = matching
            .get(offset..end)
            .unwrap_or_default()
            .iter()
            .map(|&r| r.clone())
            .collect();
        debug!(%kind, offset, returned = items.len(), total = matching.len(), "Listed page");

        if end < matching.len() {
            Ok(Page::more(items, end.to_string()))
        } else {
            Ok(Page::complete(items))
        }
    }

    async fn describe(&self, token: CancellationToken, id: &str) -> Result<Resource, FetchError> {
        self.pause(&token).await?;
        self.resources
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| FetchError::failed(format!("resource {id} not found")))
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    /// Compute instance `vm-{i}` named `instance-{i}`.
    pub fn compute(i: usize) -> Resource {
        Resource {
            id: format!("vm-{i}"),
            name: format!("instance-{i}"),
            kind: ResourceKind::Compute,
            region: if i % 2 == 0 { "eu-west1" } else { "us-east1" }.to_string(),
            state: "RUNNING".to_string(),
            created: None,
            reference: format!("projects/demo/instances/vm-{i}"),
            tags: [("env".to_string(), "dev".to_string())].into(),
            properties: Default::default(),
            shell: Some("true".to_string()),
            logs: Some(format!("echo boot vm-{i}")),
            forward: None,
        }
    }

    /// `count` compute instances plus one bucket.
    pub fn fixture(count: usize) -> InventoryClient {
        let mut resources: Vec<Resource> = (0..count).map(compute).collect();
        resources.push(Resource {
            id: "bucket-1".to_string(),
            name: "assets".to_string(),
            kind: ResourceKind::Storage,
            region: "eu".to_string(),
            state: "READY".to_string(),
            created: None,
            reference: "gs://assets".to_string(),
            tags: Default::default(),
            properties: Default::default(),
            shell: None,
            logs: None,
            forward: None,
        });
        InventoryClient::from_resources(resources)
    }

    #[tokio::test]
    async fn test_pages_follow_offset_cursor() {
        let client = fixture(5);
        let token = CancellationToken::new();

        let first = client
            .list_page(token.clone(), ResourceKind::Compute, None, 2)
            .await
            .unwrap();
        assert_eq!(first.items.len(), 2);
        assert!(first.has_more);
        assert_eq!(first.cursor.as_deref(), Some("2"));

        let last = client
            .list_page(token, ResourceKind::Compute, Some("4".to_string()), 2)
            .await
            .unwrap();
        assert_eq!(last.items[0].id, "vm-4");
        assert!(!last.has_more);
        assert!(last.cursor.is_none());
    }

    #[tokio::test]
    async fn test_bad_cursor_fails() {
        let client = fixture(1);
        let err = client
            .list_page(
                CancellationToken::new(),
                ResourceKind::Compute,
                Some("abc".to_string()),
                2,
            )
            .await
            .unwrap_err();
        assert_eq!(err, FetchError::failed("invalid cursor \"abc\""));
    }

    #[tokio::test]
    async fn test_summaries_cover_every_kind() {
        let summaries = fixture(3).summaries(CancellationToken::new()).await.unwrap();
        assert_eq!(summaries.len(), ResourceKind::ALL.len());
        assert_eq!(summaries[0].count, 3);
        assert_eq!(summaries[0].regions_label(), "eu-west1, us-east1");
        let storage = summaries
            .iter()
            .find(|s| s.kind == ResourceKind::Storage)
            .unwrap();
        assert_eq!(storage.count, 1);
    }

    #[tokio::test]
    async fn test_describe_unknown_id() {
        let err = fixture(1)
            .describe(CancellationToken::new(), "nope")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "resource nope not found");
    }

    #[tokio::test]
    async fn test_cancel_interrupts_latency() {
        let client = fixture(1).with_latency(Duration::from_secs(30));
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });

        let result = tokio::time::timeout(Duration::from_secs(5), client.summaries(token)).await;
        assert_eq!(result.unwrap().unwrap_err(), FetchError::Cancelled);
    }

    #[test]
    fn test_sample_inventory_parses() {
        let client = InventoryClient::sample().unwrap();
        assert!(!client.is_empty());
    }
}
