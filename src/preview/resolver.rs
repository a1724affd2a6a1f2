//! Trickplay descriptor resolution.
//!
//! The descriptor is resolved at most once per resolver. The first caller
//! starts the fetch; callers arriving while it is in flight wait for the same
//! result. The outcome is kept whether it succeeded or failed, so an item
//! without trickplay data costs one metadata request per session, not one per
//! scrub.

use std::sync::Arc;

use scrubview_common::ItemId;
use scrubview_media::{TrickplayDescriptor, TrickplayManifest, VariantSelection};
use tokio::sync::OnceCell;
use tracing::debug;

use super::PreviewError;
use crate::client::MediaServer;

type Resolution = Result<Arc<TrickplayDescriptor>, PreviewError>;

/// Single-flight, memoized descriptor lookup for one item.
pub struct TrickplayInfoResolver {
    server: Arc<dyn MediaServer>,
    item_id: ItemId,
    selection: VariantSelection,
    resolved: OnceCell<Resolution>,
}

impl TrickplayInfoResolver {
    pub fn new(server: Arc<dyn MediaServer>, item_id: ItemId, selection: VariantSelection) -> Self {
        Self {
            server,
            item_id,
            selection,
            resolved: OnceCell::new(),
        }
    }

    /// Resolve the descriptor, fetching it on first use.
    pub async fn resolve(&self) -> Resolution {
        self.resolved.get_or_init(|| self.fetch()).await.clone()
    }

    /// The descriptor if resolution already finished successfully.
    pub fn peek(&self) -> Option<Arc<TrickplayDescriptor>> {
        self.resolved.get().and_then(|r| r.as_ref().ok().cloned())
    }

    /// Whether resolution has settled, successfully or not.
    pub fn is_settled(&self) -> bool {
        self.resolved.initialized()
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    async fn fetch(&self) -> Resolution {
        debug!(item = %self.item_id, "Resolving trickplay descriptor");

        let body = self
            .server
            .item_document(self.item_id)
            .await
            .map_err(|e| PreviewError::MetadataFetchFailed(format!("{:#}", e)))?;

        let manifest = TrickplayManifest::from_item_json(&body)?;
        let descriptor = manifest.select(&self.selection)?;

        debug!(
            item = %self.item_id,
            media_source = %descriptor.media_source_id,
            variants = manifest.len(),
            width = descriptor.sheet_width,
            grid = %format!("{}x{}", descriptor.tile_count_x, descriptor.tile_count_y),
            thumbnails = descriptor.thumbnail_count,
            interval_ms = descriptor.interval_ms.get(),
            "Resolved trickplay descriptor"
        );

        Ok(Arc::new(descriptor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::test_support::{item_body, FakeServer};
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn resolves_once_across_calls() {
        let server = Arc::new(FakeServer::new(item_body(10, 10, 10_000, 529)));
        let resolver = TrickplayInfoResolver::new(
            server.clone(),
            ItemId::new(),
            VariantSelection::FirstEncountered,
        );

        assert!(resolver.peek().is_none());
        let first = resolver.resolve().await.unwrap();
        let second = resolver.resolve().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.interval_ms.get(), 10_000);
        assert_eq!(server.item_fetches(), 1);
        assert!(resolver.peek().is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_first_calls_share_one_fetch() {
        let server = Arc::new(
            FakeServer::new(item_body(10, 10, 10_000, 529))
                .with_delay(std::time::Duration::from_millis(50)),
        );
        let resolver = Arc::new(TrickplayInfoResolver::new(
            server.clone(),
            ItemId::new(),
            VariantSelection::FirstEncountered,
        ));

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let resolver = Arc::clone(&resolver);
                tokio::spawn(async move { resolver.resolve().await })
            })
            .collect();

        let results = futures::future::join_all(tasks).await;
        let first = results[0].as_ref().unwrap().as_ref().unwrap();
        for result in &results {
            let descriptor = result.as_ref().unwrap().as_ref().unwrap();
            assert!(Arc::ptr_eq(first, descriptor));
        }
        assert_eq!(server.item_fetches(), 1);
    }

    #[tokio::test]
    async fn failure_is_memoized() {
        let server = Arc::new(FakeServer::new(br#"{"Name":"No previews"}"#.to_vec()));
        let resolver =
            TrickplayInfoResolver::new(server.clone(), ItemId::new(), VariantSelection::default());

        assert_matches!(resolver.resolve().await, Err(PreviewError::MetadataUnavailable(_)));
        assert_matches!(resolver.resolve().await, Err(PreviewError::MetadataUnavailable(_)));
        assert!(resolver.is_settled());
        assert!(resolver.peek().is_none());
        assert_eq!(server.item_fetches(), 1);
    }

    #[tokio::test]
    async fn transport_failure_is_reported() {
        let server = Arc::new(FakeServer::failing_item());
        let resolver =
            TrickplayInfoResolver::new(server.clone(), ItemId::new(), VariantSelection::default());

        assert_matches!(resolver.resolve().await, Err(PreviewError::MetadataFetchFailed(_)));
        assert_eq!(server.item_fetches(), 1);
    }

    #[tokio::test]
    async fn malformed_document_is_reported() {
        let body = br#"{"Trickplay":{"src":{"320":{"Width":320,"Height":180,"TileWidth":"ten","TileHeight":10,"ThumbnailCount":5,"Interval":1000}}}}"#;
        let server = Arc::new(FakeServer::new(body.to_vec()));
        let resolver =
            TrickplayInfoResolver::new(server, ItemId::new(), VariantSelection::default());

        assert_matches!(resolver.resolve().await, Err(PreviewError::MalformedDescriptor(_)));
    }
}
