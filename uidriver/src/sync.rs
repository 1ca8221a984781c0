//! Rebuilds element snapshots from the provider.

use crate::element::{ElementNode, ElementTree, HostId};
use crate::errors::AutomationError;
use crate::provider::{AutomationProvider, CacheRequest, NodeHandle};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Pause before the single retry after a transient walk failure.
pub const DEFAULT_REFRESH_RETRY_DELAY: Duration = Duration::from_millis(250);

/// Walks the provider's live tree into a fresh [`ElementTree`] snapshot.
///
/// A walk races against the UI it enumerates; when the provider reports that
/// a node vanished mid-walk, the whole walk is restarted once after a short
/// pause. A second consecutive failure propagates to the caller.
pub struct TreeSynchronizer {
    provider: Arc<dyn AutomationProvider>,
    cache: CacheRequest,
    retry_delay: Duration,
}

impl TreeSynchronizer {
    pub fn new(
        provider: Arc<dyn AutomationProvider>,
        cache: CacheRequest,
        retry_delay: Duration,
    ) -> Self {
        Self {
            provider,
            cache,
            retry_delay,
        }
    }

    /// Builds a new snapshot of the host's subtree.
    #[instrument(level = "debug", skip(self), fields(host = %host))]
    pub fn refresh(&self, host: &HostId) -> Result<ElementTree, AutomationError> {
        match self.walk(host) {
            Ok(tree) => Ok(tree),
            Err(AutomationError::TransientUnavailable(reason)) => {
                warn!(%reason, "tree walk hit transient unavailability, retrying once");
                std::thread::sleep(self.retry_delay);
                self.walk(host)
            }
            Err(e) => Err(e),
        }
    }

    fn walk(&self, host: &HostId) -> Result<ElementTree, AutomationError> {
        let mut nodes = Vec::new();
        let root_attrs = self.provider.properties(host.anchor, &self.cache)?;
        nodes.push(ElementNode {
            handle: host.anchor,
            attrs: root_attrs,
            parent: None,
            children: Vec::new(),
        });
        self.walk_children(host.anchor, 0, &mut nodes)?;
        debug!(node_count = nodes.len(), "captured snapshot");
        Ok(ElementTree::new(host.clone(), nodes))
    }

    /// Depth-first walk over the provider's sibling cursor, appending nodes
    /// in document order.
    fn walk_children(
        &self,
        parent_handle: NodeHandle,
        parent_index: usize,
        nodes: &mut Vec<ElementNode>,
    ) -> Result<(), AutomationError> {
        let mut cursor = self.provider.first_child(parent_handle)?;
        while let Some(handle) = cursor {
            let attrs = self.provider.properties(handle, &self.cache)?;
            let index = nodes.len();
            nodes.push(ElementNode {
                handle,
                attrs,
                parent: Some(parent_index),
                children: Vec::new(),
            });
            nodes[parent_index].children.push(index);
            self.walk_children(handle, index, nodes)?;
            cursor = self.provider.next_sibling(handle)?;
        }
        Ok(())
    }
}
