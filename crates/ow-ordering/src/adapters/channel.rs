//! Reference connection bound to one event loop.

use crate::domain::attributes::AttributeMap;
use crate::domain::value_objects::ChannelId;
use crate::ports::outbound::{Channel, EventLoop};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// [`Channel`] with an open flag and an attribute map.
pub struct LoopChannel {
    id: ChannelId,
    event_loop: Arc<dyn EventLoop>,
    attributes: AttributeMap,
    open: AtomicBool,
}

impl LoopChannel {
    /// Create an open connection owned by `event_loop`.
    pub fn new(event_loop: Arc<dyn EventLoop>) -> Self {
        let id = ChannelId::new();
        debug!(channel = %id, event_loop = event_loop.name(), "Channel registered");
        Self {
            id,
            event_loop,
            attributes: AttributeMap::new(),
            open: AtomicBool::new(true),
        }
    }
}

impl Channel for LoopChannel {
    fn id(&self) -> ChannelId {
        self.id
    }

    fn event_loop(&self) -> Arc<dyn EventLoop> {
        Arc::clone(&self.event_loop)
    }

    fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    fn is_active(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    fn close(&self) {
        if self.open.swap(false, Ordering::AcqRel) {
            debug!(channel = %self.id, "Channel closed");
        }
    }
}

impl std::fmt::Debug for LoopChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoopChannel")
            .field("id", &self.id)
            .field("event_loop", &self.event_loop.name())
            .field("open", &self.is_active())
            .field("attributes", &self.attributes)
            .finish()
    }
}
