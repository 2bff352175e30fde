//! Process-wide pointer click broadcast.
//!
//! A [`Document`] fans every click out to all live subscriptions. Widgets
//! that need to react to clicks landing outside of themselves hold a
//! [`PointerSubscription`]; dropping it releases the registration.

use tokio::sync::broadcast;
use tracing::{trace, warn};

/// Buffered clicks per subscriber before it starts lagging.
const CLICK_BUFFER: usize = 64;

/// A pointer click in terminal cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub column: u16,
    pub row: u16,
}

impl PointerEvent {
    pub fn new(column: u16, row: u16) -> Self {
        Self { column, row }
    }
}

/// Rectangular area occupied by a rendered widget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Region {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Region {
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, event: &PointerEvent) -> bool {
        event.column >= self.x
            && event.column < self.x.saturating_add(self.width)
            && event.row >= self.y
            && event.row < self.y.saturating_add(self.height)
    }

    /// Smallest region covering both.
    pub fn union(&self, other: &Region) -> Region {
        if self.width == 0 || self.height == 0 {
            return *other;
        }
        if other.width == 0 || other.height == 0 {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self
            .x
            .saturating_add(self.width)
            .max(other.x.saturating_add(other.width));
        let bottom = self
            .y
            .saturating_add(self.height)
            .max(other.y.saturating_add(other.height));
        Region::new(x, y, right - x, bottom - y)
    }
}

/// Source of document-level clicks.
pub struct Document {
    tx: broadcast::Sender<PointerEvent>,
}

impl Document {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CLICK_BUFFER);
        Self { tx }
    }

    /// Register a new listener. It stays active until the returned guard
    /// is dropped.
    pub fn subscribe(&self) -> PointerSubscription {
        PointerSubscription {
            rx: self.tx.subscribe(),
        }
    }

    /// Deliver a click to every live listener.
    pub fn click(&self, event: PointerEvent) {
        if self.tx.send(event).is_err() {
            trace!(?event, "click with no listeners");
        }
    }

    /// Number of live listeners.
    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// A live registration on a [`Document`].
pub struct PointerSubscription {
    rx: broadcast::Receiver<PointerEvent>,
}

impl PointerSubscription {
    /// Take every click received since the last drain.
    pub fn drain(&mut self) -> Vec<PointerEvent> {
        let mut events = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(event) => events.push(event),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "pointer listener lagged, older clicks dropped");
                }
                Err(broadcast::error::TryRecvError::Empty)
                | Err(broadcast::error::TryRecvError::Closed) => break,
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_contains_is_half_open() {
        let region = Region::new(2, 1, 4, 3);
        assert!(region.contains(&PointerEvent::new(2, 1)));
        assert!(region.contains(&PointerEvent::new(5, 3)));
        assert!(!region.contains(&PointerEvent::new(6, 1)));
        assert!(!region.contains(&PointerEvent::new(2, 4)));
    }

    #[test]
    fn union_ignores_empty_regions() {
        let a = Region::new(0, 0, 10, 3);
        assert_eq!(a.union(&Region::default()), a);
        assert_eq!(
            a.union(&Region::new(0, 3, 10, 5)),
            Region::new(0, 0, 10, 8)
        );
    }

    #[test]
    fn union_saturates_at_screen_edge() {
        let edge = Region::new(u16::MAX - 1, u16::MAX - 1, 10, 10);
        let merged = edge.union(&Region::new(0, 0, 1, 1));
        assert_eq!(merged, Region::new(0, 0, u16::MAX, u16::MAX));
        assert!(merged.contains(&PointerEvent::new(u16::MAX - 1, 0)));
    }

    #[test]
    fn dropping_subscription_releases_listener() {
        let document = Document::new();
        for _ in 0..3 {
            let sub = document.subscribe();
            assert_eq!(document.listener_count(), 1);
            drop(sub);
        }
        assert_eq!(document.listener_count(), 0);
    }

    #[test]
    fn every_subscriber_sees_every_click() {
        let document = Document::new();
        let mut a = document.subscribe();
        let mut b = document.subscribe();
        document.click(PointerEvent::new(1, 1));
        document.click(PointerEvent::new(2, 2));
        assert_eq!(a.drain().len(), 2);
        assert_eq!(b.drain().len(), 2);
        assert!(a.drain().is_empty());
    }
}
