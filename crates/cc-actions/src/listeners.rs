//! Event listener table
//!
//! Listeners keyed by node and event type. Entries carry a shared
//! `removed` flag so a listener removed mid-dispatch is skipped even if it
//! was already part of the snapshot being walked.

use std::cell::Cell;
use std::rc::Rc;

use cc_dom::{EventType, ListenerOptions, NodeId};

use crate::{Event, Page};

/// Listener callback
pub type ListenerFn = Rc<dyn Fn(&Page, &mut Event<'_>)>;

/// Listener identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Which listeners a propagation step wants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PhaseFilter {
    Capture,
    Target,
    Bubble,
}

#[derive(Clone)]
pub(crate) struct ListenerEntry {
    pub id: ListenerId,
    pub node: NodeId,
    pub event_type: EventType,
    pub options: ListenerOptions,
    pub callback: ListenerFn,
    pub removed: Rc<Cell<bool>>,
}

/// Event listener storage
#[derive(Default)]
pub(crate) struct ListenerTable {
    entries: Vec<ListenerEntry>,
    next_id: u64,
}

impl ListenerTable {
    pub fn add(&mut self, node: NodeId, event_type: EventType, options: ListenerOptions, callback: ListenerFn) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push(ListenerEntry {
            id,
            node,
            event_type,
            options,
            callback,
            removed: Rc::new(Cell::new(false)),
        });
        tracing::debug!(node = %node, event = event_type.as_str(), capture = options.capture, "listener added");
        id
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        let Some(pos) = self.entries.iter().position(|e| e.id == id) else {
            return false;
        };
        let entry = self.entries.remove(pos);
        entry.removed.set(true);
        true
    }

    /// Drop every listener registered on a node `keep` rejects
    pub fn retain_nodes(&mut self, mut keep: impl FnMut(NodeId) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| {
            let kept = keep(entry.node);
            if !kept {
                entry.removed.set(true);
            }
            kept
        });
        before - self.entries.len()
    }

    /// Snapshot of listeners for one propagation step, in registration order
    pub fn snapshot(&self, node: NodeId, event_type: EventType, filter: PhaseFilter) -> Vec<ListenerEntry> {
        self.entries
            .iter()
            .filter(|e| e.node == node && e.event_type == event_type)
            .filter(|e| match filter {
                PhaseFilter::Capture => e.options.capture,
                PhaseFilter::Target => true,
                PhaseFilter::Bubble => !e.options.capture,
            })
            .cloned()
            .collect()
    }

    pub fn count(&self, node: NodeId, event_type: EventType) -> usize {
        self.entries
            .iter()
            .filter(|e| e.node == node && e.event_type == event_type)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> ListenerFn {
        Rc::new(|_: &Page, _: &mut Event| {})
    }

    #[test]
    fn test_add_remove() {
        let mut table = ListenerTable::default();
        let id1 = table.add(NodeId::ROOT, EventType::Click, ListenerOptions::capture(), noop());
        let _id2 = table.add(NodeId::ROOT, EventType::Click, ListenerOptions::default(), noop());
        let _id3 = table.add(NodeId::ROOT, EventType::KeyDown, ListenerOptions::default(), noop());

        assert_eq!(table.count(NodeId::ROOT, EventType::Click), 2);
        assert_eq!(table.snapshot(NodeId::ROOT, EventType::Click, PhaseFilter::Capture).len(), 1);
        assert_eq!(table.snapshot(NodeId::ROOT, EventType::Click, PhaseFilter::Bubble).len(), 1);
        assert_eq!(table.snapshot(NodeId::ROOT, EventType::Click, PhaseFilter::Target).len(), 2);

        assert!(table.remove(id1));
        assert!(!table.remove(id1));
        assert_eq!(table.count(NodeId::ROOT, EventType::Click), 1);
    }

    #[test]
    fn test_retain_nodes_flags_dropped_entries() {
        let mut table = ListenerTable::default();
        let stale = NodeId::NONE;
        table.add(NodeId::ROOT, EventType::Click, ListenerOptions::default(), noop());
        table.add(stale, EventType::Click, ListenerOptions::default(), noop());
        let snapshot = table.snapshot(stale, EventType::Click, PhaseFilter::Target);

        assert_eq!(table.retain_nodes(|node| node != stale), 1);
        assert!(snapshot[0].removed.get());
        assert_eq!(table.count(NodeId::ROOT, EventType::Click), 1);
    }

    #[test]
    fn test_removed_flag_visible_to_snapshot() {
        let mut table = ListenerTable::default();
        let id = table.add(NodeId::ROOT, EventType::KeyDown, ListenerOptions::default(), noop());
        let snapshot = table.snapshot(NodeId::ROOT, EventType::KeyDown, PhaseFilter::Bubble);

        table.remove(id);
        assert!(snapshot[0].removed.get());
    }
}
