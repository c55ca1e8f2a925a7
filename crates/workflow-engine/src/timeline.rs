use std::sync::Arc;

use chrono::{DateTime, Utc};
use workflow_types::ItemStatus;

use crate::item::Item;

/// One timeline position: the live item plus the mutable lifecycle state
/// the engine maintains over it. Keeping this state off `Item` itself means
/// an `Item` implementation never needs interior mutability — the engine
/// owns the only copy rather than storing status on the component itself.
pub struct TimelineSlot {
    pub item: Arc<dyn Item>,
    pub status: ItemStatus,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl TimelineSlot {
    pub fn pending(item: Arc<dyn Item>) -> Self {
        Self {
            item,
            status: ItemStatus::Pending,
            start_time: None,
            end_time: None,
        }
    }
}

/// The engine's ordered, mutable list of timeline slots.
///
/// Splices always land immediately after a given index and removals shift
/// everything after the removed slot down by one — both are plain `Vec`
/// operations here, kept on this type so the index arithmetic has one home
/// instead of being repeated at every engine call site.
#[derive(Default)]
pub struct Timeline {
    slots: Vec<TimelineSlot>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Append items to the end of the timeline. Duplicate ids are the
    /// caller's responsibility — the engine does not deduplicate.
    pub fn append(&mut self, items: Vec<Arc<dyn Item>>) {
        self.slots.extend(items.into_iter().map(TimelineSlot::pending));
    }

    /// Insert items immediately after `index`, or at the end if `index` is
    /// out of bounds. Used both by the public insert API and by the
    /// engine's own splice-on-success/splice-on-continue paths, which are
    /// always relative to the current index.
    pub fn insert_after(&mut self, index: usize, items: Vec<Arc<dyn Item>>) {
        if items.is_empty() {
            return;
        }
        let insert_at = (index + 1).min(self.slots.len());
        let new_slots: Vec<_> = items.into_iter().map(TimelineSlot::pending).collect();
        self.slots.splice(insert_at..insert_at, new_slots);
    }

    /// Remove the slot with the given id, if any. Returns the index it
    /// occupied so the caller can adjust `current_index` if needed.
    pub fn remove_by_id(&mut self, id: &str) -> Option<usize> {
        let pos = self.slots.iter().position(|slot| slot.item.id() == id)?;
        self.slots.remove(pos);
        Some(pos)
    }

    pub fn find_index_by_id(&self, id: &str) -> Option<usize> {
        self.slots.iter().position(|slot| slot.item.id() == id)
    }

    pub fn item_at(&self, index: usize) -> Option<Arc<dyn Item>> {
        self.slots.get(index).map(|slot| slot.item.clone())
    }

    pub fn get(&self, index: usize) -> Option<&TimelineSlot> {
        self.slots.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut TimelineSlot> {
        self.slots.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimelineSlot> {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut TimelineSlot> {
        self.slots.iter_mut()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
