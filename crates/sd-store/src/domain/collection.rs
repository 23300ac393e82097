//! Identifier-keyed edits of an ordered record list.
//!
//! A missing identifier is a silent no-op for both edits.

use shared_types::{Entity, EntityId};

/// Replace the record with the same id in place. Returns whether one matched.
pub(crate) fn replace_by_id<T: Entity>(items: &mut [T], record: T) -> bool {
    match items.iter_mut().find(|item| item.id() == record.id()) {
        Some(slot) => {
            *slot = record;
            true
        }
        None => false,
    }
}

/// Remove every record with `id`. Returns whether any was removed.
pub(crate) fn remove_by_id<T: Entity>(items: &mut Vec<T>, id: &EntityId) -> bool {
    let before = items.len();
    items.retain(|item| item.id() != id);
    items.len() != before
}
