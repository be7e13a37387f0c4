//! Registry of live objects handed out by the stub.
//!
//! Non-dispatchable handles are plain ids; dispatchable ones are
//! `DispatchableHandle` pointers whose `local_id` is registered here. Ids are
//! unique process-wide, so drivers installed on different threads never see
//! each other's objects.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

use ash::vk;
use dashmap::DashMap;

static NEXT_ID: AtomicU64 = AtomicU64::new(0x2000);
static LIVE: OnceLock<DashMap<u64, vk::ObjectType>> = OnceLock::new();

fn live() -> &'static DashMap<u64, vk::ObjectType> {
    LIVE.get_or_init(DashMap::new)
}

/// Register a new object and return its id.
pub fn register(object_type: vk::ObjectType) -> u64 {
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    live().insert(id, object_type);
    id
}

pub fn is_live(id: u64, object_type: vk::ObjectType) -> bool {
    live().get(&id).is_some_and(|ty| *ty == object_type)
}

/// Remove a live object. Returns false when `id` is not a live object of
/// `object_type` (double destroy, wrong parent type, garbage).
pub fn unregister(id: u64, object_type: vk::ObjectType) -> bool {
    live()
        .remove_if(&id, |_, ty| *ty == object_type)
        .is_some()
}
