//! Merging a stored tree onto the initial state.

use serde_json::Value;
use valora_core::state::{PERSIST_KEY, PersistedState};

/// Removes every slice named in `blacklist`.
pub fn strip_blacklisted<S: AsRef<str>>(state: &mut PersistedState, blacklist: &[S]) {
    for name in blacklist {
        state.remove_slice(name.as_ref());
    }
}

/// Two-level auto-merge.
///
/// Starts from `initial`. For every inbound slice: if the initial slice is an
/// object, the inbound slice is shallow-merged over it (inbound keys win);
/// otherwise the inbound value replaces it. Initial slices the inbound tree
/// lacks are kept, so fields added to the initial state without a migration
/// still show up. `_persist` is carried over from `inbound` when present.
pub fn reconcile(inbound: &PersistedState, initial: &PersistedState) -> PersistedState {
    let mut merged = initial.clone();

    for (name, inbound_slice) in inbound.as_map() {
        if name == PERSIST_KEY {
            continue;
        }
        match (initial.slice_value(name), inbound_slice) {
            (Some(Value::Object(_)), Value::Object(fields)) => {
                let target = merged.slice_mut(name);
                for (key, value) in fields {
                    target.insert(key.clone(), value.clone());
                }
            }
            _ => merged.set_slice(name, inbound_slice.clone()),
        }
    }

    if let Some(meta) = inbound.slice_value(PERSIST_KEY) {
        merged.set_slice(PERSIST_KEY, meta.clone());
    }
    merged
}
