/// Fill-only-if-absent: write `value` into `slot` only when `slot` is unset.
///
/// Sources run in priority order, so whichever source produces a field first
/// owns it for the rest of the pass. Returns whether the slot was written.
pub fn fill<T>(slot: &mut Option<T>, value: Option<T>) -> bool {
    let wrote = slot.is_none() && value.is_some();
    *slot = merged(slot.take(), value);
    wrote
}

/// Pure form of [`fill`]: the state a field ends in after a source offers
/// `incoming`.
pub fn merged<T>(current: Option<T>, incoming: Option<T>) -> Option<T> {
    current.or(incoming)
}
