/// Per-cell brain evaluation, movement and energy costs
pub mod action;
/// Ray casting, sensing and deferred combat/feeding effects
pub mod interaction;
