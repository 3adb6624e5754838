//=========================================================================
// Core
//
// Toolkit-independent building blocks of the platform layer.
//
// Responsibilities:
// - `memory`: allocator protocol and allocator-backed storage
// - `event`: engine-neutral event model
// - `window`: window handle wrapper, creation flags, clipboard kinds
// - `error`: typed errors shared by every layer
//
// Notes:
// Nothing in here talks to a toolkit directly. Windows reach the toolkit
// only through the `Backend` they were created with.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod error;
pub mod event;
pub mod memory;
pub mod window;
