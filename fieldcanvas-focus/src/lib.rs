//! Single-focus selection for canvas elements.
//!
//! `fieldcanvas-focus` tracks which element of a canvas is currently selected
//! for editing. It is generic over the key type and knows nothing about the
//! elements themselves.
//!
//! # Rules
//!
//! - **At most one focus**: focusing a key implicitly defocuses the previous one
//! - **Weak reference**: the controller stores a lookup key, never the element
//! - **Stale keys tolerated**: focusing a key that no longer exists is allowed;
//!   readers resolve it against their own collection and treat a miss as
//!   "nothing visibly focused"
//! - **Release on delete**: owners call [`FocusController::release`] when an
//!   element goes away so the focus self-clears

mod controller;

pub use controller::FocusController;
