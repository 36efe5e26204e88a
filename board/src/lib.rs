//! Manipulation engine for the outfit board.
//!
//! The crate owns everything that is not pixels: the item model and its
//! ordered store, the pointer gesture state machine (drag / resize / rotate),
//! grid snapping and the rest of the coordinate math, hit-testing against
//! selection handles, and JSON snapshot / export plumbing. Hosts render the
//! items however they like and forward pointer events and toolbar commands to
//! [`engine::Board`]; state changes come back through [`engine::BoardHost`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Board controller: testable [`engine::BoardCore`] and host-facing [`engine::Board`] |
//! | [`doc`] | Item model and the ordered in-memory [`doc::ItemStore`] |
//! | [`input`] | Gesture state machine driving the store |
//! | [`hit`] | Hit-testing items and selection handles |
//! | [`geometry`] | Pure math: snapping, angles, aspect-locked resize, containment |
//! | [`image`] | Resolving heterogeneous host image references |
//! | [`config`] | Host configuration with defaults |
//! | [`snapshot`] | Item list to and from JSON |
//! | [`export`] | Scene capture and the async render collaborator |
//! | [`consts`] | Shared numeric constants |

pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod export;
pub mod geometry;
pub mod hit;
pub mod image;
pub mod input;
pub mod snapshot;
