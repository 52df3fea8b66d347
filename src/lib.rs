//! Axis-aligned wire routing over a multi-layer technology stack.
//!
//! A route is built from a start point and a list of waypoints: the
//! waypoints are normalized into orthogonal hops and drawn as straight
//! segments joined by turns and via stacks. Shielded, differential and bus
//! routes are derived as parallel courses of a primary one, and two
//! searches (a grid wave and a visibility graph) find obstacle-free paths
//! that are drawn the same way.

pub mod command;
pub mod commit;
pub mod geometry;
pub mod route;
pub mod router;
pub mod search;
pub mod stepper;
pub mod technology;
pub mod track;
