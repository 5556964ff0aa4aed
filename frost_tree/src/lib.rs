//! # frost_tree
//!
//! Gesture-driven holiday tree installation.  A field of ~8000 particles
//! forms a frosted tree; showing an open palm scatters it into a galaxy and
//! a fist pulls it back together.  Moving the hand sideways turns the tree.
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Action |
//! |---|---|
//! | Open palm | Scatter into "Stardust Galaxy"; camera pulls back |
//! | Closed fist | Re-form "Frosty Wonderland" |
//! | Hand left/right | Turn the tree toward the hand |
//! | No hand | Formation holds; tree spins slowly |
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: mouse and keyboard stand in for the hand.
//! * `leap` — **Hardware mode**: landmarks from a real LeapMotion controller via LeapC.
//!
//! ### Simulation controls
//!
//! | Input | Effect |
//! |---|---|
//! | Mouse X | Hand position |
//! | `Space` | Toggle open palm / fist |
//! | `H` | Hand enters / leaves view |
//! | `R` | Re-seed the particle field |
//! | `Q` / `Escape` | Quit |

pub mod app;
pub mod camera;
pub mod sources;
pub mod visualizer;
