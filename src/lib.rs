//! # Cadre
//!
//! A retained-mode 2D UI layout engine.
//!
//! Most layout libraries recompute the world every frame and hand you a
//! fresh tree of rectangles. Interactive authoring tools can't afford
//! that: elements carry anchors, pivots, and in-flight animations, and a
//! container must react to exactly the changes that concern it. Cadre
//! keeps the element tree retained and **schedules** layout instead:
//! structural and sizing changes set dirty bits, `update()` solves the
//! containers that need it, and computed geometry is either written
//! immediately or handed to an external tween subsystem.
//!
//! ## Architecture
//!
//! ```text
//! Input (API / JSON scene)
//!       ↓
//!   [model]    — Rect elements: size, anchors, pivot, anchored offset
//!       ↓
//!   [style]    — Sizing policies, tracks, per-kind layout configs
//!       ↓
//!   [tree]     — Element arena, notifications, rebuild scheduling
//!       ↓
//!   [layout]   — Pure geometry solvers + anchor/pivot projection
//!       ↓
//!   [animate]  — Immediate writes or tween requests to the host
//! ```
//!
//! ## Example
//!
//! ```
//! use cadre::style::{LayoutStyle, LinearConfig};
//! use cadre::UiTree;
//!
//! let mut ui = UiTree::new();
//! let bar = ui.spawn("bar", 300.0, 50.0);
//! ui.set_layout(
//!     bar,
//!     LayoutStyle::Linear(LinearConfig {
//!         expand_main: true,
//!         ..Default::default()
//!     }),
//! )
//! .unwrap();
//! for name in ["a", "b", "c"] {
//!     ui.spawn_child(bar, name, 10.0, 50.0).unwrap();
//! }
//! ui.update();
//!
//! let first = ui.children(bar)[0];
//! assert_eq!(ui.width(first), 100.0);
//! ```

pub mod animate;
pub mod error;
pub mod layout;
pub mod model;
pub mod style;
pub mod tree;

pub use animate::{ApplyMode, TweenHandle, TweenRequest};
pub use error::CadreError;
pub use model::{Anchors, Axis, Edges, RectElement, Vec2};
pub use tree::{ElementId, SceneDoc, SceneNode, UiTree};
