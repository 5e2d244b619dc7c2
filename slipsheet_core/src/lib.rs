// Copyright 2026 the Slipsheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture-driven bottom sheet presentation and dismissal.
//!
//! `slipsheet_core` is the transition engine behind a "bottom sheet": a panel
//! that slides up from the bottom edge, can be dragged down by direct
//! manipulation, and then either completes the dismissal or snaps back, with
//! a dimming overlay animating in sync. It is `no_std` compatible (with
//! `alloc`) and never draws anything: it produces geometry, opacity, and
//! transition decisions for a host to apply to its own view tree.
//!
//! # Architecture
//!
//! ```text
//!   host pan recognizer            host frame callback
//!       │                               │
//!       ▼                               ▼
//!   GestureSample ──► SheetTransition::on_gesture_sample
//!                        │  ▲                    SheetTransition::advance(now)
//!                        │  └─ ScrollCoexistenceGuard      │
//!                        ▼                                 │
//!                 GestureTranslator ──► InteractiveDriver ◄┘
//!                                             │
//!                                             ▼
//!                          SheetFrame + SheetChanges ──► SheetPresenter::apply()
//! ```
//!
//! **[`machine`]**: [`SheetTransition`](machine::SheetTransition), the
//! presentation state machine and sole owner of the session.
//!
//! **[`gesture`]**: drag samples, raw progress, and the swappable resistance
//! curves applied while the host vetoes dismissal.
//!
//! **[`driver`]**: [`InteractiveDriver`](driver::InteractiveDriver), an
//! interruptible animation of the sheet frame that can also be scrubbed by
//! percentage.
//!
//! **[`timing`]**: the duration-normalized spring easing.
//!
//! **[`overlay`]**: dimming overlay opacity rules.
//!
//! **[`scroll`]**: gating the drag against an embedded scroll region.
//!
//! **[`session`]**: lifecycle phases, layout, and per-presentation state.
//!
//! **[`config`]**: [`TransitionConfig`](config::TransitionConfig) and its
//! presets.
//!
//! **[`policy`]** and **[`host`]**: the traits at the host boundary.
//!
//! **[`time`]**: host monotonic time and timebase conversion.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types, with
//! zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod config;
pub mod driver;
pub mod gesture;
pub mod host;
pub mod machine;
pub mod overlay;
pub mod policy;
pub mod scroll;
pub mod session;
pub mod time;
pub mod timing;
pub mod trace;
