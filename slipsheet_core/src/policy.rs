// Copyright 2026 the Slipsheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host policy consulted by the state machine.

/// Appearance transitions of the content underneath the sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AppearanceEvent {
    /// Presentation began; the underlying content is about to be covered.
    WillDisappear,
    /// Presentation finished.
    DidDisappear,
    /// Dismissal began; the underlying content is about to be uncovered.
    WillAppear,
    /// Dismissal finished.
    DidAppear,
    /// A dismissal that had begun was abandoned; the content stays covered.
    Cancelled,
}

/// Decisions and notifications delegated to the host.
///
/// Every method has a default, so a policy only overrides what it needs.
pub trait SheetPolicy {
    /// Whether the sheet may be dismissed right now.
    ///
    /// Asked once when a drag begins (the answer holds for the whole drag)
    /// and once per background tap.
    fn may_dismiss(&self) -> bool {
        true
    }

    /// A vetoed drag was released after pulling the sheet down.
    fn on_dismissal_attempted(&mut self) {}

    /// The underlying content changed appearance.
    fn on_appearance(&mut self, event: AppearanceEvent) {
        _ = event;
    }
}

/// The default policy: dismissal is always allowed.
#[derive(Clone, Copy, Debug, Default)]
pub struct AllowDismiss;

impl SheetPolicy for AllowDismiss {}

impl<P: SheetPolicy + ?Sized> SheetPolicy for &mut P {
    fn may_dismiss(&self) -> bool {
        (**self).may_dismiss()
    }

    fn on_dismissal_attempted(&mut self) {
        (**self).on_dismissal_attempted();
    }

    fn on_appearance(&mut self, event: AppearanceEvent) {
        (**self).on_appearance(event);
    }
}
