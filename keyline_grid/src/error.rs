// Copyright 2026 the Keyline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout errors.

use keyline_span::SpanError;

/// Errors reported by the grid controller.
///
/// All of them are configuration errors: the layout pass that hit one is abandoned and the
/// error is returned as is. Retrying without fixing the configuration fails the same way.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// The item provider reported span sizes the grid cannot hold.
    #[error(transparent)]
    Span(#[from] SpanError),
}
