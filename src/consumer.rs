// Copyright 2023-2023 CrabNebula Ltd.
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! The `Consumer` collaborator: a logger used for observability only. It
//! never affects control flow — callers that don't care can use
//! [`TracingConsumer`] and move on.

use std::fmt::Arguments;

/// A logger with debug/log/warn severities, matching the external Consumer
/// interface this crate's callers are expected to provide.
pub trait Consumer {
    /// Low-level tracing, off by default in most deployments.
    fn debug(&self, args: Arguments<'_>);
    /// Normal operational logging.
    fn log(&self, args: Arguments<'_>);
    /// Something unexpected but non-fatal happened.
    fn warn(&self, args: Arguments<'_>);
}

/// Default [`Consumer`] that forwards to the `tracing` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingConsumer;

impl Consumer for TracingConsumer {
    fn debug(&self, args: Arguments<'_>) {
        tracing::debug!("{}", args);
    }

    fn log(&self, args: Arguments<'_>) {
        tracing::info!("{}", args);
    }

    fn warn(&self, args: Arguments<'_>) {
        tracing::warn!("{}", args);
    }
}

/// A [`Consumer`] that discards everything, useful in tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullConsumer;

impl Consumer for NullConsumer {
    fn debug(&self, _args: Arguments<'_>) {}
    fn log(&self, _args: Arguments<'_>) {}
    fn warn(&self, _args: Arguments<'_>) {}
}
