//! Test suites for the peripheral daemon.

pub(crate) mod support;
