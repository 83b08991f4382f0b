//! End-to-end resource lifecycles against a mock Zoom API

mod call_handling_test;
mod common;
mod membership_test;
