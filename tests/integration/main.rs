//! Integration tests against wiremock servers
//!
//! Every test asserts how many requests each page received, so cache hits
//! and cycle stops are checked by fetch counts rather than by timing.

mod client_tests;
mod fetch_tests;
mod pagination_tests;
