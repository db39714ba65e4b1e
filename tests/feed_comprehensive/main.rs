//! Comprehensive feed storage test suite.
//!
//! Exercises the public `fanoutdb` API end to end:
//!
//! - codec contracts: round-trips, the target-id boundary, dehydration
//! - slice semantics: rank ranges, score bounds, ordering validation
//! - feed scenarios: publish, fan-out, trim and removal flows
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test feed_comprehensive
//! ```

mod test_utils;

mod codec_contracts;
mod feed_scenarios;
mod slice_semantics;
