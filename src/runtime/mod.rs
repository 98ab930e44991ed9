//! Harnesses that drive the engine from the outside.
//!
//! - `speed_test`: write/read microbenchmark with recall statistics
