/*!
 * Monitoring Module
 * Structured tracing setup
 */

pub mod tracer;

pub use tracer::{init_tracing, ENV_TRACE_JSON};
