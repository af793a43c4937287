/*!
 * Monitoring
 * Structured logging and lifecycle tracing
 */

mod tracer;

pub use tracer::{generate_trace_id, init_tracing, LifecycleSpan};
