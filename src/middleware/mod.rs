/*
 * Responsibility
 * - Router-wide middleware (re-export)
 * - method_guard: GET only; http: request id / limits / tracing; security_headers
 */
pub mod http;
pub mod method_guard;
pub mod security_headers;
