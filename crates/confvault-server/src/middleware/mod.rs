//! Middleware stack para el servidor HTTP.
//!
//! - `RequestIdLayer`: genera o propaga `x-request-id` y lo deja en las
//!   extensions de la request como [`RequestId`]
//! - `LoggingLayer`: logging estructurado de requests

mod logging;
mod request_id;

pub use logging::{LoggingLayer, LoggingMiddleware};
pub use request_id::{REQUEST_ID_HEADER, RequestId, RequestIdLayer, RequestIdMiddleware};
