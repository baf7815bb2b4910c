//! HTTP metrics middleware.
//!
//! Requests are labelled by the configuration operation they reach
//! (`view`, `save`, `remove`, `cache`) rather than by path, so the label set
//! stays the same whatever `server.base_path` is.

use std::time::Instant;

use axum::{body::Body, extract::MatchedPath, http::Request, middleware::Next, response::Response};
use metrics::{counter, histogram};

/// Operacion HTTP que atiende una ruta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    View,
    Save,
    Remove,
    FlushCache,
    Health,
    Metrics,
    /// No route matched.
    Unmatched,
}

impl Operation {
    /// Deriva la operacion de la ruta matcheada por axum.
    pub fn from_matched_path(path: Option<&str>) -> Self {
        let Some(path) = path else {
            return Operation::Unmatched;
        };

        match path.rsplit('/').next() {
            Some("view") => Operation::View,
            Some("save") => Operation::Save,
            Some("remove") => Operation::Remove,
            Some("cache") => Operation::FlushCache,
            Some("health") => Operation::Health,
            Some("metrics") => Operation::Metrics,
            _ => Operation::Unmatched,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::View => "view",
            Operation::Save => "save",
            Operation::Remove => "remove",
            Operation::FlushCache => "cache",
            Operation::Health => "health",
            Operation::Metrics => "metrics",
            Operation::Unmatched => "unmatched",
        }
    }

    /// True para las operaciones sobre configuraciones.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Operation::View | Operation::Save | Operation::Remove)
    }
}

/// Middleware que registra metricas HTTP para cada request.
pub async fn http_metrics_middleware(
    matched_path: Option<MatchedPath>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().as_str().to_owned();
    let operation = Operation::from_matched_path(matched_path.as_ref().map(MatchedPath::as_str));

    let response = next.run(request).await;
    let status = response.status();

    counter!(
        "confvault_http_requests_total",
        "method" => method,
        "operation" => operation.as_str(),
        "status" => status.as_u16().to_string()
    )
    .increment(1);

    histogram!(
        "confvault_http_request_duration_seconds",
        "operation" => operation.as_str()
    )
    .record(start.elapsed().as_secs_f64());

    // Every configuration failure surfaces as a 400
    if operation.is_configuration() && status.is_client_error() {
        counter!(
            "confvault_configuration_failures_total",
            "operation" => operation.as_str()
        )
        .increment(1);
    }

    response
}

/// Registra las metricas HTTP
pub fn register_http_metrics() {
    metrics::describe_counter!(
        "confvault_http_requests_total",
        "Total number of HTTP requests by configuration operation"
    );
    metrics::describe_histogram!(
        "confvault_http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    metrics::describe_counter!(
        "confvault_configuration_failures_total",
        "Configuration requests answered with a client error"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_from_nested_path() {
        let cases = [
            ("/configuration/view", Operation::View),
            ("/configuration/save", Operation::Save),
            ("/config/remove", Operation::Remove),
            ("/configuration/cache", Operation::FlushCache),
            ("/health", Operation::Health),
            ("/metrics", Operation::Metrics),
        ];

        for (path, expected) in cases {
            assert_eq!(Operation::from_matched_path(Some(path)), expected, "{}", path);
        }
    }

    #[test]
    fn test_unmatched() {
        assert_eq!(Operation::from_matched_path(None), Operation::Unmatched);
        assert_eq!(
            Operation::from_matched_path(Some("/configuration/other")),
            Operation::Unmatched
        );
        assert_eq!(Operation::Unmatched.as_str(), "unmatched");
    }

    #[test]
    fn test_configuration_operations() {
        assert!(Operation::View.is_configuration());
        assert!(Operation::Remove.is_configuration());
        assert!(!Operation::FlushCache.is_configuration());
        assert!(!Operation::Health.is_configuration());
    }
}
