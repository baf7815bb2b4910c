use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use tracing::debug;

/// Contexto de seguridad de la request, tomado del header Authorization.
///
/// Solo se verifica su presencia; nunca se valida ni se exige.
#[derive(Debug, Clone, Default)]
pub struct Principal(pub Option<String>);

impl Principal {
    /// Returns true if the request carried an Authorization header.
    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }

    /// Returns the authentication scheme (`Bearer`, `Basic`...), if any.
    pub fn scheme(&self) -> Option<&str> {
        self.0.as_deref().and_then(|v| v.split_whitespace().next())
    }
}

impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let authorization = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        if authorization.is_none() {
            debug!(path = %parts.uri.path(), "No security context present");
        }

        Ok(Principal(authorization))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme() {
        let principal = Principal(Some("Bearer abc.def".to_string()));
        assert!(principal.is_present());
        assert_eq!(principal.scheme(), Some("Bearer"));

        assert_eq!(Principal(None).scheme(), None);
    }
}
