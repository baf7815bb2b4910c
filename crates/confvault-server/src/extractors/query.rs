use serde::Deserialize;

use crate::error::AppError;

/// Literal sent by clients that format a missing variation into the URL.
const NULL_LITERAL: &str = "null";

/// Query parameters que identifican una configuracion.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct IdentityQuery {
    pub id: Option<String>,
    pub variation: Option<String>,
}

impl IdentityQuery {
    /// Retorna el id sin recortar, o BadRequest si falta o esta vacio.
    pub fn id(&self) -> Result<&str, AppError> {
        match self.id.as_deref() {
            Some(id) if !id.trim().is_empty() => Ok(id),
            _ => Err(AppError::BadRequest(
                "query parameter 'id' is required".to_string(),
            )),
        }
    }

    /// Retorna la variacion; `variation=null` cuenta como ausente.
    pub fn variation(&self) -> Option<&str> {
        self.variation
            .as_deref()
            .filter(|v| !v.trim().is_empty() && *v != NULL_LITERAL)
    }
}
