// src/middleware/tenancy.rs

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

// Custom HTTP header carrying the tenant the caller wants to act on.
// Authentication itself happens upstream of this service.
const TENANT_ID_HEADER: &str = "x-tenant-id";

// Extractor holding the UUID of the tenant scoping the request.
#[derive(Debug, Clone, Copy)]
pub struct TenantContext(pub Uuid);

#[derive(Debug)]
pub struct TenantRejection(&'static str);

impl IntoResponse for TenantRejection {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.0 }));
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}

impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    type Rejection = TenantRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(TENANT_ID_HEADER)
            .ok_or(TenantRejection("The X-Tenant-ID header is required."))?;

        let value_str = value
            .to_str()
            .map_err(|_| TenantRejection("The X-Tenant-ID header contains invalid characters."))?;

        let tenant_id = Uuid::parse_str(value_str)
            .map_err(|_| TenantRejection("The X-Tenant-ID header is not a valid UUID."))?;

        Ok(TenantContext(tenant_id))
    }
}
