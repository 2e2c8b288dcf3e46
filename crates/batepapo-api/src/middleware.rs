use axum::{extract::Request, http::StatusCode, middleware::Next, response::Response};

/// Header carrying the caller's participant name. It is taken at face
/// value; there is no credential behind it.
pub const IDENTITY_HEADER: &str = "user";

#[derive(Debug, Clone)]
pub struct Identity(pub String);

/// Reads the identity header and stores it as an [`Identity`] extension.
pub async fn require_identity(mut req: Request, next: Next) -> Result<Response, StatusCode> {
    let name = req
        .headers()
        .get(IDENTITY_HEADER)
        .and_then(|v| std::str::from_utf8(v.as_bytes()).ok())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or(StatusCode::UNPROCESSABLE_ENTITY)?
        .to_string();

    req.extensions_mut().insert(Identity(name));
    Ok(next.run(req).await)
}
