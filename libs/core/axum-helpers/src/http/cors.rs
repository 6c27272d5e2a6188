use axum::http::{HeaderValue, Method, header};
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Builds a CORS layer from a comma-separated origin list.
///
/// With no origins configured the layer grants nothing, so browsers on other
/// origins are refused. Invalid origin values fail startup.
pub fn cors_layer(origins: Option<&str>) -> io::Result<CorsLayer> {
    let allowed_origins: Vec<HeaderValue> = origins
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid CORS_ALLOWED_ORIGIN value: {}", e),
            )
        })?;

    if allowed_origins.is_empty() {
        tracing::debug!("No CORS origins configured, cross-origin requests are not allowed");
        return Ok(CorsLayer::new());
    }

    tracing::info!(origins = allowed_origins.len(), "CORS configured");

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_origins_is_ok() {
        assert!(cors_layer(None).is_ok());
        assert!(cors_layer(Some(" , ")).is_ok());
    }

    #[test]
    fn test_origin_list() {
        assert!(cors_layer(Some("http://localhost:3000, https://shop.example.com")).is_ok());
    }

    #[test]
    fn test_invalid_origin_fails() {
        let err = cors_layer(Some("http://bad\norigin")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
