//! Response security headers.
//!
//! Pages load scripts, styles and fonts from the storefront only. Product
//! images are the one exception and may come from the configured image
//! origins.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{
        HeaderName, HeaderValue,
        header::{
            CACHE_CONTROL, CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS,
            X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};

/// Policy used when the image origins cannot form a valid header.
const SELF_ONLY_CSP: &str = "default-src 'none'; script-src 'self'; style-src 'self'; \
     font-src 'self'; img-src 'self'; form-action 'self'; base-uri 'self'; \
     frame-ancestors 'none'";

/// Headers added to every storefront response.
#[derive(Clone)]
pub struct SecurityHeaders {
    headers: Arc<[(HeaderName, HeaderValue)]>,
}

impl SecurityHeaders {
    /// Build the header set, allowing product images from `image_origins`.
    #[must_use]
    pub fn new(image_origins: &[&str]) -> Self {
        let csp = HeaderValue::try_from(content_security_policy(image_origins)).unwrap_or_else(
            |e| {
                tracing::warn!(error = %e, "Invalid image origin, images limited to 'self'");
                HeaderValue::from_static(SELF_ONLY_CSP)
            },
        );

        Self {
            headers: Arc::new([
                (CONTENT_SECURITY_POLICY, csp),
                (X_FRAME_OPTIONS, HeaderValue::from_static("DENY")),
                (X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")),
                (REFERRER_POLICY, HeaderValue::from_static("same-origin")),
                // Carts are per session
                (CACHE_CONTROL, HeaderValue::from_static("no-store")),
                (
                    HeaderName::from_static("permissions-policy"),
                    HeaderValue::from_static(
                        "camera=(), geolocation=(), microphone=(), payment=(), usb=()",
                    ),
                ),
                (
                    HeaderName::from_static("cross-origin-opener-policy"),
                    HeaderValue::from_static("same-origin"),
                ),
            ]),
        }
    }
}

fn content_security_policy(image_origins: &[&str]) -> String {
    let mut img_src = String::from("'self'");
    for origin in image_origins {
        img_src.push(' ');
        img_src.push_str(origin);
    }

    format!(
        "default-src 'none'; script-src 'self'; style-src 'self'; font-src 'self'; \
         img-src {img_src}; form-action 'self'; base-uri 'self'; frame-ancestors 'none'"
    )
}

/// Add [`SecurityHeaders`] to the response.
pub async fn security_headers_middleware(
    State(security): State<SecurityHeaders>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    for (name, value) in security.headers.iter() {
        headers.insert(name.clone(), value.clone());
    }

    response
}
