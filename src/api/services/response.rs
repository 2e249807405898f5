//! 响应构建帮助函数
//!
//! Every response carries the configured `Access-Control-Allow-Origin`
//! unless a handler already set one.

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::{ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue, LOCATION};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, error, warn};

use crate::config::SiteConfig;
use crate::errors::SnaplinkError;

fn with_allow_origin(mut resp: HttpResponse, site: &SiteConfig) -> HttpResponse {
    if !resp.headers().contains_key(ACCESS_CONTROL_ALLOW_ORIGIN) {
        match HeaderValue::from_str(&site.allow_origin) {
            Ok(value) => {
                resp.headers_mut().insert(ACCESS_CONTROL_ALLOW_ORIGIN, value);
            }
            Err(e) => warn!("Invalid allow_origin '{}': {}", site.allow_origin, e),
        }
    }
    resp
}

/// 构建 JSON 响应（Content-Type: application/json）
pub fn json_response<T: Serialize>(status: StatusCode, body: &T, site: &SiteConfig) -> HttpResponse {
    with_allow_origin(HttpResponse::build(status).json(body), site)
}

/// `{"details": "..."}`
pub fn details_response(status: StatusCode, details: &str, site: &SiteConfig) -> HttpResponse {
    json_response(status, &json!({ "details": details }), site)
}

/// 301 with `Location` and an empty body
pub fn redirect_response(location: &str, site: &SiteConfig) -> HttpResponse {
    with_allow_origin(
        HttpResponse::MovedPermanently()
            .insert_header((LOCATION, location))
            .finish(),
        site,
    )
}

/// 从 SnaplinkError 构建错误响应
///
/// The body only ever carries the fixed public detail.
pub fn error_response(err: &SnaplinkError, site: &SiteConfig) -> HttpResponse {
    if err.is_store_failure() {
        error!("Store failure: {}", err);
    } else {
        debug!("Request failed: {}", err);
    }
    details_response(err.http_status(), err.public_detail(), site)
}
