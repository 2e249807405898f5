//! Link HTTP handlers
//!
//! | Path          | Method | Result                        |
//! |---------------|--------|-------------------------------|
//! | `/`           | GET    | 301 to the site root          |
//! | `/{id}`       | GET    | 301 to the destination        |
//! | `/link/{id}`  | GET    | `{"link": ...}`               |
//! | `/link`       | POST   | `{"path": id}`                |
//! | `/link/{id}`  | DELETE | `{"details": "Done."}`        |
//! | `/userlinks`  | GET    | `{"links": [...]}`            |
//!
//! Anything else falls through to a 500 `"Reached end."`.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use chrono::Utc;
use serde_json::{Value, json};
use tracing::{debug, trace};

use crate::config::SiteConfig;
use crate::errors::SnaplinkError;
use crate::services::LinkService;
use crate::utils::CallerMetadata;

use super::response::{details_response, error_response, json_response, redirect_response};

/// Shared handler state
#[derive(Clone)]
pub struct ApiState {
    pub links: Arc<LinkService>,
    pub site: SiteConfig,
    /// 可信代理列表（用于 sourceIp 提取）
    pub trusted_proxies: Arc<Vec<String>>,
}

impl ApiState {
    pub fn new(links: Arc<LinkService>, site: SiteConfig, trusted_proxies: Vec<String>) -> Self {
        Self {
            links,
            site,
            trusted_proxies: Arc::new(trusted_proxies),
        }
    }

    fn caller(&self, req: &HttpRequest) -> CallerMetadata {
        CallerMetadata::from_request(req, &self.trusted_proxies)
    }
}

pub struct LinkApi;

impl LinkApi {
    pub async fn root_redirect(state: web::Data<ApiState>) -> HttpResponse {
        redirect_response(&state.site.root_url, &state.site)
    }

    pub async fn redirect(path: web::Path<String>, state: web::Data<ApiState>) -> HttpResponse {
        let id = path.into_inner();
        match state.links.resolve(&id).await {
            Ok(record) => {
                trace!("Redirecting {} -> {}", id, record.destination);
                redirect_response(&record.destination, &state.site)
            }
            Err(e) => error_response(&e, &state.site),
        }
    }

    pub async fn get_link(path: web::Path<String>, state: web::Data<ApiState>) -> HttpResponse {
        let id = path.into_inner();
        match state.links.resolve(&id).await {
            Ok(record) => json_response(
                StatusCode::OK,
                &json!({ "link": record.destination }),
                &state.site,
            ),
            Err(e) => error_response(&e, &state.site),
        }
    }

    pub async fn create_link(
        req: HttpRequest,
        body: Result<web::Bytes, actix_web::Error>,
        state: web::Data<ApiState>,
    ) -> HttpResponse {
        // 超限或读取失败的请求体同样走统一的错误响应
        let body = match body {
            Ok(body) => body,
            Err(e) => {
                let err = SnaplinkError::bad_request(format!("Unreadable request body: {}", e));
                return error_response(&err, &state.site);
            }
        };

        let link = match parse_link_body(&body) {
            Ok(link) => link,
            Err(e) => return error_response(&e, &state.site),
        };

        let caller = state.caller(&req);
        let now = Utc::now().timestamp();

        match state.links.create(&link, &caller, now).await {
            Ok(record) => json_response(StatusCode::OK, &json!({ "path": record.id }), &state.site),
            Err(e) => error_response(&e, &state.site),
        }
    }

    pub async fn delete_link(path: web::Path<String>, state: web::Data<ApiState>) -> HttpResponse {
        match state.links.delete(&path.into_inner()).await {
            Ok(()) => details_response(StatusCode::OK, "Done.", &state.site),
            Err(e) => error_response(&e, &state.site),
        }
    }

    pub async fn user_links(req: HttpRequest, state: web::Data<ApiState>) -> HttpResponse {
        let caller = state.caller(&req);
        match state.links.list_by_identity(&caller).await {
            Ok(records) => json_response(StatusCode::OK, &json!({ "links": records }), &state.site),
            Err(e) => error_response(&e, &state.site),
        }
    }

    /// 未匹配的 (路径, 方法) 组合
    pub async fn fallback(req: HttpRequest, state: web::Data<ApiState>) -> HttpResponse {
        let err = SnaplinkError::route_unmatched(format!("{} {}", req.method(), req.path()));
        debug!("No route: {}", err.message());
        error_response(&err, &state.site)
    }
}

/// `{"link": "<string>"}`; anything else is a bad request.
fn parse_link_body(body: &[u8]) -> Result<String, SnaplinkError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| SnaplinkError::bad_request(format!("Invalid JSON body: {}", e)))?;

    value
        .get("link")
        .and_then(Value::as_str)
        .map(String::from)
        .ok_or_else(|| SnaplinkError::bad_request("Missing string field 'link'"))
}

/// `POST /link` 请求体上限
pub const MAX_LINK_BODY_BYTES: usize = 64 * 1024;

pub fn link_routes() -> actix_web::Scope {
    let fallback = || web::to(LinkApi::fallback);

    // 固定路径必须在 /{id} 之前注册
    web::scope("")
        .app_data(web::PayloadConfig::new(MAX_LINK_BODY_BYTES))
        .service(
            web::resource("/")
                .route(web::get().to(LinkApi::root_redirect))
                .default_service(fallback()),
        )
        .service(
            web::resource("/userlinks")
                .route(web::get().to(LinkApi::user_links))
                .default_service(fallback()),
        )
        .service(
            web::resource("/link")
                .route(web::post().to(LinkApi::create_link))
                .default_service(fallback()),
        )
        .service(
            web::resource("/link/{id}")
                .route(web::get().to(LinkApi::get_link))
                .route(web::delete().to(LinkApi::delete_link))
                .default_service(fallback()),
        )
        .service(
            web::resource("/{id}")
                .route(web::get().to(LinkApi::redirect))
                .default_service(fallback()),
        )
        .default_service(fallback())
}
