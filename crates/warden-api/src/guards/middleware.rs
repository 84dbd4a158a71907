//! Axum용 가드 미들웨어.
//!
//! 매칭된 라우트의 메타데이터를 조회하고 가드 파이프라인을 실행합니다.
//! 허용되면 호출자 정보를 request extensions에 넣어 핸들러로 전달하고,
//! 거부되면 [`ErrorTranslator`]가 만든 응답을 즉시 반환합니다.
//!
//! `MatchedPath`가 필요하므로 `Router::route_layer`로 적용해야 합니다.

use std::sync::Arc;

use axum::{
    extract::{MatchedPath, OriginalUri, Request, State},
    http::header::{AUTHORIZATION, USER_AGENT},
    middleware::Next,
    response::Response,
};
use tracing::{debug, info, warn, Instrument};

use super::context::{Decision, RequestContext};
use super::metadata::RouteKey;
use crate::error::ErrorTranslator;
use crate::state::AppState;

/// 가드 미들웨어 함수.
pub async fn guard_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    // 중첩 라우터에서도 전체 요청 URI를 사용
    let uri = request
        .extensions()
        .get::<OriginalUri>()
        .map(|original| original.0.clone())
        .unwrap_or_else(|| request.uri().clone());
    // 에러 응답과 로그에는 쿼리 문자열까지 포함
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    let template = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    let key = RouteKey::new(method.clone(), template);
    let metadata = state.registry.resolve(&key);
    let custom_errors = metadata.custom_errors.clone();

    // 문자열이 아닌 헤더는 없는 것으로 취급
    let authorization = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    debug!(
        route = %key,
        is_public = metadata.is_public,
        required_roles = ?metadata.required_roles,
        "Access attempt"
    );

    let mut ctx = RequestContext::new(method.clone(), path.clone(), metadata, authorization);
    let (decision, stage) = state
        .pipeline
        .dispatch(&mut ctx)
        .instrument(warden_core::access_span!("guard", method, path))
        .await;

    match decision {
        Decision::Allowed => {
            let (user, authorized) = ctx.into_identity();

            match &user {
                Some(user) => info!(
                    user = %user.username,
                    role = ?user.role,
                    method = %method,
                    path = %path,
                    "Access granted"
                ),
                None => debug!(route = %key, "Public route, guards skipped"),
            }

            if let Some(user) = user {
                request.extensions_mut().insert(user);
            }
            if let Some(authorized) = authorized {
                request.extensions_mut().insert(authorized);
            }

            next.run(request).await
        }
        Decision::Denied(failure) => {
            let user_agent = request
                .headers()
                .get(USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-");

            warn!(
                error_type = failure.error_type(),
                detail = %failure,
                stage = stage.map(|s| s.name()).unwrap_or("-"),
                method = %method,
                path = %path,
                user_agent = user_agent,
                "Access denied"
            );

            ErrorTranslator::into_response(&failure, &method, &path, custom_errors.as_ref())
        }
    }
}
