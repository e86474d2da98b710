use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};

use crate::services::auth_service;
use crate::state::AppState;
use crate::utils::AppError;

/// Attaches the caller's [`auth_service::Claims`] to the request when it carries a bearer
/// token. Requests without an `Authorization` header pass through anonymously; a header that
/// is not a valid bearer token is rejected with 401.
pub struct IdentityMiddleware;

impl<S, B> Transform<S, ServiceRequest> for IdentityMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = IdentityMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(IdentityMiddlewareService { service }))
    }
}

pub struct IdentityMiddlewareService<S> {
    service: S,
}

fn bearer_token(header_value: &str) -> Option<&str> {
    header_value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl<S, B> Service<ServiceRequest> for IdentityMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let header = req
            .headers()
            .get(actix_web::http::header::AUTHORIZATION)
            .map(|value| value.to_str().map(str::to_string));

        let verified = match header {
            None => None,
            Some(Ok(value)) => {
                let claims = bearer_token(&value)
                    .ok_or_else(|| AppError::Unauthorized("Invalid token format".to_string()))
                    .and_then(|token| match req.app_data::<web::Data<AppState>>() {
                        Some(state) => auth_service::verify_token(token, &state.jwt),
                        None => Err(AppError::Internal("Application state missing".to_string())),
                    });
                Some(claims)
            }
            Some(Err(_)) => Some(Err(AppError::Unauthorized("Invalid token format".to_string()))),
        };

        match verified {
            Some(Err(e)) => {
                log::warn!("❌ Rejected {} {}: {}", req.method(), req.path(), e);
                let error: Error = e.into();
                Box::pin(async move { Err(error) })
            }
            Some(Ok(claims)) => {
                req.extensions_mut().insert(claims);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await })
            }
            None => {
                let fut = self.service.call(req);
                Box::pin(async move { fut.await })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Basic abc"), None);
    }
}
