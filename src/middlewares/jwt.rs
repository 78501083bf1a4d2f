use serde::{Deserialize, Serialize};

use crate::actix_web::{
    dev::{Service, ServiceRequest, Transform},
    http::header::AUTHORIZATION,
    Error as ActixError, HttpMessage,
};
use crate::context::UserInfo;
use crate::core::tokener::{Payload, Tokener};
use crate::deserializers::deserialize_optional_id;
use crate::error::Error;
use crate::impls::tokener::jwt::JWT;
use std::future::Future;
use std::pin::Pin;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Claim {
    #[serde(default, deserialize_with = "deserialize_optional_id", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Payload for Claim {
    fn user(&self) -> Option<&str> {
        self.user_id.as_deref()
    }
}

/// Requires `Authorization: Bearer <token>` and puts the caller's [`UserInfo`] into the request
/// extensions.
pub(crate) struct JWTMiddleware {
    secret: Vec<u8>,
}

impl JWTMiddleware {
    pub fn new(secret: Vec<u8>) -> Self {
        Self { secret }
    }
}

impl<S> Transform<S, ServiceRequest> for JWTMiddleware
where
    S: Service<ServiceRequest> + 'static,
    S::Future: 'static,
    S::Error: Into<ActixError>,
{
    type Error = ActixError;
    type Response = S::Response;
    type Transform = JWTService<S>;
    type InitError = ();
    type Future = Pin<Box<dyn Future<Output = Result<Self::Transform, Self::InitError>>>>;
    fn new_transform(&self, service: S) -> Self::Future {
        let secret = self.secret.clone();
        Box::pin(async move {
            Ok(JWTService {
                tokener: JWT::new(secret),
                next_service: service,
            })
        })
    }
}

pub struct JWTService<S> {
    tokener: JWT,
    next_service: S,
}

impl<S> JWTService<S> {
    fn authenticate(&self, req: &ServiceRequest) -> Result<UserInfo, Error> {
        let token = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|header| header.to_str().ok())
            .and_then(|header| header.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(Error::MissingToken)?;
        let claim: Claim = self.tokener.verify_token(token)?;
        let id = claim
            .user()
            .and_then(|user| user.parse::<u64>().ok())
            .and_then(|user| i64::try_from(user).ok())
            .filter(|id| *id != 0)
            .ok_or_else(|| Error::BadRequest("Invalid JWT claims".into()))?;
        Ok(UserInfo { id })
    }
}

impl<S> Service<ServiceRequest> for JWTService<S>
where
    S: Service<ServiceRequest>,
    S::Future: 'static,
    S::Error: Into<ActixError>,
{
    type Response = S::Response;
    type Error = ActixError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;
    fn poll_ready(&self, ctx: &mut core::task::Context<'_>) -> std::task::Poll<Result<(), Self::Error>> {
        self.next_service.poll_ready(ctx).map_err(|e| e.into())
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match self.authenticate(&req) {
            Ok(user) => {
                req.extensions_mut().insert(user);
            }
            Err(e) => {
                log::debug!("rejected {} {}: {}", req.method(), req.path(), e);
                return Box::pin(async move { Err(e.into()) });
            }
        }

        let res_fut = self.next_service.call(req);
        Box::pin(async move {
            let resp = res_fut.await.map_err(|e| e.into())?;
            Ok(resp)
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::actix_web::{http::StatusCode, test, web, App, HttpResponse, ResponseError};

    const SECRET: &[u8] = b"middleware secret";

    async fn whoami(user: UserInfo) -> HttpResponse {
        HttpResponse::Ok().body(user.id.to_string())
    }

    fn token(claim: &Claim) -> String {
        JWT::new(SECRET.to_vec()).gen_token(claim).unwrap()
    }

    #[actix_web::test]
    async fn test_authenticated_request() {
        let app = test::init_service(App::new().service(web::scope("").wrap(JWTMiddleware::new(SECRET.to_vec())).route("/me", web::get().to(whoami)))).await;

        let claim = Claim {
            user_id: Some("17".into()),
            exp: None,
        };
        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header((AUTHORIZATION, format!("Bearer {}", token(&claim))))
            .to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "17");
    }

    #[actix_web::test]
    async fn test_rejected_requests() {
        let app = test::init_service(App::new().service(web::scope("").wrap(JWTMiddleware::new(SECRET.to_vec())).route("/me", web::get().to(whoami)))).await;

        let bad_claim = token(&Claim {
            user_id: Some("nobody".into()),
            exp: None,
        });
        let zero_claim = token(&Claim {
            user_id: Some("0".into()),
            exp: None,
        });
        let foreign = JWT::new(b"other".to_vec())
            .gen_token(&Claim {
                user_id: Some("1".into()),
                exp: None,
            })
            .unwrap();
        let cases = vec![
            (None, StatusCode::UNAUTHORIZED),
            (Some("Basic abc".to_owned()), StatusCode::UNAUTHORIZED),
            (Some("Bearer ".to_owned()), StatusCode::UNAUTHORIZED),
            (Some(format!("Bearer {}", foreign)), StatusCode::UNAUTHORIZED),
            (Some(format!("Bearer {}", bad_claim)), StatusCode::BAD_REQUEST),
            (Some(format!("Bearer {}", token(&Claim::default()))), StatusCode::BAD_REQUEST),
            (Some(format!("Bearer {}", zero_claim)), StatusCode::BAD_REQUEST),
        ];
        for (header, status) in cases {
            let mut req = test::TestRequest::get().uri("/me");
            if let Some(header) = header {
                req = req.insert_header((AUTHORIZATION, header));
            }
            let res = test::try_call_service(&app, req.to_request()).await;
            let got = match res {
                Ok(resp) => resp.status(),
                Err(e) => e.as_response_error().status_code(),
            };
            assert_eq!(got, status);
        }
    }
}
