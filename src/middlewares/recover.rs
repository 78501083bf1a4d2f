use futures::FutureExt;

use crate::actix_web::{
    body::{BoxBody, MessageBody},
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error as ActixError, HttpResponse,
};
use crate::response::ErrorResponse;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;

/// Turns a panic inside the wrapped service into a 500 `{"Error": "Internal error"}`.
pub(crate) struct RecoverMiddleware;

impl<S, B> Transform<S, ServiceRequest> for RecoverMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Error = ActixError;
    type Response = ServiceResponse<BoxBody>;
    type Transform = RecoverService<S>;
    type InitError = ();
    type Future = Pin<Box<dyn Future<Output = Result<Self::Transform, Self::InitError>>>>;
    fn new_transform(&self, service: S) -> Self::Future {
        Box::pin(async move { Ok(RecoverService { next_service: service }) })
    }
}

pub struct RecoverService<S> {
    next_service: S,
}

impl<S, B> Service<ServiceRequest> for RecoverService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = ActixError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;
    fn poll_ready(&self, ctx: &mut core::task::Context<'_>) -> std::task::Poll<Result<(), Self::Error>> {
        self.next_service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let http_req = req.request().clone();
        let method = req.method().clone();
        let path = req.path().to_owned();
        let res_fut = self.next_service.call(req);
        Box::pin(async move {
            match AssertUnwindSafe(res_fut).catch_unwind().await {
                Ok(res) => res.map(ServiceResponse::map_into_boxed_body),
                Err(_) => {
                    log::error!("handler panicked on {} {}", method, path);
                    let resp = HttpResponse::InternalServerError().json(ErrorResponse::new("Internal error"));
                    Ok(ServiceResponse::new(http_req, resp))
                }
            }
        })
    }
}
