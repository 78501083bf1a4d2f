pub mod question;

use crate::actix_web::{
    guard,
    web::{delete, get, post, put, resource, scope, ServiceConfig},
};
use crate::middlewares::jwt::JWTMiddleware;

/// Mounts `/questions`. Listing is public; writes need a bearer token signed with `secret`.
pub fn routes(secret: Vec<u8>) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.service(
            scope("/questions").service(resource("").guard(guard::Get()).route(get().to(question::list))).service(
                scope("")
                    .wrap(JWTMiddleware::new(secret))
                    .route("", post().to(question::create))
                    .route("/{id}", put().to(question::update))
                    .route("/{id}", delete().to(question::delete)),
            ),
        );
    }
}
