use actix_web::web::*;

use crate::handlers::auth;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/auth")
            .service(resource("/register").route(post().to(auth::register)))
            .service(resource("/login").route(post().to(auth::login))),
    );
}
