use actix_web::web::*;

use crate::handlers::swap;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/swaps")
            .service(resource("").route(get().to(swap::list)))
            .service(resource("/request").route(post().to(swap::create)))
            .service(resource("/{swap_id}/respond").route(put().to(swap::respond)))
            .service(resource("/{swap_id}/cancel").route(put().to(swap::cancel))),
    );
}
