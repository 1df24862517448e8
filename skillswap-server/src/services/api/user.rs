use actix_web::web::*;

use crate::handlers::user;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/users")
            .service(resource("").route(get().to(user::list)))
            // Must be registered before the `{user_id}` matcher
            .service(resource("/me").route(get().to(user::get_current)))
            .service(
                resource("/{user_id}")
                    .route(get().to(user::get_by_id))
                    .route(put().to(user::update)),
            ),
    );
}
