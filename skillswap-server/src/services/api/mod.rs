use actix_web::web::*;

mod auth;
mod health;
mod notification;
mod swap;
mod user;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/api")
            .configure(auth::configure)
            .configure(health::configure)
            .configure(notification::configure)
            .configure(swap::configure)
            .configure(user::configure),
    );
}
