use actix_web::web::*;

use crate::handlers::notification;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/notifications")
            .service(resource("").route(get().to(notification::list)))
            .service(resource("/read-all").route(put().to(notification::mark_all_read)))
            .service(
                resource("/{notification_id}/read").route(put().to(notification::mark_read)),
            ),
    );
}
