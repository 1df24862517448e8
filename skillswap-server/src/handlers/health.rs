use actix_web::HttpResponse;

use skillswap_common::request_io::OutputHealth;

pub async fn heartbeat() -> HttpResponse {
    HttpResponse::Ok().json(OutputHealth {
        status: String::from("OK"),
        message: String::from("Skill Swap API is running!"),
    })
}
