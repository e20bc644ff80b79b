mod create_subscription;
mod delete_subscription;

use actix_web::web;
use create_subscription::create_subscription_controller;
use delete_subscription::delete_subscription_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/subscriptions", web::post().to(create_subscription_controller));
    cfg.route(
        "/subscriptions",
        web::delete().to(delete_subscription_controller),
    );
}
