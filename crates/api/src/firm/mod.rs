mod create_firm;
mod get_firm;

use actix_web::web;
use create_firm::create_firm_controller;
use get_firm::get_firm_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/firm", web::post().to(create_firm_controller));
    cfg.route("/firm", web::get().to(get_firm_controller));
}
