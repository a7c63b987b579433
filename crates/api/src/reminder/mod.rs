mod create_reminder;
pub mod fire_due_reminders;
mod get_reminders;
mod update_reminder;

use actix_web::web;
use create_reminder::create_reminder_admin_controller;
use get_reminders::get_reminders_admin_controller;
use update_reminder::update_reminder_admin_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/user/{user_id}/reminders",
        web::post().to(create_reminder_admin_controller),
    );
    cfg.route(
        "/user/{user_id}/reminders",
        web::get().to(get_reminders_admin_controller),
    );
    cfg.route(
        "/reminders/{reminder_id}",
        web::put().to(update_reminder_admin_controller),
    );
}
