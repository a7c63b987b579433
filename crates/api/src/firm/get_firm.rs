use crate::error::LedgerdeskError;
use crate::shared::auth::protect_firm_route;
use actix_web::{web, HttpRequest, HttpResponse};
use ledgerdesk_api_structs::get_firm::*;
use ledgerdesk_infra::Context;

pub async fn get_firm_controller(
    http_req: HttpRequest,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, LedgerdeskError> {
    let firm = protect_firm_route(&http_req, &ctx).await?;

    Ok(HttpResponse::Ok().json(APIResponse::new(firm)))
}
