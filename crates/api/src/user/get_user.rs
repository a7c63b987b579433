use crate::error::LedgerdeskError;
use crate::shared::auth::{firm_can_modify_user, protect_firm_route};
use actix_web::{web, HttpRequest, HttpResponse};
use ledgerdesk_api_structs::get_user::*;
use ledgerdesk_infra::Context;

pub async fn get_user_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, LedgerdeskError> {
    let firm = protect_firm_route(&http_req, &ctx).await?;
    let user = firm_can_modify_user(&firm, &path_params.user_id, &ctx).await?;

    Ok(HttpResponse::Ok().json(APIResponse::new(user)))
}
