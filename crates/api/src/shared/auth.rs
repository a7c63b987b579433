use crate::error::LedgerdeskError;
use actix_web::HttpRequest;
use ledgerdesk_domain::{Firm, User, ID};
use ledgerdesk_infra::Context;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Finds the `Firm` matching the api key in the `x-api-key` header.
/// All admin routes require this to pass.
pub async fn protect_firm_route(
    req: &HttpRequest,
    ctx: &Context,
) -> Result<Firm, LedgerdeskError> {
    let api_key = match req.headers().get(API_KEY_HEADER) {
        Some(api_key) => match api_key.to_str() {
            Ok(api_key) => api_key,
            Err(_) => {
                return Err(LedgerdeskError::Unauthorized(
                    "Malformed api key provided".to_string(),
                ))
            }
        },
        None => {
            return Err(LedgerdeskError::Unauthorized(format!(
                "Missing api key in `{}` header",
                API_KEY_HEADER
            )))
        }
    };

    ctx.repos
        .firms
        .find_by_api_key(api_key)
        .await
        .ok_or_else(|| {
            LedgerdeskError::Unauthorized("The provided api key was not valid".to_string())
        })
}

/// Only lets a firm operate on users that belong to it
pub async fn firm_can_modify_user(
    firm: &Firm,
    user_id: &ID,
    ctx: &Context,
) -> Result<User, LedgerdeskError> {
    match ctx.repos.users.find(user_id).await {
        Some(user) if user.firm_id == firm.id => Ok(user),
        _ => Err(LedgerdeskError::NotFound(format!(
            "The user with id: {}, was not found.",
            user_id
        ))),
    }
}
