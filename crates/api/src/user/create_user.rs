use crate::error::LedgerdeskError;
use crate::shared::{
    auth::protect_firm_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use ledgerdesk_api_structs::create_user::*;
use ledgerdesk_domain::{Metadata, PlanTier, User, ID};
use ledgerdesk_infra::Context;

pub async fn create_user_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, LedgerdeskError> {
    let firm = protect_firm_route(&http_req, &ctx).await?;

    let body = body.0;
    let usecase = CreateUserUseCase {
        firm_id: firm.id,
        email: body.email,
        plan_tier: body.plan_tier.unwrap_or_default(),
        metadata: body.metadata.unwrap_or_default(),
    };

    execute(usecase, &ctx)
        .await
        .map(|user| HttpResponse::Created().json(APIResponse::new(user)))
        .map_err(LedgerdeskError::from)
}

#[derive(Debug)]
pub struct CreateUserUseCase {
    pub firm_id: ID,
    pub email: String,
    pub plan_tier: PlanTier,
    pub metadata: Metadata,
}

#[derive(Debug)]
pub enum UseCaseError {
    InvalidEmail(String),
    StorageError,
}

impl From<UseCaseError> for LedgerdeskError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidEmail(email) => {
                Self::BadClientData(format!("Invalid email provided: {}", email))
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateUserUseCase {
    type Response = User;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateUser";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        if !self.email.contains('@') {
            return Err(UseCaseError::InvalidEmail(self.email.clone()));
        }

        let mut user = User::new(self.firm_id.clone(), &self.email);
        user.plan_tier = self.plan_tier;
        user.metadata = self.metadata.clone();

        ctx.repos
            .users
            .insert(&user)
            .await
            .map(|_| user)
            .map_err(|_| UseCaseError::StorageError)
    }
}
