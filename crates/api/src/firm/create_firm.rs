use crate::error::LedgerdeskError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use ledgerdesk_api_structs::create_firm::*;
use ledgerdesk_domain::Firm;
use ledgerdesk_infra::Context;

pub async fn create_firm_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, LedgerdeskError> {
    let body = body.0;
    let usecase = CreateFirmUseCase {
        name: body.name,
        code: body.code,
        reply_to_email: body.reply_to_email,
    };

    execute(usecase, &ctx)
        .await
        .map(|firm| HttpResponse::Created().json(APIResponse::new(firm)))
        .map_err(LedgerdeskError::from)
}

#[derive(Debug)]
pub struct CreateFirmUseCase {
    pub name: String,
    pub code: String,
    pub reply_to_email: Option<String>,
}

#[derive(Debug)]
pub enum UseCaseError {
    InvalidCreateFirmCode,
    InvalidReplyToEmail(String),
    StorageError,
}

impl From<UseCaseError> for LedgerdeskError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidCreateFirmCode => {
                Self::Unauthorized("Invalid code provided".into())
            }
            UseCaseError::InvalidReplyToEmail(email) => Self::BadClientData(format!(
                "Invalid replyToEmail provided: {}",
                email
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateFirmUseCase {
    type Response = Firm;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateFirm";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        if self.code != ctx.config.create_firm_secret_code {
            return Err(UseCaseError::InvalidCreateFirmCode);
        }

        let mut firm = Firm::new(&self.name);
        if let Some(email) = self.reply_to_email.take() {
            if !firm.settings.set_reply_to_email(Some(email.clone())) {
                return Err(UseCaseError::InvalidReplyToEmail(email));
            }
        }

        ctx.repos
            .firms
            .insert(&firm)
            .await
            .map(|_| firm)
            .map_err(|_| UseCaseError::StorageError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerdesk_infra::setup_context_inmemory;

    #[actix_web::test]
    async fn rejects_wrong_secret_code() {
        let ctx = setup_context_inmemory();
        let usecase = CreateFirmUseCase {
            name: "Acme Accountants".into(),
            code: format!("{}-wrong", ctx.config.create_firm_secret_code),
            reply_to_email: None,
        };
        assert!(execute(usecase, &ctx).await.is_err());
    }

    #[actix_web::test]
    async fn creates_firm_with_valid_code() {
        let ctx = setup_context_inmemory();
        let usecase = CreateFirmUseCase {
            name: "Acme Accountants".into(),
            code: ctx.config.create_firm_secret_code.clone(),
            reply_to_email: Some("post@acme.no".into()),
        };
        let firm = execute(usecase, &ctx).await.unwrap();
        assert!(firm.secret_api_key.starts_with("sk_"));
        let stored = ctx.repos.firms.find(&firm.id).await.unwrap();
        assert_eq!(stored.settings.reply_to_email, Some("post@acme.no".into()));
    }
}
