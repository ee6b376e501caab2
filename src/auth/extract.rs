use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use log::warn;

use super::AuthContext;
use crate::error::AppError;
use crate::models::account::SessionUser;
use crate::models::admin::AdminProfile;

/// A request carrying a valid session token.
#[derive(Debug, Clone)]
pub struct AuthUser(pub SessionUser);

impl AuthUser {
    pub fn id(&self) -> i64 {
        self.0.user_id
    }

    pub fn token(&self) -> &str {
        &self.0.token
    }
}

/// A request from a user with an active admin profile.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub user: SessionUser,
    pub profile: AdminProfile,
}

impl AdminUser {
    pub fn id(&self) -> i64 {
        self.user.user_id
    }
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

fn auth_context(req: &HttpRequest) -> Result<web::Data<AuthContext>, AppError> {
    req.app_data::<web::Data<AuthContext>>()
        .cloned()
        .ok_or_else(|| AppError::Internal("auth context is not registered".to_string()))
}

async fn resolve(ctx: &AuthContext, token: Option<String>) -> Result<SessionUser, AppError> {
    let token = token.ok_or(AppError::Unauthorized)?;
    ctx.session_user(&token).await?.ok_or(AppError::Unauthorized)
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let ctx = auth_context(req);
        let token = bearer_token(req);

        Box::pin(async move {
            let ctx = ctx?;
            resolve(&ctx, token).await.map(AuthUser)
        })
    }
}

impl FromRequest for AdminUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let ctx = auth_context(req);
        let token = bearer_token(req);

        Box::pin(async move {
            let ctx = ctx?;
            let user = resolve(&ctx, token).await?;

            match ctx.admin_profile(user.user_id).await? {
                Some(profile) if profile.is_active => Ok(AdminUser { user, profile }),
                _ => {
                    // Non-admins are signed out and sent back to the admin sign in page
                    warn!("User {} denied admin access", user.user_id);
                    ctx.sign_out(&user.token).await?;
                    Err(AppError::admin_required())
                }
            }
        })
    }
}
