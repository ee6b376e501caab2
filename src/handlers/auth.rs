use actix_web::{web, HttpResponse};
use log::info;
use serde_json::json;
use validator::Validate;

use crate::auth::{AuthContext, AuthUser};
use crate::error::AppError;
use crate::models::account::{Credentials, Session};

fn session_response(session: &Session, redirect: &str) -> serde_json::Value {
    json!({
        "token": session.token,
        "user_id": session.user_id,
        "expires_at": session.expires_at,
        "redirect": redirect,
    })
}

pub async fn sign_up(
    ctx: web::Data<AuthContext>,
    body: web::Json<Credentials>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let session = ctx.sign_up(&body).await?;
    Ok(HttpResponse::Created().json(session_response(&session, "/room-details")))
}

pub async fn sign_in(
    ctx: web::Data<AuthContext>,
    body: web::Json<Credentials>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let session = ctx.sign_in(&body).await?;
    info!("User {} signed in", session.user_id);
    Ok(HttpResponse::Ok().json(session_response(&session, "/room-details")))
}

pub async fn sign_out(ctx: web::Data<AuthContext>, user: AuthUser) -> Result<HttpResponse, AppError> {
    ctx.sign_out(user.token()).await?;
    info!("User {} signed out", user.id());
    Ok(HttpResponse::Ok().json(json!({ "message": "Signed out", "redirect": "/" })))
}

pub async fn session(user: AuthUser) -> HttpResponse {
    HttpResponse::Ok().json(&user.0)
}

pub async fn delete_account(
    ctx: web::Data<AuthContext>,
    user: AuthUser,
) -> Result<HttpResponse, AppError> {
    ctx.delete_account(user.id()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Account deleted", "redirect": "/" })))
}

/// Signs in and then requires an active admin profile. Anyone else has the
/// new session revoked straight away.
pub async fn admin_sign_in(
    ctx: web::Data<AuthContext>,
    body: web::Json<Credentials>,
) -> Result<HttpResponse, AppError> {
    body.validate()?;

    let session = ctx.sign_in(&body).await?;

    match ctx.admin_profile(session.user_id).await {
        Ok(Some(profile)) if profile.is_active => {
            info!("Admin {} signed in", session.user_id);
            let mut response = session_response(&session, "/admin/dashboard");
            response["role"] = json!(profile.role);
            Ok(HttpResponse::Ok().json(response))
        }
        Ok(_) => {
            ctx.sign_out(&session.token).await?;
            Err(AppError::admin_required())
        }
        Err(e) => {
            log::error!("Admin verification failed for user {}: {e}", session.user_id);
            ctx.sign_out(&session.token).await?;
            Err(AppError::Forbidden {
                message: "Error verifying admin status".to_string(),
                redirect: "/admin/auth",
            })
        }
    }
}
