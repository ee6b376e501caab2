use actix_web::{web, HttpResponse};
use log::info;
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use crate::auth::{AdminUser, AuthContext};
use crate::error::AppError;
use crate::handlers::catalog::list_service_options;
use crate::models::admin::{AdminGrant, AdminRole, AdminStats, PriceAdjustment, PriceUpdate, RevenuePoint};

pub async fn stats(pool: web::Data<SqlitePool>, _admin: AdminUser) -> Result<HttpResponse, AppError> {
    let users_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profiles")
        .fetch_one(pool.get_ref())
        .await?;

    let bookings_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM service_bookings")
        .fetch_one(pool.get_ref())
        .await?;

    let total_revenue: f64 = sqlx::query_scalar("SELECT COALESCE(SUM(total_price), 0.0) FROM service_bookings")
        .fetch_one(pool.get_ref())
        .await?;

    let completed_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM service_bookings WHERE status = 'completed'")
            .fetch_one(pool.get_ref())
            .await?;

    Ok(HttpResponse::Ok().json(AdminStats {
        users_count,
        bookings_count,
        total_revenue,
        completed_count,
    }))
}

/// First seven dated bookings, oldest first, for the revenue chart.
pub async fn revenue(pool: web::Data<SqlitePool>, _admin: AdminUser) -> Result<HttpResponse, AppError> {
    let points = sqlx::query_as::<_, RevenuePoint>(
        r#"
        SELECT booking_date AS date, total_price AS amount
        FROM service_bookings
        WHERE booking_date IS NOT NULL
        ORDER BY booking_date ASC
        LIMIT 7
        "#,
    )
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(points))
}

pub async fn service_options(
    pool: web::Data<SqlitePool>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let options = list_service_options(&pool).await?;
    Ok(HttpResponse::Ok().json(options))
}

/// Changes a service option's price and records the change in one transaction.
pub async fn update_price(
    pool: web::Data<SqlitePool>,
    admin: AdminUser,
    path: web::Path<i64>,
    body: web::Json<PriceUpdate>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    body.validate()?;

    if !body.new_price.is_finite() {
        return Err(AppError::Validation("Price must be a number".to_string()));
    }

    let mut tx = pool.begin().await?;

    let previous_price: f64 = sqlx::query_scalar("SELECT price FROM service_options WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::NotFound("Service option"))?;

    if previous_price == body.new_price {
        return Ok(HttpResponse::Ok().json(json!({
            "id": id,
            "price": previous_price,
            "changed": false
        })));
    }

    sqlx::query("UPDATE service_options SET price = ? WHERE id = ?")
        .bind(body.new_price)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let adjustment = sqlx::query_as::<_, PriceAdjustment>(
        r#"
        INSERT INTO price_adjustments (service_option_id, previous_price, new_price, adjusted_by)
        VALUES (?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(previous_price)
    .bind(body.new_price)
    .bind(admin.id())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    info!(
        "Admin {} changed service option {id} price from {previous_price} to {}",
        admin.id(),
        body.new_price
    );

    Ok(HttpResponse::Ok().json(json!({
        "id": id,
        "price": body.new_price,
        "changed": true,
        "adjustment": adjustment
    })))
}

pub async fn price_adjustments(
    pool: web::Data<SqlitePool>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let rows = sqlx::query_as::<_, PriceAdjustment>(
        "SELECT * FROM price_adjustments ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(rows))
}

/// Super admins can grant, change or revoke admin access.
pub async fn grant_admin(
    ctx: web::Data<AuthContext>,
    admin: AdminUser,
    path: web::Path<i64>,
    body: web::Json<AdminGrant>,
) -> Result<HttpResponse, AppError> {
    if admin.profile.role != AdminRole::SuperAdmin {
        return Err(AppError::Forbidden {
            message: "Only super admins can manage admin access".to_string(),
            redirect: "/admin/dashboard",
        });
    }

    let user_id = path.into_inner();
    if user_id == admin.id() && !body.is_active {
        return Err(AppError::Validation(
            "You cannot deactivate your own admin access".to_string(),
        ));
    }

    let profile = ctx.grant_admin(user_id, body.role, body.is_active).await?;
    Ok(HttpResponse::Ok().json(profile))
}
