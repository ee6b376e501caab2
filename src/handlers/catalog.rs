use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::catalog::{RoomType, RoomTypeView, ServiceOption};

pub async fn list_service_options(pool: &SqlitePool) -> Result<Vec<ServiceOption>, sqlx::Error> {
    sqlx::query_as::<_, ServiceOption>(
        r#"
        SELECT so.id, so.name, so.price, so.is_addon, so.room_type_id, rt.name AS room_type_name
        FROM service_options so
        LEFT JOIN room_types rt ON rt.id = so.room_type_id
        ORDER BY rt.name IS NULL, rt.name, so.is_addon, so.name
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn room_types(pool: web::Data<SqlitePool>) -> Result<HttpResponse, AppError> {
    let room_types = sqlx::query_as::<_, RoomType>("SELECT id, name FROM room_types ORDER BY id")
        .fetch_all(pool.get_ref())
        .await?;

    let views: Vec<RoomTypeView> = room_types.into_iter().map(RoomTypeView::from).collect();
    Ok(HttpResponse::Ok().json(views))
}

pub async fn service_options(pool: web::Data<SqlitePool>) -> Result<HttpResponse, AppError> {
    let options = list_service_options(&pool).await?;
    Ok(HttpResponse::Ok().json(options))
}
