use actix_web::{web, HttpResponse};
use log::info;
use serde_json::json;
use sqlx::SqlitePool;

use crate::auth::AuthUser;
use crate::db::bookings;
use crate::error::AppError;
use crate::models::booking::{BookingRequest, BookingStatus, ServiceBooking};
use crate::pricing::{calculate_total, validate_rooms};

fn today() -> chrono::NaiveDate {
    chrono::Utc::now().date_naive()
}

fn validate_request(body: &BookingRequest) -> Result<(), AppError> {
    validate_rooms(&body.rooms)?;

    if body.booking_date < today() {
        return Err(AppError::Validation(
            "Booking date cannot be in the past".to_string(),
        ));
    }

    Ok(())
}

pub async fn create_booking(
    pool: web::Data<SqlitePool>,
    user: AuthUser,
    body: web::Json<BookingRequest>,
) -> Result<HttpResponse, AppError> {
    // 1. Validate the selection and date
    validate_request(&body)?;

    // 2. Price it server side
    let total_price = calculate_total(&body.rooms);

    // 3. Booking, rooms and add-ons go in together or not at all
    let mut tx = pool.begin().await?;

    let booking_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO service_bookings (user_id, booking_date, time_slot, status, total_price)
        VALUES (?, ?, ?, 'pending', ?)
        RETURNING id
        "#,
    )
    .bind(user.id())
    .bind(body.booking_date)
    .bind(body.time_slot)
    .bind(total_price)
    .fetch_one(&mut *tx)
    .await?;

    bookings::insert_rooms(&mut tx, booking_id, &body.rooms).await?;

    tx.commit().await?;

    info!("User {} booked service {booking_id} for ${total_price:.2}", user.id());

    let booking = sqlx::query_as::<_, ServiceBooking>("SELECT * FROM service_bookings WHERE id = ?")
        .bind(booking_id)
        .fetch_one(pool.get_ref())
        .await?;
    let detail = bookings::load_detail(&pool, booking).await?;

    Ok(HttpResponse::Created().json(detail))
}

pub async fn update_booking(
    pool: web::Data<SqlitePool>,
    user: AuthUser,
    path: web::Path<i64>,
    body: web::Json<BookingRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    validate_request(&body)?;

    let total_price = calculate_total(&body.rooms);

    let mut tx = pool.begin().await?;

    let existing = bookings::find_owned(&mut tx, id, user.id())
        .await?
        .ok_or(AppError::NotFound("Booking"))?;

    if !existing.status.is_editable() {
        return Err(AppError::Conflict(format!(
            "Booking {id} can no longer be changed"
        )));
    }

    sqlx::query(
        "UPDATE service_bookings SET total_price = ?, booking_date = ?, time_slot = ? WHERE id = ?",
    )
    .bind(total_price)
    .bind(body.booking_date)
    .bind(body.time_slot)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    bookings::delete_rooms(&mut tx, id).await?;
    bookings::insert_rooms(&mut tx, id, &body.rooms).await?;

    tx.commit().await?;

    info!("User {} updated service {id}, new total ${total_price:.2}", user.id());

    let booking = sqlx::query_as::<_, ServiceBooking>("SELECT * FROM service_bookings WHERE id = ?")
        .bind(id)
        .fetch_one(pool.get_ref())
        .await?;
    let detail = bookings::load_detail(&pool, booking).await?;

    Ok(HttpResponse::Ok().json(detail))
}

pub async fn get_booking(
    pool: web::Data<SqlitePool>,
    user: AuthUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let mut conn = pool.acquire().await?;
    let booking = bookings::find_owned(&mut conn, id, user.id())
        .await?
        .ok_or(AppError::NotFound("Booking"))?;
    drop(conn);

    let detail = bookings::load_detail(&pool, booking).await?;
    Ok(HttpResponse::Ok().json(detail))
}

pub async fn upcoming(pool: web::Data<SqlitePool>, user: AuthUser) -> Result<HttpResponse, AppError> {
    let rows = bookings::upcoming(&pool, user.id(), today()).await?;
    let details = bookings::load_details(&pool, rows).await?;
    Ok(HttpResponse::Ok().json(details))
}

/// The soonest upcoming booking, or `null` when nothing is scheduled.
pub async fn next_service(pool: web::Data<SqlitePool>, user: AuthUser) -> Result<HttpResponse, AppError> {
    let next = bookings::upcoming(&pool, user.id(), today())
        .await?
        .into_iter()
        .next();

    match next {
        Some(booking) => {
            let detail = bookings::load_detail(&pool, booking).await?;
            Ok(HttpResponse::Ok().json(detail))
        }
        None => Ok(HttpResponse::Ok().json(serde_json::Value::Null)),
    }
}

pub async fn history(pool: web::Data<SqlitePool>, user: AuthUser) -> Result<HttpResponse, AppError> {
    let rows = bookings::history(&pool, user.id(), today()).await?;
    let details = bookings::load_details(&pool, rows).await?;
    Ok(HttpResponse::Ok().json(details))
}

pub async fn cancel_booking(
    pool: web::Data<SqlitePool>,
    user: AuthUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let mut tx = pool.begin().await?;

    let booking = bookings::find_owned(&mut tx, id, user.id())
        .await?
        .ok_or(AppError::NotFound("Booking"))?;

    if booking.status == BookingStatus::Completed {
        return Err(AppError::Conflict(
            "Completed services cannot be cancelled".to_string(),
        ));
    }

    bookings::delete_booking(&mut tx, id).await?;

    tx.commit().await?;

    info!("User {} cancelled service {id}", user.id());

    Ok(HttpResponse::Ok().json(json!({
        "message": "Service cancelled successfully",
        "id": id,
        "refund_amount": booking.total_price
    })))
}
