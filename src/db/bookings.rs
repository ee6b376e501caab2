//! Booking rows and their dependent room and add-on rows.
//!
//! Writers take a `SqliteConnection` so callers run them inside one
//! transaction. Add-ons are always removed before their room, and rooms
//! before their booking.

use sqlx::{SqliteConnection, SqlitePool};

use crate::error::AppError;
use crate::models::booking::{BookingDetail, BookingRoom, RoomDetail, ServiceBooking};
use crate::pricing::SelectedRoom;

// Orders bookings on the same day by slot.
const SLOT_ORDER: &str =
    "CASE time_slot WHEN 'morning' THEN 0 WHEN 'midday' THEN 1 WHEN 'afternoon' THEN 2 ELSE 3 END";

pub async fn insert_rooms(
    conn: &mut SqliteConnection,
    booking_id: i64,
    rooms: &[SelectedRoom],
) -> Result<(), AppError> {
    for room in rooms {
        let room_type_id: i64 = sqlx::query_scalar("SELECT id FROM room_types WHERE name = ?")
            .bind(&room.room_type)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| AppError::Validation(format!("Unknown room type: {}", room.room_type)))?;

        let room_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO booking_rooms (booking_id, room_type_id, service_type, quantity)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(booking_id)
        .bind(room_type_id)
        .bind(room.tier)
        .bind(room.quantity() as i64)
        .fetch_one(&mut *conn)
        .await?;

        for addon in &room.addons {
            // Prefer the option scoped to this room type over a global one
            let option_id: i64 = sqlx::query_scalar(
                r#"
                SELECT id FROM service_options
                WHERE name = ? AND is_addon = 1
                AND (room_type_id = ? OR room_type_id IS NULL)
                ORDER BY room_type_id IS NULL
                LIMIT 1
                "#,
            )
            .bind(addon)
            .bind(room_type_id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| {
                AppError::Validation(format!("{addon} is not available for {}", room.room_type))
            })?;

            sqlx::query("INSERT INTO booking_addons (booking_room_id, service_option_id) VALUES (?, ?)")
                .bind(room_id)
                .bind(option_id)
                .execute(&mut *conn)
                .await?;
        }
    }

    Ok(())
}

pub async fn delete_rooms(conn: &mut SqliteConnection, booking_id: i64) -> Result<(), sqlx::Error> {
    let room_ids: Vec<i64> = sqlx::query_scalar("SELECT id FROM booking_rooms WHERE booking_id = ?")
        .bind(booking_id)
        .fetch_all(&mut *conn)
        .await?;

    for room_id in room_ids {
        sqlx::query("DELETE FROM booking_addons WHERE booking_room_id = ?")
            .bind(room_id)
            .execute(&mut *conn)
            .await?;
    }

    sqlx::query("DELETE FROM booking_rooms WHERE booking_id = ?")
        .bind(booking_id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Removes a booking together with its rooms and add-ons.
pub async fn delete_booking(conn: &mut SqliteConnection, booking_id: i64) -> Result<(), sqlx::Error> {
    delete_rooms(conn, booking_id).await?;

    sqlx::query("DELETE FROM service_bookings WHERE id = ?")
        .bind(booking_id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

pub async fn find_owned(
    conn: &mut SqliteConnection,
    booking_id: i64,
    user_id: i64,
) -> Result<Option<ServiceBooking>, sqlx::Error> {
    sqlx::query_as::<_, ServiceBooking>("SELECT * FROM service_bookings WHERE id = ? AND user_id = ?")
        .bind(booking_id)
        .bind(user_id)
        .fetch_optional(conn)
        .await
}

pub async fn upcoming(
    pool: &SqlitePool,
    user_id: i64,
    today: chrono::NaiveDate,
) -> Result<Vec<ServiceBooking>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT * FROM service_bookings
        WHERE user_id = ?
        AND booking_date >= ?
        AND status NOT IN ('cancelled', 'completed')
        ORDER BY booking_date ASC, {SLOT_ORDER} ASC
        "#
    );

    sqlx::query_as::<_, ServiceBooking>(&query)
        .bind(user_id)
        .bind(today)
        .fetch_all(pool)
        .await
}

pub async fn history(
    pool: &SqlitePool,
    user_id: i64,
    today: chrono::NaiveDate,
) -> Result<Vec<ServiceBooking>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT * FROM service_bookings
        WHERE user_id = ?
        AND (booking_date < ? OR status = 'completed')
        ORDER BY booking_date DESC, {SLOT_ORDER} DESC
        "#
    );

    sqlx::query_as::<_, ServiceBooking>(&query)
        .bind(user_id)
        .bind(today)
        .fetch_all(pool)
        .await
}

pub async fn load_detail(pool: &SqlitePool, booking: ServiceBooking) -> Result<BookingDetail, sqlx::Error> {
    let rooms = sqlx::query_as::<_, BookingRoom>(
        r#"
        SELECT br.id, rt.name AS room_type, br.service_type, br.quantity
        FROM booking_rooms br
        JOIN room_types rt ON rt.id = br.room_type_id
        WHERE br.booking_id = ?
        ORDER BY br.id
        "#,
    )
    .bind(booking.id)
    .fetch_all(pool)
    .await?;

    let mut details = Vec::with_capacity(rooms.len());
    for room in rooms {
        let addons: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT so.name FROM booking_addons ba
            JOIN service_options so ON so.id = ba.service_option_id
            WHERE ba.booking_room_id = ?
            ORDER BY ba.id
            "#,
        )
        .bind(room.id)
        .fetch_all(pool)
        .await?;

        details.push(RoomDetail { room, addons });
    }

    Ok(BookingDetail {
        time_slot_label: booking.time_slot.map(|slot| slot.label()),
        booking,
        rooms: details,
    })
}

pub async fn load_details(
    pool: &SqlitePool,
    bookings: Vec<ServiceBooking>,
) -> Result<Vec<BookingDetail>, sqlx::Error> {
    let mut details = Vec::with_capacity(bookings.len());
    for booking in bookings {
        details.push(load_detail(pool, booking).await?);
    }
    Ok(details)
}
