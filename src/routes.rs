use actix_web::web;

use crate::error::AppError;
use crate::handlers::{admin, auth, bookings, catalog, dashboard, onboarding};

pub fn configure(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| AppError::Validation(err.to_string()).into());

    cfg.app_data(json_config)
        .service(
            web::scope("/auth")
                .route("/signup", web::post().to(auth::sign_up))
                .route("/signin", web::post().to(auth::sign_in))
                .route("/signout", web::post().to(auth::sign_out))
                .route("/session", web::get().to(auth::session))
                .route("/account", web::delete().to(auth::delete_account)),
        )
        .service(
            web::scope("/onboarding")
                .route("", web::get().to(onboarding::status))
                .route("/basic-info", web::post().to(onboarding::basic_info))
                .route("/property-details", web::post().to(onboarding::property_details))
                .route(
                    "/service-preferences",
                    web::post().to(onboarding::service_preferences),
                ),
        )
        .service(
            web::scope("/dashboard")
                .route("", web::get().to(dashboard::summary))
                .route("/profile", web::put().to(dashboard::update_profile)),
        )
        .service(
            web::scope("/catalog")
                .route("/room-types", web::get().to(catalog::room_types))
                .route("/service-options", web::get().to(catalog::service_options)),
        )
        .service(
            web::scope("/bookings")
                .route("", web::post().to(bookings::create_booking))
                .route("/upcoming", web::get().to(bookings::upcoming))
                .route("/next", web::get().to(bookings::next_service))
                .route("/history", web::get().to(bookings::history))
                .route("/{id}", web::get().to(bookings::get_booking))
                .route("/{id}", web::put().to(bookings::update_booking))
                .route("/{id}", web::delete().to(bookings::cancel_booking)),
        )
        .service(
            web::scope("/admin")
                .route("/auth/signin", web::post().to(auth::admin_sign_in))
                .route("/stats", web::get().to(admin::stats))
                .route("/revenue", web::get().to(admin::revenue))
                .route("/service-options", web::get().to(admin::service_options))
                .route(
                    "/service-options/{id}/price",
                    web::put().to(admin::update_price),
                )
                .route("/price-adjustments", web::get().to(admin::price_adjustments))
                .route("/admins/{user_id}", web::put().to(admin::grant_admin)),
        );
}
