// src/web/routes.rs

use actix_web::{error, web, HttpRequest};

use crate::errors::AppError;
use crate::web::handlers::{
  catalog_handlers, health_handlers, order_handlers, report_handlers, simulation_handlers, webhook_handlers,
};

/// Provider batches can carry many messages; larger than actix's 256 KB default.
pub const WEBHOOK_PAYLOAD_LIMIT: usize = 4 * 1024 * 1024;

fn json_error(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
  AppError::Validation(format!("Invalid JSON body: {}", err)).into()
}

fn query_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
  AppError::Validation(format!("Invalid query parameters: {}", err)).into()
}

fn path_error(err: error::PathError, _req: &HttpRequest) -> actix_web::Error {
  AppError::Validation(format!("Invalid path parameters: {}", err)).into()
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    // Extractor failures render the same error envelope as handler errors
    .app_data(web::JsonConfig::default().error_handler(json_error))
    .app_data(web::QueryConfig::default().error_handler(query_error))
    .app_data(web::PathConfig::default().error_handler(path_error))
    // Provider-facing webhook (handshake + inbound messages)
    .service(
      web::resource("/webhook")
        .app_data(web::PayloadConfig::new(WEBHOOK_PAYLOAD_LIMIT))
        .route(web::get().to(webhook_handlers::verify_webhook_handler))
        .route(web::post().to(webhook_handlers::receive_webhook_handler)),
    )
    .service(
      web::scope("/api/v1")
        .route("/health", web::get().to(health_handlers::health_check_handler))
        // Catalog
        .route("/menu", web::get().to(catalog_handlers::chat_menu_handler))
        .route("/products/menu", web::get().to(catalog_handlers::products_menu_handler))
        .route("/variants", web::get().to(catalog_handlers::list_variants_handler))
        .route("/variants/{variant_id}", web::get().to(catalog_handlers::variant_details_handler))
        // Conversation
        .route(
          "/conversation/simulate",
          web::get().to(simulation_handlers::simulate_conversation_handler),
        )
        // Customers
        .route("/customers/orders", web::get().to(order_handlers::customer_orders_handler))
        // Orders: fixed paths before `/orders/{order_id}`
        .service(
          web::scope("/orders")
            .route("", web::post().to(order_handlers::create_order_handler))
            .route("/test", web::post().to(order_handlers::create_test_order_handler))
            .route("/history", web::get().to(order_handlers::order_history_handler))
            .route("/search", web::get().to(order_handlers::search_orders_handler))
            .route("/by-date", web::get().to(order_handlers::orders_by_date_handler))
            .route("/{order_id}", web::get().to(order_handlers::get_order_status_handler))
            .route("/{order_id}/pricing", web::get().to(order_handlers::get_order_pricing_handler))
            .route("/{order_id}/products", web::get().to(order_handlers::get_order_products_handler))
            .route("/{order_id}/status", web::post().to(order_handlers::update_order_status_handler))
            .route("/{order_id}/cancel", web::post().to(order_handlers::cancel_order_handler)),
        )
        // Reports
        .route("/reports/daily", web::get().to(report_handlers::daily_summary_handler)),
    );
}
