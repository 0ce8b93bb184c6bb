pub mod health;
pub mod auth;
pub mod users;
pub mod books;
pub mod favorites;
pub mod reviews;


use actix_web::web;

use crate::error::AppError;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(json_config())
            .app_data(query_config())
            .service(health::health_check)
            .configure(auth::auth_routes)
            .configure(users::users_routes)
            .configure(books::books_routes)
            .configure(reviews::reviews_routes)
    );
}

// Corps JSON illisible : même format d'erreur que le reste de l'API
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        AppError::invalid_input(format!("Invalid request body: {}", err)).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        AppError::invalid_input(format!("Invalid query string: {}", err)).into()
    })
}
