pub mod application;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use application::order_service::OrderService;
pub use db::{create_pool, DbPool};
pub use domain::policy::{AvailabilityPolicy, DEFAULT_AVAILABILITY_POLICY};
pub use infrastructure::pg_store::DieselStore;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Service type shared by the HTTP handlers.
pub type AppService = OrderService<DieselStore>;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::orders::place_order,
        handlers::orders::get_order,
        handlers::catalog::create_customer,
        handlers::catalog::create_product,
    ),
    tags(
        (name = "orders", description = "Order placement"),
        (name = "customers", description = "Customer registration"),
        (name = "products", description = "Product catalog"),
    )
)]
pub struct ApiDoc;

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    policy: AvailabilityPolicy,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let service = web::Data::new(OrderService::with_policy(DieselStore::new(pool), policy));
    let openapi = ApiDoc::openapi();

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .wrap(Logger::default())
            .service(
                web::scope("/orders")
                    .route("", web::post().to(handlers::orders::place_order))
                    .route("/{id}", web::get().to(handlers::orders::get_order)),
            )
            .route("/customers", web::post().to(handlers::catalog::create_customer))
            .route("/products", web::post().to(handlers::catalog::create_product))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
