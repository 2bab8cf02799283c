mod cache;
mod context;
mod core;
mod database;
mod error;
mod handlers;
mod middlewares;
mod request;
mod response;

use actix_web::web::{delete, get, post, put, resource, scope, Data};
use actix_web::HttpServer;
use sqlx::postgres::PgPoolOptions;

use cache::redis::RedisAnswerCache;
use database::notifier::PgNotifier;
use database::sqlx::PgSqlxManager;
use middlewares::jwt::{Jwt, JWT_SECRET};

fn bind_addr() -> String {
    dotenv::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into())
}

#[actix_web::main]
async fn main() -> Result<(), std::io::Error> {
    dotenv::dotenv().ok();
    env_logger::init();
    let secret = dotenv::var(JWT_SECRET).expect("environment variable JWT_SECRET not been set");
    let database_url = dotenv::var("DATABASE_URL").expect("environment variable DATABASE_URL not been set");
    let redis_url = dotenv::var("REDIS_URL").expect("environment variable REDIS_URL not been set");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("failed to connect to database");
    let redis_client = redis::Client::open(redis_url).expect("invalid redis url");
    HttpServer::new(move || {
        actix_web::App::new()
            .wrap(actix_web::middleware::Logger::default())
            .app_data(Data::new(PgSqlxManager::new(pool.clone())))
            .app_data(Data::new(PgNotifier::new(pool.clone())))
            .app_data(Data::new(RedisAnswerCache::new(redis_client.clone())))
            .service(resource("signup").route(post().to(handlers::user::signup)))
            .service(resource("login").route(post().to(handlers::user::login)))
            .service(
                scope("")
                    .wrap(Jwt::new(secret.as_bytes().to_owned()))
                    .service(
                        scope("companies").route("", post().to(handlers::company::create)).service(
                            scope("{company_id}")
                                .route("members", post().to(handlers::company::add_member))
                                .route("members/{user_id}/average_score", get().to(handlers::score::company_average))
                                .service(
                                    scope("quizzes")
                                        .route("", post().to(handlers::quiz::create))
                                        .route("", get().to(handlers::quiz::list))
                                        .service(
                                            scope("{quiz_id}")
                                                .route("", get().to(handlers::quiz::detail))
                                                .route("", put().to(handlers::quiz::update))
                                                .route("", delete().to(handlers::quiz::delete_quiz)),
                                        ),
                                ),
                        ),
                    )
                    .service(scope("quizzes").route("{quiz_id}/submissions", post().to(handlers::quiz::submit)))
                    .service(
                        scope("users/me")
                            .route("average_score", get().to(handlers::score::my_average))
                            .route("quiz_data", get().to(handlers::export::my_quiz_data)),
                    )
                    .service(resource("notifications").route(get().to(handlers::notification::list))),
            )
    })
    .bind(bind_addr())?
    .run()
    .await
}
