#![allow(async_fn_in_trait)]

extern crate actix_web;
extern crate dotenv;
extern crate env_logger;
extern crate futures;
extern crate itertools;
extern crate jsonwebtoken;
extern crate serde;
extern crate serde_json;
extern crate sqlx;
extern crate thiserror;

mod config;
mod context;
mod core;
mod database;
mod deserializers;
mod error;
mod handlers;
mod impls;
mod middlewares;
pub mod request;
pub mod response;
mod validation;

use actix_web::web::Data;
use actix_web::{middleware, App, HttpServer};
use anyhow::Context;
use config::Config;
use database::sqlite::SqliteStoreManager;
use middlewares::recover::RecoverMiddleware;
use validation::Validator;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;
    let manager = SqliteStoreManager::connect(&config.db_path)
        .await
        .with_context(|| format!("failed to open database {}", config.db_path))?;
    let schema = std::fs::read_to_string(&config.init_sql_path).with_context(|| format!("failed to read {}", config.init_sql_path))?;
    manager.run_script(&schema).await.context("failed to initialize database schema")?;
    log::info!("database {} ready", config.db_path);

    let validator = Data::new(Validator::new(config.max_page_size));
    let manager = Data::new(manager);
    let secret = config.jwt_signing_key.clone().into_bytes();
    log::info!("listening on 0.0.0.0:{}", config.port);
    HttpServer::new(move || {
        App::new()
            .wrap(RecoverMiddleware)
            .wrap(middleware::Logger::default())
            .app_data(manager.clone())
            .app_data(validator.clone())
            .configure(handlers::routes(secret.clone()))
    })
    .bind(("0.0.0.0", config.port))?
    .run()
    .await?;
    Ok(())
}
