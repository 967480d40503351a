use actix_files::Files;
use actix_web::middleware::Logger;
use actix_web::web::Data;
use actix_web::{App, HttpServer};

use nodex::config::{Config, StoreKind};
use nodex::core::ports::repository::Manager;
use nodex::core::services::recruiter::{ensure_recruiter, NewRecruiter};
use nodex::database::memory::MemoryManager;
use nodex::database::sqlx::PgManager;
use nodex::error::Error;
use nodex::impls::captcha::turnstile::Turnstile;
use nodex::impls::tokener::jwt::JWT;
use nodex::privilege::casbin::CasbinAuthorizer;
use nodex::storer::{LocalStorer, PUBLIC_PREFIX};

async fn bootstrap<M: Manager>(manager: &M, config: &Config) -> Result<(), Error> {
    let Some(b) = &config.bootstrap else {
        return Ok(());
    };
    let mut db = manager.db().await?;
    let created = ensure_recruiter(
        &mut db,
        NewRecruiter {
            username: &b.username,
            password: &b.password,
            assignee: &b.username,
            exec: true,
            team_mgmt: true,
        },
    )
    .await?;
    match created {
        Some(id) => log::info!("created bootstrap recruiter {} ({})", b.username, id),
        None => log::info!("bootstrap recruiter {} already exists", b.username),
    }
    Ok(())
}

async fn serve<M>(manager: M, config: Config) -> Result<(), Error>
where
    M: Manager + Send + Sync,
{
    bootstrap(&manager, &config).await?;
    let manager = Data::new(manager);
    let authorizer = Data::new(CasbinAuthorizer::new().await?);
    let verifier = Data::new(Turnstile::new(config.turnstile_secret.clone(), config.turnstile_verify_url.clone()));
    let tokener = Data::new(JWT::new(config.auth_secret.clone().into_bytes()));
    let storer = Data::new(LocalStorer::new(&config.upload_path)?);
    let secret = config.auth_secret.clone().into_bytes();
    let upload_path = config.upload_path.clone();
    log::info!("listening on {}:{}", config.bind_addr, config.port);
    HttpServer::new(move || {
        let secret = secret.clone();
        App::new()
            .wrap(Logger::default())
            .app_data(manager.clone())
            .app_data(authorizer.clone())
            .app_data(verifier.clone())
            .app_data(tokener.clone())
            .app_data(storer.clone())
            .service(Files::new(PUBLIC_PREFIX, &upload_path))
            .configure(|cfg| nodex::configure::<M, CasbinAuthorizer, Turnstile, LocalStorer>(cfg, secret))
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await?;
    Ok(())
}

#[actix_web::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("actix_web=info,nodex=info")).init();
    let config = Config::from_env()?;
    match (config.store, config.database_url.clone()) {
        (StoreKind::Postgres, Some(url)) => {
            let manager = PgManager::connect(&url, config.max_connections).await?;
            manager.init_schema().await?;
            serve(manager, config).await
        }
        _ => {
            log::warn!("using the in-memory store, data is lost on restart");
            serve(MemoryManager::new(), config).await
        }
    }
}
