use std::sync::Arc;

use northwind::{
    config::{AppConfig, DatabaseKind},
    db::Handle,
};
use northwind_customer::{
    infra::{PostgresCustomerRepository, SqliteCustomerRepository},
    service::CustomerServiceImpl,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::new(northwind::util::config_dir())?;

    northwind::logging::init_tracing(&config.logging)?;

    tracing::info!("app config: {:?}", config.server);

    let router = match config.database.kind()? {
        DatabaseKind::Postgres => {
            let pool = northwind::db::connect_postgres(&config.database).await?;
            let repo = Arc::new(PostgresCustomerRepository);
            if config.database.init_schema {
                repo.init_schema(&mut Handle::Pool(pool.clone())).await?;
            }
            tracing::info!("connected to postgres");
            northwind_customer::router(Arc::new(CustomerServiceImpl::new(
                pool, repo,
            )))
        }
        DatabaseKind::Sqlite => {
            let pool = northwind::db::connect_sqlite(&config.database).await?;
            let repo = Arc::new(SqliteCustomerRepository);
            if config.database.init_schema {
                repo.init_schema(&mut Handle::Pool(pool.clone())).await?;
            }
            tracing::info!("connected to sqlite");
            northwind_customer::router(Arc::new(CustomerServiceImpl::new(
                pool, repo,
            )))
        }
    };

    northwind::http::run(router, &config.server).await?;
    Ok(())
}
