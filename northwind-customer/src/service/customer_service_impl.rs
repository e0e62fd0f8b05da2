use crate::{
    dto::CustomerDto,
    entity::{Customer, CustomerId},
    repository::CustomerRepository,
    service::CustomerService,
};
use northwind::db::Handle;
use std::{marker::PhantomData, sync::Arc};

pub struct CustomerServiceImpl<R, DB>
where
    R: CustomerRepository<DB>,
    DB: sqlx::Database,
    for<'e> &'e mut DB::Connection: sqlx::Executor<'e, Database = DB>,
{
    pub pool: sqlx::Pool<DB>,
    pub repo: Arc<R>,
    _db: PhantomData<fn() -> DB>,
}

impl<R, DB> CustomerServiceImpl<R, DB>
where
    R: CustomerRepository<DB>,
    DB: sqlx::Database,
    for<'e> &'e mut DB::Connection: sqlx::Executor<'e, Database = DB>,
{
    pub fn new(pool: sqlx::Pool<DB>, repo: Arc<R>) -> Self {
        Self {
            pool,
            repo,
            _db: PhantomData,
        }
    }

    fn handle(&self) -> Handle<'static, DB> {
        Handle::Pool(self.pool.clone())
    }
}

#[async_trait::async_trait]
impl<R, DB> CustomerService for CustomerServiceImpl<R, DB>
where
    R: CustomerRepository<DB>,
    DB: sqlx::Database,
    for<'e> &'e mut DB::Connection: sqlx::Executor<'e, Database = DB>,
{
    async fn list(&self) -> northwind::Result<Vec<CustomerDto>> {
        let mut handle = self.handle();
        let customers = self.repo.find_all(&mut handle).await?;
        tracing::debug!(count = customers.len(), "listed customers");
        Ok(customers.into_iter().map(CustomerDto::from).collect())
    }

    async fn get_by_id(
        &self,
        id: &CustomerId,
    ) -> northwind::Result<Option<CustomerDto>> {
        let mut handle = self.handle();
        let found = self.repo.find_by_id(&mut handle, id).await?;
        Ok(found.map(CustomerDto::from))
    }

    async fn create(
        &self,
        customer: CustomerDto,
    ) -> northwind::Result<CustomerDto> {
        customer.validate()?;
        let id = CustomerId::parse(customer.id())?;

        let mut pool_handle = self.handle();
        let mut tx_handle = pool_handle.begin().await?;

        if self.repo.exists_by_id(&mut tx_handle, &id).await? {
            tx_handle.rollback().await?;
            tracing::info!(customer_id = %id, "create rejected, id taken");
            return Err(northwind::Error::Conflict(format!(
                "customer {id} already exists"
            )));
        }

        // a racing insert of the same id still fails on the primary key,
        // which the repository reports as Conflict
        let created = self
            .repo
            .create(&mut tx_handle, Customer::from(customer))
            .await?;
        tx_handle.commit().await?;

        tracing::info!(customer_id = %id, "customer created");
        Ok(created.into())
    }

    async fn update_by_id(
        &self,
        id: &CustomerId,
        customer: CustomerDto,
    ) -> northwind::Result<Option<CustomerDto>> {
        let customer = customer.with_id(id);
        customer.validate()?;

        let mut pool_handle = self.handle();
        let mut tx_handle = pool_handle.begin().await?;

        if !self.repo.exists_by_id(&mut tx_handle, id).await? {
            tx_handle.rollback().await?;
            tracing::debug!(customer_id = %id, "update skipped, no such id");
            return Ok(None);
        }

        let result = self
            .repo
            .update(&mut tx_handle, Customer::from(customer))
            .await;
        let updated = match result {
            Ok(updated) => updated,
            // deleted between the check and the write
            Err(northwind::Error::NotFound(_)) => {
                tx_handle.rollback().await?;
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        tx_handle.commit().await?;

        tracing::info!(customer_id = %id, "customer updated");
        Ok(Some(updated.into()))
    }

    async fn delete_by_id(&self, id: &CustomerId) -> northwind::Result<bool> {
        let mut pool_handle = self.handle();
        let mut tx_handle = pool_handle.begin().await?;

        if !self.repo.exists_by_id(&mut tx_handle, id).await? {
            tx_handle.rollback().await?;
            tracing::debug!(customer_id = %id, "delete skipped, no such id");
            return Ok(false);
        }

        let deleted = self.repo.delete(&mut tx_handle, id).await?;
        tx_handle.commit().await?;

        tracing::info!(customer_id = %id, deleted, "customer deleted");
        Ok(deleted)
    }
}
