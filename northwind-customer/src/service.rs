use crate::{dto::CustomerDto, entity::CustomerId};

/// Policy layer between the HTTP handlers and the repository.
///
/// Absent records are reported as `None`/`false`; turning those into 404s is
/// the transport's job.
#[async_trait::async_trait]
pub trait CustomerService: Sync + Send {
    async fn list(&self) -> northwind::Result<Vec<CustomerDto>>;

    async fn get_by_id(
        &self,
        id: &CustomerId,
    ) -> northwind::Result<Option<CustomerDto>>;

    /// Fails with `Conflict` if the id is taken; the stored row is left as is.
    async fn create(
        &self,
        customer: CustomerDto,
    ) -> northwind::Result<CustomerDto>;

    /// `id` overrides whatever id `customer` carries. Never inserts.
    async fn update_by_id(
        &self,
        id: &CustomerId,
        customer: CustomerDto,
    ) -> northwind::Result<Option<CustomerDto>>;

    async fn delete_by_id(&self, id: &CustomerId) -> northwind::Result<bool>;
}

mod customer_service_impl;
pub use customer_service_impl::*;
