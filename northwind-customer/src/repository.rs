use crate::entity::{Customer, CustomerId};

#[async_trait::async_trait]
pub trait CustomerRepository<DB>:
    northwind::db::BaseRepository<Customer, CustomerId, DB> + Sync + Send
where
    DB: sqlx::Database,
    for<'e> &'e mut DB::Connection: sqlx::Executor<'e, Database = DB>,
{
}
