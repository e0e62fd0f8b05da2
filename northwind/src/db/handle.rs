use futures_core::{future::BoxFuture, stream::BoxStream};

use sqlx::Acquire;

/// Where a repository call runs: straight on the pool, on a pooled
/// connection, or inside an open transaction.
#[derive(Debug)]
pub enum Handle<'c, DB>
where
    DB: sqlx::Database,
    for<'e> &'e mut DB::Connection: sqlx::Executor<'e, Database = DB>,
{
    Pool(sqlx::Pool<DB>),
    Transaction(sqlx::Transaction<'c, DB>),
    Connection(sqlx::pool::PoolConnection<DB>),
}

// Same call on whichever executor the handle wraps.
macro_rules! on_executor {
    ($handle:expr, $ex:ident => $call:expr) => {
        match $handle {
            Handle::Pool($ex) => $call,
            Handle::Transaction($ex) => $call,
            Handle::Connection($ex) => $call,
        }
    };
}

impl<'c, DB> Handle<'c, DB>
where
    DB: sqlx::Database,
    for<'e> &'e mut DB::Connection: sqlx::Executor<'e, Database = DB>,
{
    /// Opens a transaction on top of this handle. On a transaction handle
    /// this is a savepoint.
    ///
    /// Dropping the returned handle without [`Handle::commit`] rolls back.
    pub fn begin(&mut self) -> BoxFuture<'_, crate::Result<Handle<'_, DB>>> {
        Box::pin(async move {
            let tx = match self {
                Handle::Pool(pool) => Acquire::begin(&*pool).await,
                Handle::Transaction(tx) => Acquire::begin(tx).await,
                Handle::Connection(conn) => Acquire::begin(conn).await,
            }
            .map_err(crate::db::map_err)?;
            Ok(Handle::Transaction(tx))
        })
    }

    /// No-op unless this is a transaction handle.
    pub fn commit(self) -> BoxFuture<'c, crate::Result<()>> {
        Box::pin(async move {
            if let Handle::Transaction(tx) = self {
                tx.commit().await.map_err(crate::db::map_err)?;
            }
            Ok(())
        })
    }

    pub fn rollback(self) -> BoxFuture<'c, crate::Result<()>> {
        Box::pin(async move {
            if let Handle::Transaction(tx) = self {
                tx.rollback().await.map_err(crate::db::map_err)?;
            }
            Ok(())
        })
    }
}

/// Borrowed view of a [`Handle`] usable as a sqlx executor.
#[derive(Debug)]
pub struct ExecutorImpl<'h, 'c, DB>
where
    DB: sqlx::Database,
    for<'e> &'e mut DB::Connection: sqlx::Executor<'e, Database = DB>,
{
    pub handle: &'h mut Handle<'c, DB>,
}

pub trait AsExecutor {
    type Executor<'h>: sqlx::Executor<'h>
    where
        Self: 'h;

    fn as_executor<'h>(&'h mut self) -> Self::Executor<'h>;
}

impl<'c, DB> AsExecutor for Handle<'c, DB>
where
    DB: sqlx::Database,
    for<'e> &'e mut DB::Connection: sqlx::Executor<'e, Database = DB>,
{
    type Executor<'h>
        = ExecutorImpl<'h, 'c, DB>
    where
        'c: 'h;

    fn as_executor<'h>(&'h mut self) -> Self::Executor<'h> {
        ExecutorImpl { handle: self }
    }
}

impl<'h, 'c, DB> sqlx::Executor<'h> for ExecutorImpl<'h, 'c, DB>
where
    DB: sqlx::Database,
    for<'e> &'e mut DB::Connection: sqlx::Executor<'e, Database = DB>,
{
    type Database = DB;

    fn fetch_many<'e, 'q: 'e, E>(
        self,
        query: E,
    ) -> BoxStream<
        'e,
        Result<
            sqlx::Either<
                <Self::Database as sqlx::Database>::QueryResult,
                <Self::Database as sqlx::Database>::Row,
            >,
            sqlx::Error,
        >,
    >
    where
        'c: 'e,
        'h: 'e,
        E: 'q + sqlx::Execute<'q, Self::Database>,
    {
        on_executor!(self.handle, ex => ex.fetch_many(query))
    }

    fn fetch_optional<'e, 'q: 'e, E>(
        self,
        query: E,
    ) -> BoxFuture<
        'e,
        Result<Option<<Self::Database as sqlx::Database>::Row>, sqlx::Error>,
    >
    where
        'c: 'e,
        'h: 'e,
        E: 'q + sqlx::Execute<'q, Self::Database>,
    {
        on_executor!(self.handle, ex => ex.fetch_optional(query))
    }

    fn prepare_with<'e, 'q: 'e>(
        self,
        sql: &'q str,
        parameters: &'e [<Self::Database as sqlx::Database>::TypeInfo],
    ) -> BoxFuture<
        'e,
        Result<<Self::Database as sqlx::Database>::Statement<'q>, sqlx::Error>,
    >
    where
        'c: 'e,
        'h: 'e,
    {
        on_executor!(self.handle, ex => ex.prepare_with(sql, parameters))
    }

    fn describe<'e, 'q: 'e>(
        self,
        sql: &'q str,
    ) -> BoxFuture<'e, Result<sqlx::Describe<Self::Database>, sqlx::Error>>
    where
        'c: 'e,
        'h: 'e,
    {
        on_executor!(self.handle, ex => ex.describe(sql))
    }
}
