/// CRUD surface every table repository offers. `ID` is the primary-key type.
///
/// Every call takes the [`Handle`](crate::db::Handle) to run on, so the
/// caller decides whether a sequence of calls shares a transaction.
#[async_trait::async_trait]
pub trait BaseRepository<T, ID, DB>
where
    DB: sqlx::Database,
    for<'e> &'e mut DB::Connection: sqlx::Executor<'e, Database = DB>,
    T: Send + 'static,
    ID: Sync,
{
    async fn create(
        &self,
        h: &mut crate::db::Handle<'_, DB>,
        entity: T,
    ) -> crate::Result<T>;

    async fn find_by_id(
        &self,
        h: &mut crate::db::Handle<'_, DB>,
        id: &ID,
    ) -> crate::Result<Option<T>>;

    async fn find_all(
        &self,
        h: &mut crate::db::Handle<'_, DB>,
    ) -> crate::Result<Vec<T>>;

    /// Fails with [`crate::Error::NotFound`] when no row has the entity's id.
    async fn update(
        &self,
        h: &mut crate::db::Handle<'_, DB>,
        entity: T,
    ) -> crate::Result<T>;

    /// Returns whether a row was removed.
    async fn delete(
        &self,
        h: &mut crate::db::Handle<'_, DB>,
        id: &ID,
    ) -> crate::Result<bool>;

    async fn exists_by_id(
        &self,
        h: &mut crate::db::Handle<'_, DB>,
        id: &ID,
    ) -> crate::Result<bool>;
}
