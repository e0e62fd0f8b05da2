use northwind::db::{AsExecutor, BaseRepository, Handle};

use crate::{
    entity::{Customer, CustomerId},
    repository::CustomerRepository,
};

/// DDL for the `customers` table, one statement per entry. Column widths
/// follow the Northwind schema.
pub const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS customers (
        customer_id   VARCHAR(5)  NOT NULL PRIMARY KEY,
        company_name  VARCHAR(40) NOT NULL,
        contact_name  VARCHAR(30),
        contact_title VARCHAR(30),
        address       VARCHAR(60),
        city          VARCHAR(15),
        region        VARCHAR(15),
        postal_code   VARCHAR(10),
        country       VARCHAR(15),
        phone         VARCHAR(24),
        fax           VARCHAR(24)
    )",
    "CREATE INDEX IF NOT EXISTS customers_company_name ON customers (company_name)",
    "CREATE INDEX IF NOT EXISTS customers_city ON customers (city)",
    "CREATE INDEX IF NOT EXISTS customers_region ON customers (region)",
    "CREATE INDEX IF NOT EXISTS customers_postal_code ON customers (postal_code)",
];

// Postgres and SQLite both accept `$n` placeholders and `RETURNING`.
const INSERT: &str = "INSERT INTO customers (customer_id, company_name, \
    contact_name, contact_title, address, city, region, postal_code, \
    country, phone, fax) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
    RETURNING *";

const UPDATE: &str = "UPDATE customers SET company_name = $2, \
    contact_name = $3, contact_title = $4, address = $5, city = $6, \
    region = $7, postal_code = $8, country = $9, phone = $10, fax = $11 \
    WHERE customer_id = $1 RETURNING *";

const SELECT_BY_ID: &str = "SELECT * FROM customers WHERE customer_id = $1";

const SELECT_ALL: &str = "SELECT * FROM customers";

const DELETE_BY_ID: &str = "DELETE FROM customers WHERE customer_id = $1";

const EXISTS_BY_ID: &str =
    "SELECT customer_id FROM customers WHERE customer_id = $1";

macro_rules! customer_repository {
    ($name:ident, $db:ty) => {
        pub struct $name;

        impl $name {
            /// Creates the table and its indexes if they are missing.
            pub async fn init_schema(
                &self,
                h: &mut Handle<'_, $db>,
            ) -> northwind::Result<()> {
                for stmt in SCHEMA {
                    sqlx::query(stmt)
                        .execute(h.as_executor())
                        .await
                        .map_err(northwind::db::map_err)?;
                }
                tracing::debug!("customers schema ready");
                Ok(())
            }
        }

        #[async_trait::async_trait]
        impl BaseRepository<Customer, CustomerId, $db> for $name {
            async fn create(
                &self,
                h: &mut Handle<'_, $db>,
                entity: Customer,
            ) -> northwind::Result<Customer> {
                sqlx::query_as(INSERT)
                    .bind(entity.customer_id)
                    .bind(entity.company_name)
                    .bind(entity.contact_name)
                    .bind(entity.contact_title)
                    .bind(entity.address)
                    .bind(entity.city)
                    .bind(entity.region)
                    .bind(entity.postal_code)
                    .bind(entity.country)
                    .bind(entity.phone)
                    .bind(entity.fax)
                    .fetch_one(h.as_executor())
                    .await
                    .map_err(northwind::db::map_err)
            }

            async fn find_by_id(
                &self,
                h: &mut Handle<'_, $db>,
                id: &CustomerId,
            ) -> northwind::Result<Option<Customer>> {
                sqlx::query_as(SELECT_BY_ID)
                    .bind(id.as_str())
                    .fetch_optional(h.as_executor())
                    .await
                    .map_err(northwind::db::map_err)
            }

            async fn find_all(
                &self,
                h: &mut Handle<'_, $db>,
            ) -> northwind::Result<Vec<Customer>> {
                sqlx::query_as(SELECT_ALL)
                    .fetch_all(h.as_executor())
                    .await
                    .map_err(northwind::db::map_err)
            }

            async fn update(
                &self,
                h: &mut Handle<'_, $db>,
                entity: Customer,
            ) -> northwind::Result<Customer> {
                let id = entity.customer_id.clone();
                sqlx::query_as(UPDATE)
                    .bind(entity.customer_id)
                    .bind(entity.company_name)
                    .bind(entity.contact_name)
                    .bind(entity.contact_title)
                    .bind(entity.address)
                    .bind(entity.city)
                    .bind(entity.region)
                    .bind(entity.postal_code)
                    .bind(entity.country)
                    .bind(entity.phone)
                    .bind(entity.fax)
                    .fetch_optional(h.as_executor())
                    .await
                    .map_err(northwind::db::map_err)?
                    .ok_or_else(|| {
                        northwind::Error::NotFound(format!(
                            "customer {id} not found"
                        ))
                    })
            }

            async fn delete(
                &self,
                h: &mut Handle<'_, $db>,
                id: &CustomerId,
            ) -> northwind::Result<bool> {
                let result = sqlx::query(DELETE_BY_ID)
                    .bind(id.as_str())
                    .execute(h.as_executor())
                    .await
                    .map_err(northwind::db::map_err)?;
                Ok(result.rows_affected() > 0)
            }

            async fn exists_by_id(
                &self,
                h: &mut Handle<'_, $db>,
                id: &CustomerId,
            ) -> northwind::Result<bool> {
                let found: Option<String> = sqlx::query_scalar(EXISTS_BY_ID)
                    .bind(id.as_str())
                    .fetch_optional(h.as_executor())
                    .await
                    .map_err(northwind::db::map_err)?;
                Ok(found.is_some())
            }
        }

        impl CustomerRepository<$db> for $name {}
    };
}

customer_repository!(PostgresCustomerRepository, sqlx::Postgres);
customer_repository!(SqliteCustomerRepository, sqlx::Sqlite);
