use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::errors::CustomerError;
use crate::models::customer::{Customer, NewCustomer, SortColumn};

/// Persistence of customer records.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Every customer, ordered by first name.
    async fn get_all(&self) -> Result<Vec<Customer>, CustomerError>;

    async fn create(&self, customer: &NewCustomer) -> Result<Customer, CustomerError>;

    /// Writes the present fields onto the row with `id`.
    ///
    /// Fails with `NotFound` when no such row exists and with `EditConflict`
    /// when the row was there when read but the write touched nothing.
    async fn update(&self, id: i64, customer: &NewCustomer) -> Result<Customer, CustomerError>;

    async fn get_by_id(&self, id: i64) -> Result<Customer, CustomerError>;

    /// Case-insensitive substring match on first or last name.
    async fn search(&self, query: &str) -> Result<Vec<Customer>, CustomerError>;

    async fn sort(
        &self,
        column: SortColumn,
        descending: bool,
    ) -> Result<Vec<Customer>, CustomerError>;
}

const CUSTOMER_COLUMNS: &str = "id, first_name, last_name, birth_date, gender, email, address";

const SCHEMA: [&str; 2] = [
    r#"
    CREATE TABLE IF NOT EXISTS customers (
        id BIGSERIAL PRIMARY KEY,
        first_name VARCHAR(100) NOT NULL,
        last_name VARCHAR(100) NOT NULL,
        birth_date DATE NOT NULL,
        gender VARCHAR(6) NOT NULL,
        email VARCHAR(100) NOT NULL,
        address VARCHAR(200) NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS customers_email_key ON customers (email)
    "#,
];

#[derive(sqlx::FromRow, Debug)]
struct CustomerRow {
    id: i64,
    first_name: String,
    last_name: String,
    birth_date: NaiveDate,
    gender: String,
    email: String,
    address: String,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = CustomerError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        let gender = row
            .gender
            .parse()
            .map_err(|err: String| CustomerError::Database(sqlx::Error::Decode(err.into())))?;

        Ok(Customer {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            birth_date: row.birth_date,
            gender,
            email: row.email,
            address: row.address,
        })
    }
}

fn into_customers(rows: Vec<CustomerRow>) -> Result<Vec<Customer>, CustomerError> {
    rows.into_iter().map(Customer::try_from).collect()
}

/// `ILIKE` pattern matching `query` literally anywhere in the value.
fn contains_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");

    format!("%{}%", escaped)
}

pub struct PgCustomerRepository {
    db: PgPool,
}

impl PgCustomerRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Creates the `customers` table and its unique email index when absent.
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.db).await?;
        }

        tracing::debug!("customers schema is in place");

        Ok(())
    }
}

#[async_trait]
impl CustomerRepository for PgCustomerRepository {
    async fn get_all(&self) -> Result<Vec<Customer>, CustomerError> {
        let rows = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {} FROM customers ORDER BY first_name ASC, id ASC",
            CUSTOMER_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        into_customers(rows)
    }

    async fn create(&self, customer: &NewCustomer) -> Result<Customer, CustomerError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            r#"
            INSERT INTO customers (first_name, last_name, birth_date, gender, email, address)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            CUSTOMER_COLUMNS
        ))
        .bind(&customer.first_name)
        .bind(&customer.last_name)
        .bind(customer.birth_date)
        .bind(customer.gender.as_str())
        .bind(&customer.email)
        .bind(customer.address.clone().unwrap_or_default())
        .fetch_one(&self.db)
        .await?;

        row.try_into()
    }

    async fn update(&self, id: i64, customer: &NewCustomer) -> Result<Customer, CustomerError> {
        let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM customers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        if existing.is_none() {
            return Err(CustomerError::NotFound(id));
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE customers SET ");
        {
            let mut fields = builder.separated(", ");
            fields
                .push("first_name = ")
                .push_bind_unseparated(customer.first_name.clone());
            fields
                .push("last_name = ")
                .push_bind_unseparated(customer.last_name.clone());
            fields
                .push("birth_date = ")
                .push_bind_unseparated(customer.birth_date);
            fields
                .push("gender = ")
                .push_bind_unseparated(customer.gender.as_str());
            fields
                .push("email = ")
                .push_bind_unseparated(customer.email.clone());
            if let Some(address) = &customer.address {
                fields
                    .push("address = ")
                    .push_bind_unseparated(address.clone());
            }
        }

        builder
            .push(" WHERE id = ")
            .push_bind(id)
            .push(format!(" RETURNING {}", CUSTOMER_COLUMNS));

        let row = builder
            .build_query_as::<CustomerRow>()
            .fetch_optional(&self.db)
            .await?;

        // The existence check above passed, so an empty `RETURNING` means the
        // row was deleted by another connection before this UPDATE ran.
        match row {
            Some(row) => row.try_into(),
            None => Err(CustomerError::EditConflict),
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Customer, CustomerError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {} FROM customers WHERE id = $1",
            CUSTOMER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        match row {
            Some(row) => row.try_into(),
            None => Err(CustomerError::NotFound(id)),
        }
    }

    async fn search(&self, query: &str) -> Result<Vec<Customer>, CustomerError> {
        let rows = sqlx::query_as::<_, CustomerRow>(&format!(
            r#"
            SELECT {}
            FROM customers
            WHERE first_name ILIKE $1 OR last_name ILIKE $1
            ORDER BY first_name ASC, id ASC
            "#,
            CUSTOMER_COLUMNS
        ))
        .bind(contains_pattern(query))
        .fetch_all(&self.db)
        .await?;

        into_customers(rows)
    }

    async fn sort(
        &self,
        column: SortColumn,
        descending: bool,
    ) -> Result<Vec<Customer>, CustomerError> {
        let direction = if descending { "DESC" } else { "ASC" };

        let rows = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {} FROM customers ORDER BY {} {}, id {}",
            CUSTOMER_COLUMNS,
            column.column_name(),
            direction,
            direction
        ))
        .fetch_all(&self.db)
        .await?;

        into_customers(rows)
    }
}
