//! In-memory repository used by service and router tests.

use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::errors::CustomerError;
use crate::models::customer::{Customer, NewCustomer, SortColumn};
use crate::repositories::customer::CustomerRepository;

#[derive(Default)]
pub struct InMemoryCustomerRepository {
    customers: Mutex<Vec<Customer>>,
    next_id: Mutex<i64>,
    writes: AtomicUsize,
    conflict_on_update: AtomicBool,
    read_delay: Option<Duration>,
}

impl InMemoryCustomerRepository {
    /// Repository whose list reads take at least `delay`.
    pub fn slow(delay: Duration) -> Self {
        Self {
            read_delay: Some(delay),
            ..Self::default()
        }
    }

    /// Number of create and update calls that reached the repository.
    pub fn writes(&self) -> usize {
        self.writes.load(AtomicOrdering::SeqCst)
    }

    /// Makes the next update behave as if the row changed between read and write.
    pub fn conflict_on_next_update(&self) {
        self.conflict_on_update.store(true, AtomicOrdering::SeqCst);
    }

    fn sorted_by<F>(&self, compare: F) -> Vec<Customer>
    where
        F: Fn(&Customer, &Customer) -> Ordering,
    {
        let mut customers = self.customers.lock().unwrap().clone();
        customers.sort_by(|a, b| compare(a, b).then(a.id.cmp(&b.id)));
        customers
    }
}

fn compare_column(column: SortColumn, a: &Customer, b: &Customer) -> Ordering {
    match column {
        SortColumn::FirstName => a.first_name.cmp(&b.first_name),
        SortColumn::LastName => a.last_name.cmp(&b.last_name),
        SortColumn::BirthDate => a.birth_date.cmp(&b.birth_date),
        SortColumn::Gender => a.gender.as_str().cmp(b.gender.as_str()),
        SortColumn::Email => a.email.cmp(&b.email),
        SortColumn::Address => a.address.cmp(&b.address),
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn get_all(&self) -> Result<Vec<Customer>, CustomerError> {
        if let Some(delay) = self.read_delay {
            tokio::time::sleep(delay).await;
        }

        Ok(self.sorted_by(|a, b| a.first_name.cmp(&b.first_name)))
    }

    async fn create(&self, customer: &NewCustomer) -> Result<Customer, CustomerError> {
        self.writes.fetch_add(1, AtomicOrdering::SeqCst);

        let mut customers = self.customers.lock().unwrap();
        if customers.iter().any(|c| c.email == customer.email) {
            return Err(CustomerError::EmailTaken);
        }

        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;

        let created = Customer {
            id: *next_id,
            first_name: customer.first_name.clone(),
            last_name: customer.last_name.clone(),
            birth_date: customer.birth_date,
            gender: customer.gender,
            email: customer.email.clone(),
            address: customer.address.clone().unwrap_or_default(),
        };
        customers.push(created.clone());

        Ok(created)
    }

    async fn update(&self, id: i64, customer: &NewCustomer) -> Result<Customer, CustomerError> {
        self.writes.fetch_add(1, AtomicOrdering::SeqCst);

        let mut customers = self.customers.lock().unwrap();
        if !customers.iter().any(|c| c.id == id) {
            return Err(CustomerError::NotFound(id));
        }

        if self.conflict_on_update.swap(false, AtomicOrdering::SeqCst) {
            return Err(CustomerError::EditConflict);
        }

        if customers
            .iter()
            .any(|c| c.id != id && c.email == customer.email)
        {
            return Err(CustomerError::EmailTaken);
        }

        let stored = customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(CustomerError::EditConflict)?;
        stored.first_name = customer.first_name.clone();
        stored.last_name = customer.last_name.clone();
        stored.birth_date = customer.birth_date;
        stored.gender = customer.gender;
        stored.email = customer.email.clone();
        if let Some(address) = &customer.address {
            stored.address = address.clone();
        }

        Ok(stored.clone())
    }

    async fn get_by_id(&self, id: i64) -> Result<Customer, CustomerError> {
        self.customers
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(CustomerError::NotFound(id))
    }

    async fn search(&self, query: &str) -> Result<Vec<Customer>, CustomerError> {
        let query = query.to_lowercase();

        Ok(self
            .sorted_by(|a, b| a.first_name.cmp(&b.first_name))
            .into_iter()
            .filter(|c| {
                c.first_name.to_lowercase().contains(&query)
                    || c.last_name.to_lowercase().contains(&query)
            })
            .collect())
    }

    async fn sort(
        &self,
        column: SortColumn,
        descending: bool,
    ) -> Result<Vec<Customer>, CustomerError> {
        let mut customers = self.sorted_by(|a, b| compare_column(column, a, b));
        if descending {
            customers.reverse();
        }

        Ok(customers)
    }
}
