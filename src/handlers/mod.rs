use std::sync::Arc;

use crate::services::customer::CustomerService;

pub mod customer;

#[derive(Clone)]
pub struct AppState {
    pub customers: Arc<CustomerService>,
}

impl AppState {
    pub fn new(customers: Arc<CustomerService>) -> Self {
        Self { customers }
    }
}
