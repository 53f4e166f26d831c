use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{field, info, instrument, Span};

use crate::errors::CustomerError;
use crate::models::customer::{Customer, SortColumn};
use crate::models::requests::customer::RequestCustomer;
use crate::repositories::customer::CustomerRepository;

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Validates writes and hands every call to the repository.
pub struct CustomerService {
    repository: Arc<dyn CustomerRepository>,
    today: fn() -> NaiveDate,
}

impl CustomerService {
    pub fn new(repository: Arc<dyn CustomerRepository>) -> Self {
        Self {
            repository,
            today: local_today,
        }
    }

    /// Replaces the date ages are computed against.
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    #[instrument(skip(self))]
    pub async fn get_all(&self) -> Result<Vec<Customer>, CustomerError> {
        self.repository.get_all().await
    }

    #[instrument(skip(self, request), fields(customer_id = field::Empty))]
    pub async fn create(&self, request: RequestCustomer) -> Result<Customer, CustomerError> {
        let customer = request
            .validate((self.today)())
            .map_err(CustomerError::Validation)?;

        let created = self.repository.create(&customer).await?;
        Span::current().record("customer_id", created.id);
        info!("customer created");

        Ok(created)
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: i64,
        request: RequestCustomer,
    ) -> Result<Customer, CustomerError> {
        let customer = request
            .validate((self.today)())
            .map_err(CustomerError::Validation)?;

        let updated = self.repository.update(id, &customer).await?;
        info!(customer_id = id, "customer updated");

        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i64) -> Result<Customer, CustomerError> {
        self.repository.get_by_id(id).await
    }

    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<Customer>, CustomerError> {
        self.repository.search(query).await
    }

    /// Sorts by a column given by its record name, e.g. `BirthDate`.
    #[instrument(skip(self))]
    pub async fn sort(
        &self,
        column: &str,
        descending: bool,
    ) -> Result<Vec<Customer>, CustomerError> {
        let column = column.parse::<SortColumn>()?;

        self.repository.sort(column, descending).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::repositories::memory::InMemoryCustomerRepository;

    fn fixed_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn service() -> (Arc<InMemoryCustomerRepository>, CustomerService) {
        let repository = Arc::new(InMemoryCustomerRepository::default());
        let service = CustomerService::new(repository.clone()).with_today(fixed_today);

        (repository, service)
    }

    fn request(first_name: &str, last_name: &str, email: &str) -> RequestCustomer {
        serde_json::from_value(json!({
            "FirstName": first_name,
            "LastName": last_name,
            "BirthDate": "1990-03-20",
            "Gender": "Female",
            "Email": email,
            "Address": "Elm street 5"
        }))
        .unwrap()
    }

    fn validation_message(err: CustomerError) -> String {
        match err {
            CustomerError::Validation(err) => err.message.unwrap().to_string(),
            other => panic!("expected a validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn create_rejects_blank_names_without_touching_storage() {
        let (repository, service) = service();

        let err = service.create(request("  ", "Doe", "a@b.co")).await.unwrap_err();
        assert_eq!(validation_message(err), "first name is required");

        let err = service.create(request("Jane", "\t", "a@b.co")).await.unwrap_err();
        assert_eq!(validation_message(err), "last name is required");

        assert_eq!(repository.writes(), 0);
    }

    #[tokio::test]
    async fn create_rejects_overlong_email_without_touching_storage() {
        let (repository, service) = service();
        let email = format!("{}@example.com", "a".repeat(120));

        let err = service.create(request("Jane", "Doe", &email)).await.unwrap_err();

        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
        assert_eq!(validation_message(err), "email length exceeds the limit");
        assert_eq!(repository.writes(), 0);
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn create_logs_the_customer_id_but_not_the_email() {
        let (_, service) = service();
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let created = service
            .create(request("Jane", "Doe", "private@doe.com"))
            .await
            .unwrap();

        let logs = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("customer created"));
        assert!(logs.contains(&format!("customer_id={}", created.id)));
        assert!(!logs.contains("private@doe.com"));
    }

    #[tokio::test]
    async fn update_rejects_invalid_input_without_touching_storage() {
        let (repository, service) = service();
        let created = service.create(request("Jane", "Doe", "jane@doe.com")).await.unwrap();

        let err = service
            .update(created.id, request("Jane", "Doe", "jane@doe"))
            .await
            .unwrap_err();

        assert_eq!(validation_message(err), "invalid email address");
        assert_eq!(repository.writes(), 1);
    }

    #[tokio::test]
    async fn birth_date_round_trips_unchanged() {
        let (_, service) = service();
        let mut request = request("John", "Doe", "john@doe.com");
        request.birth_date = NaiveDate::from_ymd_opt(2000, 5, 1).unwrap();

        let created = service.create(request).await.unwrap();
        let fetched = service.get_by_id(created.id).await.unwrap();

        assert_eq!(fetched.birth_date, NaiveDate::from_ymd_opt(2000, 5, 1).unwrap());
        assert_eq!(json!(fetched)["BirthDate"], "2000-05-01");
    }

    #[tokio::test]
    async fn search_matches_first_or_last_name_ignoring_case() {
        let (_, service) = service();
        service.create(request("John", "Doe", "john@doe.com")).await.unwrap();
        service.create(request("Johnny", "Smith", "johnny@smith.com")).await.unwrap();
        service.create(request("Mary", "Littlejohn", "mary@lj.com")).await.unwrap();
        service.create(request("Alice", "Brown", "alice@brown.com")).await.unwrap();

        let names: Vec<String> = service
            .search("john")
            .await
            .unwrap()
            .into_iter()
            .map(|c| format!("{} {}", c.first_name, c.last_name))
            .collect();

        assert_eq!(names, vec!["John Doe", "Johnny Smith", "Mary Littlejohn"]);
    }

    #[tokio::test]
    async fn sort_by_unknown_column_is_rejected() {
        let (_, service) = service();
        service.create(request("John", "Doe", "john@doe.com")).await.unwrap();

        let err = service.sort("Foo", false).await.unwrap_err();

        assert!(matches!(err, CustomerError::InvalidSortColumn(column) if column == "Foo"));
    }

    #[tokio::test]
    async fn sort_orders_both_directions() {
        let (_, service) = service();
        service.create(request("Bob", "Young", "bob@x.com")).await.unwrap();
        service.create(request("Al", "Zed", "al@x.com")).await.unwrap();
        service.create(request("Cy", "Adams", "cy@x.com")).await.unwrap();

        let ascending: Vec<String> = service
            .sort("LastName", false)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.last_name)
            .collect();
        let descending: Vec<String> = service
            .sort("Email", true)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.email)
            .collect();

        assert_eq!(ascending, vec!["Adams", "Young", "Zed"]);
        assert_eq!(descending, vec!["cy@x.com", "bob@x.com", "al@x.com"]);
    }

    #[tokio::test]
    async fn get_all_orders_by_first_name() {
        let (_, service) = service();
        service.create(request("Zoe", "A", "zoe@x.com")).await.unwrap();
        service.create(request("Adam", "B", "adam@x.com")).await.unwrap();

        let first_names: Vec<String> = service
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.first_name)
            .collect();

        assert_eq!(first_names, vec!["Adam", "Zoe"]);
    }

    #[tokio::test]
    async fn update_of_vanished_row_is_an_edit_conflict() {
        let (repository, service) = service();
        let created = service.create(request("Jane", "Doe", "jane@doe.com")).await.unwrap();
        repository.conflict_on_next_update();

        let err = service
            .update(created.id, request("Janet", "Doe", "jane@doe.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, CustomerError::EditConflict));
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_not_found() {
        let (_, service) = service();

        let err = service
            .update(42, request("Jane", "Doe", "jane@doe.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, CustomerError::NotFound(42)));
    }

    #[tokio::test]
    async fn update_keeps_address_when_absent() {
        let (_, service) = service();
        let created = service.create(request("Jane", "Doe", "jane@doe.com")).await.unwrap();
        let mut changes = request("Janet", "Doe", "janet@doe.com");
        changes.address = " ".to_string();

        let updated = service.update(created.id, changes).await.unwrap();

        assert_eq!(updated.first_name, "Janet");
        assert_eq!(updated.email, "janet@doe.com");
        assert_eq!(updated.address, "Elm street 5");
    }

    #[tokio::test]
    async fn duplicate_email_is_reported() {
        let (_, service) = service();
        service.create(request("Jane", "Doe", "jane@doe.com")).await.unwrap();

        let err = service
            .create(request("Other", "Person", "jane@doe.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, CustomerError::EmailTaken));
    }
}
