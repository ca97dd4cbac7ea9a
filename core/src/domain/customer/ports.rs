use crate::domain::{common::entities::app_errors::CoreError, customer::entities::Customer};

#[cfg_attr(test, mockall::automock)]
pub trait CustomerRepository: Send + Sync {
    fn find_by_token(
        &self,
        token: String,
    ) -> impl Future<Output = Result<Option<Customer>, CoreError>> + Send;
}
