use crate::model::{Contact, ContactId, ContactPayload, PageRequest};

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Failures surfaced by contact storage backends.
///
/// `NotFound` and `DuplicateEmail` are the only variants callers are
/// expected to branch on; everything else is an opaque backend failure.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("contact not found")]
    NotFound,
    #[error("email already exists")]
    DuplicateEmail,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait::async_trait]
pub trait ContactStore: Send + Sync {
    /// All contacts in store order
    async fn list_contacts(&self) -> StoreResult<Vec<Contact>>;
    /// One page of contacts ordered by id, plus the total row count
    async fn list_contacts_page(&self, page: PageRequest) -> StoreResult<(Vec<Contact>, i64)>;
    async fn get_contact(&self, id: ContactId) -> StoreResult<Contact>;
    async fn email_exists(&self, email: &str) -> StoreResult<bool>;
    /// Insert a contact and return its id. A duplicate email is reported as
    /// `DuplicateEmail` even if `email_exists` said otherwise a moment ago.
    async fn create_contact(&self, contact: &ContactPayload) -> StoreResult<ContactId>;
    async fn update_contact(&self, id: ContactId, contact: &ContactPayload) -> StoreResult<()>;
    async fn delete_contact(&self, id: ContactId) -> StoreResult<()>;
}
