use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use chrono::Utc;
use parking_lot::Mutex;

use crate::model::{Contact, ContactId, ContactPayload, PageRequest};
use crate::store::traits::{ContactStore, StoreError, StoreResult};

#[derive(Debug, Default)]
struct Rows {
    next_id: ContactId,
    contacts: BTreeMap<ContactId, Contact>,
}

/// Process-local contact store with the same observable semantics as the
/// PostgreSQL backend: ids ascend from 1, emails are unique, timestamps are
/// assigned by the store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    rows: Mutex<Rows>,
    unavailable: AtomicBool,
    writes: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail as if the backend were down
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of create/update/delete calls that reached the store
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.rows.lock().contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store disabled".to_string()));
        }
        Ok(())
    }

    fn record_write(&self) -> StoreResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check_available()
    }
}

fn email_taken(rows: &Rows, email: &str, except: Option<ContactId>) -> bool {
    rows.contacts
        .values()
        .any(|contact| contact.email == email && Some(contact.id) != except)
}

#[async_trait::async_trait]
impl ContactStore for InMemoryStore {
    async fn list_contacts(&self) -> StoreResult<Vec<Contact>> {
        self.check_available()?;
        Ok(self.rows.lock().contacts.values().cloned().collect())
    }

    async fn list_contacts_page(&self, page: PageRequest) -> StoreResult<(Vec<Contact>, i64)> {
        self.check_available()?;
        let rows = self.rows.lock();
        let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(page.limit).unwrap_or(usize::MAX);
        let contacts = rows.contacts.values().skip(skip).take(take).cloned().collect();
        let total = i64::try_from(rows.contacts.len()).unwrap_or(i64::MAX);
        Ok((contacts, total))
    }

    async fn get_contact(&self, id: ContactId) -> StoreResult<Contact> {
        self.check_available()?;
        self.rows
            .lock()
            .contacts
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn email_exists(&self, email: &str) -> StoreResult<bool> {
        self.check_available()?;
        Ok(email_taken(&self.rows.lock(), email, None))
    }

    async fn create_contact(&self, contact: &ContactPayload) -> StoreResult<ContactId> {
        self.record_write()?;
        let mut rows = self.rows.lock();
        if email_taken(&rows, &contact.email, None) {
            return Err(StoreError::DuplicateEmail);
        }

        rows.next_id += 1;
        let id = rows.next_id;
        let now = Utc::now();
        rows.contacts.insert(
            id,
            Contact {
                id,
                name: contact.name.clone(),
                email: contact.email.clone(),
                phone: contact.phone.clone(),
                created_at: now,
                updated_at: now,
            },
        );
        Ok(id)
    }

    async fn update_contact(&self, id: ContactId, contact: &ContactPayload) -> StoreResult<()> {
        self.record_write()?;
        let mut rows = self.rows.lock();
        if !rows.contacts.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        if email_taken(&rows, &contact.email, Some(id)) {
            return Err(StoreError::DuplicateEmail);
        }

        let existing = rows.contacts.get_mut(&id).ok_or(StoreError::NotFound)?;
        existing.name = contact.name.clone();
        existing.email = contact.email.clone();
        existing.phone = contact.phone.clone();
        existing.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_contact(&self, id: ContactId) -> StoreResult<()> {
        self.record_write()?;
        self.rows
            .lock()
            .contacts
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(n: usize) -> ContactPayload {
        ContactPayload::new(
            format!("Contact {n}"),
            format!("contact{n}@example.com"),
            "+14155550100",
        )
    }

    #[tokio::test]
    async fn test_create_assigns_ascending_ids() {
        let store = InMemoryStore::new();
        let first = store.create_contact(&payload(1)).await.unwrap();
        let second = store.create_contact(&payload(2)).await.unwrap();
        assert_eq!((first, second), (1, 2));

        let contact = store.get_contact(second).await.unwrap();
        assert_eq!(contact.email, "contact2@example.com");
        assert_eq!(contact.created_at, contact.updated_at);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected_at_insert() {
        let store = InMemoryStore::new();
        store.create_contact(&payload(1)).await.unwrap();

        let err = store.create_contact(&payload(1)).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_page_past_the_end_is_empty() {
        let store = InMemoryStore::new();
        for n in 0..25 {
            store.create_contact(&payload(n)).await.unwrap();
        }

        let (first, total) = store.list_contacts_page(PageRequest::new(1, 10)).await.unwrap();
        assert_eq!(first.len(), 10);
        assert_eq!(total, 25);
        assert_eq!(first[0].id, 1);

        let (last, _) = store.list_contacts_page(PageRequest::new(3, 10)).await.unwrap();
        assert_eq!(last.len(), 5);

        let (beyond, total) = store.list_contacts_page(PageRequest::new(9, 10)).await.unwrap();
        assert!(beyond.is_empty());
        assert_eq!(total, 25);
    }

    #[tokio::test]
    async fn test_update_missing_contact_changes_nothing() {
        let store = InMemoryStore::new();
        let id = store.create_contact(&payload(1)).await.unwrap();

        let err = store.update_contact(id + 1, &payload(2)).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
        assert_eq!(store.get_contact(id).await.unwrap().name, "Contact 1");
    }

    #[tokio::test]
    async fn test_update_may_keep_its_own_email() {
        let store = InMemoryStore::new();
        let id = store.create_contact(&payload(1)).await.unwrap();
        store.create_contact(&payload(2)).await.unwrap();

        let mut renamed = payload(1);
        renamed.name = "Renamed".to_string();
        store.update_contact(id, &renamed).await.unwrap();

        let err = store.update_contact(id, &payload(2)).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_delete_twice_reports_not_found() {
        let store = InMemoryStore::new();
        let id = store.create_contact(&payload(1)).await.unwrap();

        store.delete_contact(id).await.unwrap();
        assert!(matches!(
            store.delete_contact(id).await.unwrap_err(),
            StoreError::NotFound
        ));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_every_call() {
        let store = InMemoryStore::new();
        store.set_unavailable(true);

        assert!(matches!(
            store.list_contacts().await.unwrap_err(),
            StoreError::Unavailable(_)
        ));
        assert!(matches!(
            store.create_contact(&payload(1)).await.unwrap_err(),
            StoreError::Unavailable(_)
        ));
        assert_eq!(store.writes(), 1);
    }
}
