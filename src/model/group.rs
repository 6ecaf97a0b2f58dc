use serde::{Deserialize, Serialize};

use crate::model::ContactId;

pub type GroupId = i64;

/// A named grouping of contacts. Only the seeder writes these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContactGroup {
    pub contact_id: ContactId,
    pub group_id: GroupId,
}

impl ContactGroup {
    pub fn new(contact_id: ContactId, group_id: GroupId) -> Self {
        Self {
            contact_id,
            group_id,
        }
    }
}

pub const DEFAULT_GROUPS: &[&str] = &[
    "Family",
    "Friends",
    "Work",
    "Colleagues",
    "School",
    "University",
    "Clients",
    "Business",
    "Emergency",
    "Neighbors",
    "Gym",
    "Sports",
    "Hobbies",
    "Travel",
    "Medical",
    "Services",
    "Favorites",
    "Blocked",
];
