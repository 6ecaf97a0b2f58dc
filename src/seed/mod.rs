//! Offline data seeding for development databases.
//!
//! Writes go straight to PostgreSQL in batches with `ON CONFLICT DO NOTHING`,
//! so re-running a seed is safe and a failing batch is skipped, not fatal.

pub mod data;

pub use data::*;

use anyhow::{Context, Result};
use rand::Rng;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::model::{ContactGroup, ContactId, ContactPayload, GroupId, DEFAULT_GROUPS};

/// Rows per INSERT statement
pub const BATCH_SIZE: usize = 500;

/// Insert `total` generated contacts, returning how many were written
pub async fn seed_contacts<R: Rng + ?Sized>(
    pool: &PgPool,
    total: usize,
    rng: &mut R,
) -> Result<u64> {
    let contacts = generate_contacts(total, rng);
    let mut inserted = 0;

    for (batch, chunk) in contacts.chunks(BATCH_SIZE).enumerate() {
        match insert_contacts(pool, chunk).await {
            Ok(rows) => inserted += rows,
            Err(err) => log::warn!("skip contact batch {}: {}", batch + 1, err),
        }
    }

    log::info!("{} contacts seeded", inserted);
    Ok(inserted)
}

async fn insert_contacts(pool: &PgPool, contacts: &[ContactPayload]) -> sqlx::Result<u64> {
    let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new("INSERT INTO contacts (name, email, phone) ");
    builder.push_values(contacts, |mut row, contact| {
        row.push_bind(contact.name.clone())
            .push_bind(contact.email.clone())
            .push_bind(contact.phone.clone());
    });
    builder.push(" ON CONFLICT (email) DO NOTHING");

    let result = builder.build().execute(pool).await?;
    Ok(result.rows_affected())
}

/// Insert the fixed group names
pub async fn seed_groups(pool: &PgPool) -> Result<u64> {
    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("INSERT INTO groups (name) ");
    builder.push_values(DEFAULT_GROUPS, |mut row, name| {
        row.push_bind(*name);
    });
    builder.push(" ON CONFLICT DO NOTHING");

    let result = builder
        .build()
        .execute(pool)
        .await
        .context("Failed to seed groups")?;

    log::info!("{} groups seeded", result.rows_affected());
    Ok(result.rows_affected())
}

/// Link every contact to random groups
pub async fn seed_contact_groups<R: Rng + ?Sized>(pool: &PgPool, rng: &mut R) -> Result<u64> {
    let contact_ids: Vec<ContactId> = sqlx::query_scalar("SELECT id FROM contacts ORDER BY id")
        .fetch_all(pool)
        .await
        .context("Failed to fetch contacts")?;

    let group_ids: Vec<GroupId> = sqlx::query_scalar("SELECT id FROM groups ORDER BY id")
        .fetch_all(pool)
        .await
        .context("Failed to fetch groups")?;

    let links = assign_groups(&contact_ids, &group_ids, GROUPS_PER_CONTACT, rng);
    let mut inserted = 0;

    for (batch, chunk) in links.chunks(BATCH_SIZE).enumerate() {
        match insert_links(pool, chunk).await {
            Ok(rows) => inserted += rows,
            Err(err) => log::warn!("skip contact_groups batch {}: {}", batch + 1, err),
        }
    }

    log::info!("{} contact_groups seeded", inserted);
    Ok(inserted)
}

async fn insert_links(pool: &PgPool, links: &[ContactGroup]) -> sqlx::Result<u64> {
    let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new("INSERT INTO contact_groups (contact_id, group_id) ");
    builder.push_values(links, |mut row, link| {
        row.push_bind(link.contact_id).push_bind(link.group_id);
    });
    builder.push(" ON CONFLICT DO NOTHING");

    let result = builder.build().execute(pool).await?;
    Ok(result.rows_affected())
}
