use rand::seq::SliceRandom;
use rand::Rng;

use crate::model::{ContactGroup, ContactId, ContactPayload, GroupId};

const FIRST_NAMES: &[&str] = &[
    "Ada", "Alan", "Barbara", "Bram", "Claude", "Dennis", "Edsger", "Frances", "Grace", "Hedy",
    "Ivan", "Joan", "Ken", "Linus", "Margaret", "Niklaus", "Radia", "Sophie", "Tim", "Whitfield",
];

const LAST_NAMES: &[&str] = &[
    "Allen", "Berners", "Hamilton", "Hopper", "Kernighan", "Knuth", "Lamarr", "Liskov",
    "Lovelace", "Perlman", "Ritchie", "Shannon", "Sutherland", "Thompson", "Torvalds", "Turing",
    "Wilson", "Wirth",
];

/// Groups assigned to every seeded contact
pub const GROUPS_PER_CONTACT: usize = 3;

/// Generate `total` contacts that pass request validation
pub fn generate_contacts<R: Rng + ?Sized>(total: usize, rng: &mut R) -> Vec<ContactPayload> {
    (0..total)
        .map(|n| {
            let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Ada");
            let last = LAST_NAMES.choose(rng).copied().unwrap_or("Lovelace");
            let tag: u32 = rng.gen();

            ContactPayload {
                name: format!("{first} {last}"),
                email: format!(
                    "{}.{}.{n}{tag:08x}@example.com",
                    first.to_lowercase(),
                    last.to_lowercase()
                ),
                phone: format!(
                    "+1{}{:09}",
                    rng.gen_range(2..=9u8),
                    rng.gen_range(0..1_000_000_000u32)
                ),
            }
        })
        .collect()
}

/// Pick `per_contact` distinct groups for every contact.
///
/// With fewer groups than `per_contact` each contact gets all of them.
pub fn assign_groups<R: Rng + ?Sized>(
    contact_ids: &[ContactId],
    group_ids: &[GroupId],
    per_contact: usize,
    rng: &mut R,
) -> Vec<ContactGroup> {
    let mut groups = group_ids.to_vec();
    let mut links = Vec::with_capacity(contact_ids.len() * per_contact.min(groups.len()));

    for &contact_id in contact_ids {
        groups.shuffle(rng);
        links.extend(
            groups
                .iter()
                .take(per_contact)
                .map(|&group_id| ContactGroup::new(contact_id, group_id)),
        );
    }

    links
}
