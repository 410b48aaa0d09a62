//! Embedded lead store
//!
//! Serves leads as a cursor-paginated, filterable collection and executes
//! bulk lead-to-contact conversion, using sled as the backend.
//!
//! Uses two sled trees:
//! - `leads`: lead id -> `Lead`
//! - `contacts`: lead id -> `Contact`
//!
//! Lead ids are zero-padded sequence numbers, so key order is creation
//! order and keyset pagination over the `leads` tree is stable while rows
//! are added or removed between fetches.

use crate::pagination::{CollectionPage, Cursor, PageSource};
use crate::selection::{PayloadMode, SelectionPayload};
use crate::view::{BulkMutation, BulkOutcome};
use chrono::Utc;
use sled::transaction::{ConflictableTransactionError, TransactionError};
use sled::{Db, Transactional, Tree};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

pub mod error;
pub mod import;
pub mod types;

pub use error::StoreError;
pub use import::ImportSummary;
pub use types::{Contact, Lead, LeadFilter, LeadMatcher, LeadStatus, NewLead};

type Result<T> = std::result::Result<T, StoreError>;

/// sled-backed lead and contact store
pub struct LeadStore {
    db: Db,
    leads: Tree,
    contacts: Tree,
}

impl LeadStore {
    /// Opens or creates a store at the specified path
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the database or its trees cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path)?;
        let leads = db.open_tree("leads")?;
        let contacts = db.open_tree("contacts")?;
        Ok(Self {
            db,
            leads,
            contacts,
        })
    }

    /// Insert a new lead and return it with its assigned id
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if id generation, encoding or the write fails.
    pub fn insert_lead(&self, new: NewLead) -> Result<Lead> {
        let seq = self.db.generate_id()?;
        let lead = Lead {
            id: format!("L{seq:012}"),
            name: new.name,
            email: new.email,
            company: new.company,
            run_id: new.run_id,
            status: types::LeadStatus::New,
            created_at: Utc::now(),
        };
        self.put_lead(&lead)?;
        Ok(lead)
    }

    /// Get a lead by id
    ///
    /// # Errors
    ///
    /// Returns `StoreError` on read or decode failure.
    pub fn get_lead(&self, id: &str) -> Result<Option<Lead>> {
        self.leads
            .get(id.as_bytes())?
            .map(|raw| decode(&raw))
            .transpose()
    }

    /// Update a lead's status
    ///
    /// Returns `false` if the lead does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` on read, decode or write failure.
    pub fn set_status(&self, id: &str, status: LeadStatus) -> Result<bool> {
        let Some(mut lead) = self.get_lead(id)? else {
            return Ok(false);
        };
        lead.status = status;
        self.put_lead(&lead)?;
        Ok(true)
    }

    /// Remove a lead
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the delete fails.
    pub fn remove_lead(&self, id: &str) -> Result<bool> {
        Ok(self.leads.remove(id.as_bytes())?.is_some())
    }

    /// Contact created from `lead_id`, if any
    ///
    /// # Errors
    ///
    /// Returns `StoreError` on read or decode failure.
    pub fn get_contact(&self, lead_id: &str) -> Result<Option<Contact>> {
        self.contacts
            .get(lead_id.as_bytes())?
            .map(|raw| decode(&raw))
            .transpose()
    }

    /// All contacts in lead-id order
    ///
    /// # Errors
    ///
    /// Returns `StoreError` on read or decode failure.
    pub fn list_contacts(&self) -> Result<Vec<Contact>> {
        self.contacts
            .iter()
            .map(|entry| {
                let (_, raw) = entry?;
                decode(&raw)
            })
            .collect()
    }

    /// Number of leads, regardless of filter
    #[must_use]
    pub fn lead_count(&self) -> usize {
        self.leads.len()
    }

    #[must_use]
    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    /// Bulk "convert to contacts" mutation over this store
    #[must_use]
    pub const fn convert_to_contacts(&self) -> ConvertToContacts<'_> {
        ConvertToContacts { store: self }
    }

    /// Remove all leads and contacts
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if either tree cannot be cleared.
    pub fn clear(&self) -> Result<()> {
        self.leads.clear()?;
        self.contacts.clear()?;
        Ok(())
    }

    /// Flush pending writes to disk
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the flush fails.
    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }

    fn put_lead(&self, lead: &Lead) -> Result<()> {
        self.leads.insert(lead.id.as_bytes(), encode(lead)?)?;
        Ok(())
    }

    /// Convert one lead, recording the result at `index`
    ///
    /// The contact and the lead's new status are written in one transaction,
    /// so a lead is `Converted` exactly when its contact exists.
    fn convert_lead(&self, index: usize, mut lead: Lead, outcome: &mut BulkOutcome) {
        if lead.status == LeadStatus::Converted {
            outcome.add_skipped();
            return;
        }
        lead.status = LeadStatus::Converted;

        match self.write_conversion(&lead) {
            Ok(()) => outcome.add_created(),
            Err(e) => outcome.add_error(index, format!("{}: {e}", lead.id)),
        }
    }

    fn write_conversion(&self, lead: &Lead) -> Result<()> {
        let contact = encode(&Contact::from_lead(lead))?;
        let record = encode(lead)?;
        let key = lead.id.as_bytes();

        (&self.contacts, &self.leads)
            .transaction(|(contacts, leads)| {
                contacts.insert(key, contact.as_slice())?;
                leads.insert(key, record.as_slice())?;
                Ok::<_, ConflictableTransactionError<StoreError>>(())
            })
            .map_err(|e| match e {
                TransactionError::Abort(e) => e,
                TransactionError::Storage(e) => StoreError::SledError(e),
            })
    }
}

impl PageSource for LeadStore {
    type Item = Lead;
    type Filter = LeadFilter;
    type Error = StoreError;

    fn fetch(
        &self,
        filter: &LeadFilter,
        cursor: Option<&Cursor>,
        page_size: usize,
    ) -> Result<CollectionPage<Lead>> {
        let matcher = filter.compile()?;
        let after = cursor.map(decode_cursor).transpose()?;

        let page_size = page_size.max(1);
        let mut items = Vec::with_capacity(page_size);
        let mut has_next_page = false;
        let mut total_count = 0;
        for entry in self.leads.iter() {
            let (key, raw) = entry?;
            let lead: Lead = decode(&raw)?;
            if !matcher.matches(&lead) {
                continue;
            }
            total_count += 1;
            if after.as_deref().is_some_and(|after| &*key <= after) {
                continue;
            }
            if items.len() < page_size {
                items.push(lead);
            } else {
                has_next_page = true;
            }
        }

        let next_cursor = if has_next_page {
            items.last().map(|lead: &Lead| encode_cursor(&lead.id))
        } else {
            None
        };
        debug!(
            items = items.len(),
            has_next_page,
            total_count,
            "served lead page"
        );

        Ok(CollectionPage {
            items,
            next_cursor,
            has_next_page,
            total_count,
        })
    }
}

/// Converts selected leads into contacts
///
/// `SELECTED` payloads name their leads; each id that is missing or no
/// longer matches the filter snapshot becomes a per-item error at its
/// position in `selected_ids`. `ALL_EXCEPT` payloads are resolved here,
/// against the filter snapshot at submission time, so records added since
/// the user pressed "select all" are included.
pub struct ConvertToContacts<'a> {
    store: &'a LeadStore,
}

impl BulkMutation<String, LeadFilter> for ConvertToContacts<'_> {
    type Error = StoreError;

    fn apply(
        &self,
        payload: &SelectionPayload<String>,
        filter: &LeadFilter,
    ) -> Result<BulkOutcome> {
        let matcher = filter.compile()?;
        let mut outcome = BulkOutcome::new();

        match payload.mode {
            PayloadMode::Selected => {
                for (index, id) in payload.selected_ids.iter().enumerate() {
                    match self.store.get_lead(id) {
                        Ok(Some(lead)) if matcher.matches(&lead) => {
                            self.store.convert_lead(index, lead, &mut outcome);
                        }
                        Ok(Some(_)) => {
                            outcome.add_error(index, format!("{id}: no longer matches the filter"));
                        }
                        Ok(None) => outcome.add_error(index, format!("{id}: lead not found")),
                        Err(e) => outcome.add_error(index, format!("{id}: {e}")),
                    }
                }
            }
            PayloadMode::AllExcept => {
                let excluded: HashSet<&str> =
                    payload.deselected_ids.iter().map(String::as_str).collect();
                let targets: Vec<Lead> = self
                    .store
                    .leads
                    .iter()
                    .map(|entry| {
                        let (_, raw) = entry?;
                        decode::<Lead>(&raw)
                    })
                    .filter(|lead| {
                        lead.as_ref().map_or(true, |lead| {
                            matcher.matches(lead) && !excluded.contains(lead.id.as_str())
                        })
                    })
                    .collect::<Result<_>>()?;

                debug!(
                    targets = targets.len(),
                    excluded = excluded.len(),
                    "resolved select-all payload"
                );
                for (index, lead) in targets.into_iter().enumerate() {
                    self.store.convert_lead(index, lead, &mut outcome);
                }
            }
        }

        self.store.flush()?;
        Ok(outcome)
    }
}

fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(bincode::serde::encode_to_vec(value, bincode::config::standard())?)
}

fn decode<T: serde::de::DeserializeOwned>(raw: &[u8]) -> Result<T> {
    let (value, _): (T, usize) =
        bincode::serde::decode_from_slice(raw, bincode::config::standard())?;
    Ok(value)
}

fn encode_cursor(id: &str) -> Cursor {
    Cursor::new(hex::encode(id))
}

fn decode_cursor(cursor: &Cursor) -> Result<Vec<u8>> {
    hex::decode(cursor.as_str()).map_err(|_| StoreError::InvalidCursor(cursor.to_string()))
}
