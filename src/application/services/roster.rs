//! Roster service
//!
//! Owns the in-memory member table and persists the full table after every
//! successful mutation.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::ApplicationResult;
use crate::domain::{next_member_id, MemberFields, MemberRecord, JOIN_DATE_FORMAT};
use crate::infrastructure::store::RecordStore;
use crate::infrastructure::traits::Clock;

/// Service for adding, editing, deleting and listing members.
pub struct RosterService {
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
    table: Vec<MemberRecord>,
}

impl RosterService {
    /// Create the service and load the current table from `store`.
    pub fn new(store: Arc<dyn RecordStore>, clock: Arc<dyn Clock>) -> ApplicationResult<Self> {
        let table = store.load()?;
        debug!(
            "roster loaded: {} members from {}",
            table.len(),
            store.location()
        );
        Ok(Self {
            store,
            clock,
            table,
        })
    }

    /// Re-read the table from storage, discarding the in-memory copy.
    pub fn reload(&mut self) -> ApplicationResult<()> {
        self.table = self.store.load()?;
        Ok(())
    }

    /// The full table, in storage order.
    pub fn list(&self) -> &[MemberRecord] {
        &self.table
    }

    pub fn get(&self, id: u64) -> Option<&MemberRecord> {
        self.table.iter().find(|m| m.id == id)
    }

    /// Append a new member.
    ///
    /// Assigns the next ID and stamps today's date as the join date. Field
    /// contents are not validated here.
    #[instrument(skip_all)]
    pub fn add(&mut self, fields: MemberFields) -> ApplicationResult<MemberRecord> {
        let id = next_member_id(&self.table)?;
        let join_date = self.clock.today().format(JOIN_DATE_FORMAT).to_string();
        let member = MemberRecord::new(id, fields, join_date);

        self.table.push(member.clone());
        if let Err(e) = self.store.save(&self.table) {
            self.table.pop();
            return Err(e);
        }
        info!("added member {} ({})", member.id, member.name);
        Ok(member)
    }

    /// Overwrite the mutable fields of member `id`.
    ///
    /// Returns `false` without touching the table when `id` is absent.
    #[instrument(skip(self, fields))]
    pub fn edit(&mut self, id: u64, fields: MemberFields) -> ApplicationResult<bool> {
        let Some(idx) = self.position(id) else {
            debug!("edit: member {} not found", id);
            return Ok(false);
        };

        let previous = self.table[idx].clone();
        self.table[idx].apply(fields);
        if let Err(e) = self.store.save(&self.table) {
            self.table[idx] = previous;
            return Err(e);
        }
        info!("edited member {}", id);
        Ok(true)
    }

    /// Remove member `id`.
    ///
    /// Returns `false` without touching the table when `id` is absent.
    #[instrument(skip(self))]
    pub fn delete(&mut self, id: u64) -> ApplicationResult<bool> {
        let Some(idx) = self.position(id) else {
            debug!("delete: member {} not found", id);
            return Ok(false);
        };

        let removed = self.table.remove(idx);
        if let Err(e) = self.store.save(&self.table) {
            self.table.insert(idx, removed);
            return Err(e);
        }
        info!("deleted member {} ({})", id, removed.name);
        Ok(true)
    }

    fn position(&self, id: u64) -> Option<usize> {
        self.table.iter().position(|m| m.id == id)
    }
}
