// Licensed under the Apache-2.0 license

//! Transaction Table
//!
//! Bounded set of outstanding transactions keyed by a one byte id. Ids run
//! round-robin through 1..=255 and skip any id still outstanding, so a late
//! reply can never be matched to a newer request that reused its id.

use asphodel_protocol::{AsphodelError, AsphodelResult, FIRST_TRANSACTION_ID};
use std::collections::BTreeMap;
use std::time::Instant;

pub const MAX_TRANSACTION_ID: u8 = u8::MAX;

/// One outstanding request
#[derive(Debug)]
pub struct Transaction<T> {
    pub command: u8,
    pub deadline: Instant,
    pub data: T,
}

#[derive(Debug)]
pub struct TransactionTable<T> {
    capacity: usize,
    next_id: u8,
    entries: BTreeMap<u8, Transaction<T>>,
}

impl<T> TransactionTable<T> {
    /// `capacity` is clamped to 1..=255
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.clamp(1, MAX_TRANSACTION_ID as usize),
            next_id: FIRST_TRANSACTION_ID,
            entries: BTreeMap::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    pub fn contains(&self, id: u8) -> bool {
        self.entries.contains_key(&id)
    }

    /// Reserve an id for `transaction`
    pub fn allocate(&mut self, transaction: Transaction<T>) -> AsphodelResult<u8> {
        if self.is_full() {
            return Err(AsphodelError::FullTransactionTable);
        }

        // not full, so fewer than 255 ids are taken and a free one exists
        loop {
            let id = self.next_id;
            self.next_id = if id == MAX_TRANSACTION_ID {
                FIRST_TRANSACTION_ID
            } else {
                id + 1
            };
            if !self.entries.contains_key(&id) {
                self.entries.insert(id, transaction);
                return Ok(id);
            }
        }
    }

    pub fn take(&mut self, id: u8) -> Option<Transaction<T>> {
        self.entries.remove(&id)
    }

    /// Remove every transaction whose deadline is at or before `now`
    pub fn take_expired(&mut self, now: Instant) -> Vec<(u8, Transaction<T>)> {
        let expired: Vec<u8> = self
            .entries
            .iter()
            .filter(|(_, transaction)| transaction.deadline <= now)
            .map(|(id, _)| *id)
            .collect();

        expired
            .into_iter()
            .filter_map(|id| self.entries.remove(&id).map(|t| (id, t)))
            .collect()
    }

    /// Remove everything, in id order
    pub fn drain(&mut self) -> Vec<(u8, Transaction<T>)> {
        std::mem::take(&mut self.entries).into_iter().collect()
    }
}
