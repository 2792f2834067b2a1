//! Open-addressing alias table.
//!
//! Keys are flag spellings (or subcommand / sub-option names), values are
//! whatever handle the caller wants back. The table is sized up front as
//! `2^k - 1` slots (plus one) so that the hash can be masked instead of
//! reduced modulo a prime; insertion uses the robin-hood rule to keep probe
//! sequences short, and removal shifts the following entries back into the
//! gap instead of leaving a tombstone whenever it can prove that is safe.

use crate::error::{Error, Result};

pub const DEFAULT_LOAD_FACTOR: f64 = 0.7;

const HASH_SEED: usize = 7;
const HASH_MULTIPLIER: usize = 31;

/// Entries moved back by a single `remove` before the gap is given up as a tombstone.
const MAX_BACKWARD_SHIFT: usize = 16;

#[derive(Debug, Clone)]
enum Slot<K, V> {
    Empty,
    Tombstone,
    Occupied { key: K, value: V, probe: usize },
}

#[derive(Debug, Clone)]
pub struct AliasTable<K, V> {
    slots: Vec<Slot<K, V>>,
    mask: usize,
    len: usize,
    tombstones: usize,
    load_factor: f64,
}

/// `hash = (hash + byte) * 31`, seeded at 7. The empty string has no
/// location: it is reserved and never stored.
fn hash(key: &str) -> Option<usize> {
    if key.is_empty() {
        return None;
    }
    Some(key.bytes().fold(HASH_SEED, |h, b| {
        h.wrapping_add(b as usize).wrapping_mul(HASH_MULTIPLIER)
    }))
}

fn slot_limit<K, V>() -> usize {
    isize::MAX as usize / std::mem::size_of::<Slot<K, V>>().max(1)
}

/// Next `2^(k+1) - 1` mask, or `None` once the slot array could no longer be allocated.
fn grow(mask: usize, limit: usize) -> Option<usize> {
    mask.checked_mul(2)
        .and_then(|m| m.checked_add(1))
        .filter(|&m| m < limit)
}

fn empty_slots<K, V>(n: usize) -> Vec<Slot<K, V>> {
    std::iter::repeat_with(|| Slot::Empty).take(n).collect()
}

impl<K: AsRef<str>, V> AliasTable<K, V> {
    pub fn with_capacity(expected: usize) -> Result<Self> {
        Self::with_load_factor(expected, DEFAULT_LOAD_FACTOR)
    }

    /// Size the table so that `expected` entries stay under `load_factor`.
    /// A load factor outside `(0, 1]` falls back to the default.
    pub fn with_load_factor(expected: usize, load_factor: f64) -> Result<Self> {
        let load_factor = if load_factor > 0.0 && load_factor <= 1.0 {
            load_factor
        } else {
            DEFAULT_LOAD_FACTOR
        };
        let limit = slot_limit::<K, V>();
        let mut mask: usize = 1;
        while (mask as f64) * load_factor < expected as f64 {
            mask = grow(mask, limit).ok_or(Error::CapacityExceeded(expected))?;
        }
        Ok(AliasTable {
            slots: empty_slots(mask + 1),
            mask,
            len: 0,
            tombstones: 0,
            load_factor,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The `2^k - 1` capacity; the slot array holds one more than this.
    pub fn capacity(&self) -> usize {
        self.mask
    }

    fn find(&self, key: &str) -> Option<usize> {
        let mut idx = hash(key)? & self.mask;
        for _ in 0..self.slots.len() {
            match &self.slots[idx] {
                Slot::Empty => return None,
                Slot::Occupied { key: k, .. } if k.as_ref() == key => return Some(idx),
                _ => {}
            }
            idx = (idx + 1) & self.mask;
        }
        None
    }

    /// Membership test: 0 or 1.
    pub fn count(&self, key: &str) -> usize {
        usize::from(self.find(key).is_some())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        match &self.slots[self.find(key)?] {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let idx = self.find(key)?;
        match &mut self.slots[idx] {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Like `get`, but a missing key is an error.
    pub fn lookup(&self, key: &str) -> Result<&V> {
        self.get(key)
            .ok_or_else(|| Error::KeyNotFound(key.to_string()))
    }

    /// Insert or overwrite. Returns the previous value for an existing key.
    /// The empty key is silently ignored.
    ///
    /// Once the load factor would be exceeded the table is rehashed first,
    /// so inserting the number of entries it was sized for never resizes it.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>> {
        if hash(key.as_ref()).is_none() {
            return Ok(None);
        }
        if let Some(idx) = self.find(key.as_ref()) {
            if let Slot::Occupied { value: old, .. } = &mut self.slots[idx] {
                return Ok(Some(std::mem::replace(old, value)));
            }
        }
        if (self.len + self.tombstones + 1) as f64 > self.slots.len() as f64 * self.load_factor {
            self.rehash()?;
        }
        self.place(key, value);
        self.len += 1;
        Ok(None)
    }

    /// Robin-hood placement: whenever the resident entry sits closer to its
    /// home slot than the entry being placed, they trade places and probing
    /// continues with the displaced one. Stops at the first free slot.
    fn place(&mut self, key: K, value: V) {
        let Some(home) = hash(key.as_ref()) else {
            return;
        };
        let mut idx = home & self.mask;
        let mut incoming = (key, value, 0usize);
        loop {
            let slot = &mut self.slots[idx];
            match slot {
                Slot::Occupied { key, value, probe } => {
                    if *probe < incoming.2 {
                        std::mem::swap(key, &mut incoming.0);
                        std::mem::swap(value, &mut incoming.1);
                        std::mem::swap(probe, &mut incoming.2);
                    }
                }
                free => {
                    if matches!(free, Slot::Tombstone) {
                        self.tombstones -= 1;
                    }
                    let (key, value, probe) = incoming;
                    *free = Slot::Occupied { key, value, probe };
                    return;
                }
            }
            idx = (idx + 1) & self.mask;
            incoming.2 += 1;
        }
    }

    /// Remove `key`, returning its value. Absent keys are a no-op.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let mut gap = self.find(key)?;
        let removed = std::mem::replace(&mut self.slots[gap], Slot::Empty);
        self.len -= 1;

        let mut shifted = 0;
        loop {
            let next = (gap + 1) & self.mask;
            let displaced = matches!(self.slots[next], Slot::Occupied { probe, .. } if probe > 0);
            if displaced && shifted < MAX_BACKWARD_SHIFT {
                let mut entry = std::mem::replace(&mut self.slots[next], Slot::Empty);
                if let Slot::Occupied { probe, .. } = &mut entry {
                    *probe -= 1;
                }
                self.slots[gap] = entry;
                gap = next;
                shifted += 1;
                continue;
            }
            // Only a following empty slot proves no probe chain runs through the gap.
            if !matches!(self.slots[next], Slot::Empty) {
                self.slots[gap] = Slot::Tombstone;
                self.tombstones += 1;
            }
            break;
        }

        match removed {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Double the capacity and reinsert every live entry; tombstones are dropped.
    pub fn rehash(&mut self) -> Result<()> {
        let mask = grow(self.mask, slot_limit::<K, V>()).ok_or(Error::CapacityExceeded(self.len))?;
        log::trace!("rehashing alias table: capacity {} -> {}", self.mask, mask);
        let old = std::mem::replace(&mut self.slots, empty_slots(mask + 1));
        self.mask = mask;
        self.tombstones = 0;
        for slot in old {
            if let Slot::Occupied { key, value, .. } = slot {
                self.place(key, value);
            }
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = Slot::Empty;
        }
        self.len = 0;
        self.tombstones = 0;
    }

    /// Live entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Occupied { key, value, .. } => Some((key, value)),
            _ => None,
        })
    }
}
