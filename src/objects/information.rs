/*!
 * Object Information Tables
 *
 * One fixed-capacity pool of control blocks per object class.
 *
 * # Design: Arena + Index
 *
 * Control blocks live in a slot array sized once at configuration time.
 * Identifiers carry the slot index instead of an address, so lookup is a
 * decode plus one bounds-checked array access, and a stale identifier can be
 * rejected by checking the slot state. Free indices are kept in a FIFO so a
 * just-freed index is the last to be handed out again.
 *
 * The table itself is guarded by a mutex, but callers are expected to hold a
 * critical-section scope across allocate → construct → open (see
 * [`ObjectTable::allocate_with`]) so no other context ever sees a slot that is
 * allocated but not yet resolvable.
 */

use super::id::{ObjectClass, ObjectId};
use super::name::ObjectName;
use crate::core::errors::{Result, SyncError};
use crate::core::types::{Node, ObjectIndex};
use parking_lot::{Mutex, MutexGuard};
use std::collections::VecDeque;
use tracing::debug;

#[derive(Debug)]
enum Slot<T> {
    Inactive,
    Allocated,
    Open { name: ObjectName, object: T },
}

/// Pool contents of one class; reach it through [`ObjectInformation::lock`]
#[derive(Debug)]
pub struct ObjectTable<T> {
    class: ObjectClass,
    node: Node,
    slots: Vec<Slot<T>>,
    inactive: VecDeque<ObjectIndex>,
}

impl<T> ObjectTable<T> {
    fn new(class: ObjectClass, node: Node, maximum: ObjectIndex) -> Self {
        Self {
            class,
            node,
            slots: (0..maximum).map(|_| Slot::Inactive).collect(),
            inactive: (1..=maximum).collect(),
        }
    }

    #[inline]
    pub fn class(&self) -> ObjectClass {
        self.class
    }

    /// Configured capacity
    #[inline]
    pub fn maximum(&self) -> ObjectIndex {
        self.slots.len() as ObjectIndex
    }

    /// Slots currently allocated or open
    pub fn active_count(&self) -> usize {
        self.slots.len() - self.inactive.len()
    }

    /// Identifier that names `index` in this table
    #[inline]
    pub fn id_of(&self, index: ObjectIndex) -> ObjectId {
        ObjectId::new(self.class, self.node, index)
    }

    /// Take the next free index
    pub fn allocate(&mut self) -> Result<ObjectIndex> {
        let index = self.inactive.pop_front().ok_or(SyncError::ResourceExhausted)?;
        self.slots[Self::position(index)] = Slot::Allocated;
        Ok(index)
    }

    /// Publish a constructed control block at an allocated index
    ///
    /// # Panics
    ///
    /// If `index` was not returned by `allocate`, or was already opened.
    pub fn open(&mut self, index: ObjectIndex, name: ObjectName, object: T) -> ObjectId {
        let slot = &mut self.slots[Self::position(index)];
        assert!(
            matches!(slot, Slot::Allocated),
            "{} index {index} opened without allocation",
            self.class
        );
        *slot = Slot::Open { name, object };
        self.id_of(index)
    }

    /// Allocate, construct and open in one step
    pub fn allocate_with<F>(&mut self, name: ObjectName, construct: F) -> Result<ObjectId>
    where
        F: FnOnce(ObjectId) -> T,
    {
        let index = self.allocate()?;
        let id = self.id_of(index);
        let object = construct(id);
        self.open(index, name, object);
        debug!(class = %self.class, %id, %name, "object opened");
        Ok(id)
    }

    /// Return an index to the free list, handing back its control block if it was open
    pub fn free(&mut self, index: ObjectIndex) -> Option<T> {
        if index == 0 || index > self.maximum() {
            return None;
        }
        let slot = std::mem::replace(&mut self.slots[Self::position(index)], Slot::Inactive);
        match slot {
            Slot::Inactive => None,
            Slot::Allocated => {
                self.inactive.push_back(index);
                None
            }
            Slot::Open { object, .. } => {
                self.inactive.push_back(index);
                debug!(class = %self.class, id = %self.id_of(index), "object freed");
                Some(object)
            }
        }
    }

    /// Close and free the object named by `id`
    pub fn close(&mut self, id: ObjectId) -> Result<T> {
        self.lookup(id)?;
        self.free(id.index()).ok_or(SyncError::InvalidId)
    }

    fn resolve(&self, id: ObjectId) -> Option<usize> {
        let index = id.index();
        let valid = id.api() == self.class.api() as u8
            && id.class() == self.class.number()
            && id.node() == self.node
            && index >= 1
            && index <= self.maximum();
        valid.then(|| Self::position(index))
    }

    /// Control block named by `id`, if it is open
    pub fn lookup(&self, id: ObjectId) -> Result<&T> {
        match self.resolve(id).map(|at| &self.slots[at]) {
            Some(Slot::Open { object, .. }) => Ok(object),
            _ => Err(SyncError::InvalidId),
        }
    }

    pub fn lookup_mut(&mut self, id: ObjectId) -> Result<&mut T> {
        match self.resolve(id).map(|at| &mut self.slots[at]) {
            Some(Slot::Open { object, .. }) => Ok(object),
            _ => Err(SyncError::InvalidId),
        }
    }

    /// First open object (in index order) carrying `name`
    pub fn ident(&self, name: ObjectName) -> Result<ObjectId> {
        if !name.is_valid() {
            return Err(SyncError::InvalidName);
        }
        self.slots
            .iter()
            .position(|slot| matches!(slot, Slot::Open { name: n, .. } if *n == name))
            .map(|at| self.id_of(at as ObjectIndex + 1))
            .ok_or(SyncError::InvalidName)
    }

    #[inline]
    fn position(index: ObjectIndex) -> usize {
        index as usize - 1
    }
}

/// Process-lifetime pool for one object class
#[derive(Debug)]
pub struct ObjectInformation<T> {
    class: ObjectClass,
    table: Mutex<ObjectTable<T>>,
}

impl<T> ObjectInformation<T> {
    pub fn new(class: ObjectClass, node: Node, maximum: ObjectIndex) -> Self {
        Self {
            class,
            table: Mutex::new(ObjectTable::new(class, node, maximum)),
        }
    }

    #[inline]
    pub fn class(&self) -> ObjectClass {
        self.class
    }

    /// Access the table; callers hold a critical-section scope first
    #[inline]
    pub fn lock(&self) -> MutexGuard<'_, ObjectTable<T>> {
        self.table.lock()
    }
}
