//! The record store: team roster plus work orders.
//!
//! Both collections live behind one `Mutex`. Each operation takes the lock
//! once, mutates, and persists the touched collection before releasing it.
//! Nothing spans operations, so two callers issuing conflicting commands
//! still race at the command level; last writer wins.

use crate::directory::{self, Directory};
use crate::error::{DeskError, Result};
use crate::persist::{self, LoadOutcome};
use crate::paths;
use crate::types::{MemberId, Order, Roster, STATUS_COMPLETED};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

// ---------------------------------------------------------------------------
// Read views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignee {
    pub id: MemberId,
    /// `None` when the platform no longer knows this id.
    pub display_name: Option<String>,
    /// `None` when the id is not on the roster.
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub assignee: Option<Assignee>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkGroup {
    pub member_id: MemberId,
    pub member: String,
    pub resolved: bool,
    pub orders: Vec<Order>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberPage {
    pub member_id: MemberId,
    pub role: Option<String>,
    pub orders: Vec<Order>,
}

// ---------------------------------------------------------------------------
// RecordStore
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct State {
    roster: Roster,
    orders: BTreeMap<String, Order>,
}

#[derive(Debug)]
pub struct RecordStore {
    state: Mutex<State>,
    roster_path: PathBuf,
    /// `None` keeps orders in memory only.
    orders_path: Option<PathBuf>,
}

impl RecordStore {
    /// Open the store under `root/.orderdesk/`.
    pub fn open(root: &Path, persist_orders: bool) -> Self {
        let orders_path = persist_orders.then(|| paths::orders_path(root));
        Self::open_at(paths::team_path(root), orders_path)
    }

    /// Open the store at explicit file locations, loading whatever is there.
    pub fn open_at(roster_path: PathBuf, orders_path: Option<PathBuf>) -> Self {
        let roster = persist::load_roster(&roster_path);
        if roster.outcome != LoadOutcome::Loaded {
            tracing::debug!(outcome = ?roster.outcome, "roster starts empty");
        }
        let orders = match &orders_path {
            Some(path) => persist::load_orders(path).value,
            None => Vec::new(),
        };
        let orders = orders.into_iter().map(|o| (o.id.clone(), o)).collect();
        Self {
            state: Mutex::new(State {
                roster: roster.value,
                orders,
            }),
            roster_path,
            orders_path,
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A panic while holding the lock leaves plain data behind; keep serving it.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn save_roster(&self, state: &State) -> Result<()> {
        persist::save_roster(&self.roster_path, &state.roster)
    }

    fn save_orders(&self, state: &State) -> Result<()> {
        match &self.orders_path {
            Some(path) => persist::save_orders(path, state.orders.values()),
            None => Ok(()),
        }
    }

    // -- roster -------------------------------------------------------------

    /// Register or re-register a member. Returns the role it replaced, if any.
    pub fn register(&self, member: MemberId, role: impl Into<String>) -> Result<Option<String>> {
        let mut state = self.lock();
        let previous = state.roster.insert(member, role.into());
        if let Err(e) = self.save_roster(&state) {
            match &previous {
                Some(role) => state.roster.insert(member, role.clone()),
                None => state.roster.remove(&member),
            };
            return Err(e);
        }
        Ok(previous)
    }

    /// Remove a member from the roster. Returns the role it held.
    pub fn unregister(&self, member: MemberId) -> Result<String> {
        let mut state = self.lock();
        let role = state
            .roster
            .remove(&member)
            .ok_or(DeskError::MemberNotFound(member))?;
        if let Err(e) = self.save_roster(&state) {
            state.roster.insert(member, role);
            return Err(e);
        }
        Ok(role)
    }

    pub fn list_team(&self) -> Roster {
        self.lock().roster.clone()
    }

    pub fn role_of(&self, member: MemberId) -> Option<String> {
        self.lock().roster.get(&member).cloned()
    }

    // -- orders -------------------------------------------------------------

    pub fn create_order(
        &self,
        id: &str,
        kind: Option<String>,
        description: Option<String>,
        deadline: Option<String>,
    ) -> Result<Order> {
        let mut state = self.lock();
        if state.orders.contains_key(id) {
            return Err(DeskError::OrderExists(id.to_string()));
        }
        let order = Order::new(id, kind, description, deadline);
        state.orders.insert(id.to_string(), order.clone());
        if let Err(e) = self.save_orders(&state) {
            state.orders.remove(id);
            return Err(e);
        }
        Ok(order)
    }

    /// Apply `f` to one order and persist. A failed save restores the order
    /// as it was before `f` ran.
    fn update<T>(&self, id: &str, f: impl FnOnce(&mut Order) -> T) -> Result<T> {
        let mut state = self.lock();
        let order = state
            .orders
            .get_mut(id)
            .ok_or_else(|| DeskError::OrderNotFound(id.to_string()))?;
        let before = order.clone();
        let out = f(order);
        if let Err(e) = self.save_orders(&state) {
            state.orders.insert(id.to_string(), before);
            return Err(e);
        }
        Ok(out)
    }

    /// Overwrite the status. Returns the previous status.
    pub fn set_status(&self, id: &str, status: impl Into<String>) -> Result<String> {
        let status = status.into();
        self.update(id, |o| std::mem::replace(&mut o.status, status))
    }

    /// Assign an order. The member is not checked against the roster.
    pub fn assign(&self, id: &str, member: MemberId) -> Result<Option<MemberId>> {
        self.update(id, |o| o.assigned_to.replace(member))
    }

    /// Mark an order completed. Finishing a completed order is a no-op success.
    pub fn finish(&self, id: &str) -> Result<String> {
        self.set_status(id, STATUS_COMPLETED)
    }

    /// Append a note. Each call appends, so retries duplicate notes.
    pub fn add_note(&self, id: &str, note: impl Into<String>) -> Result<usize> {
        let note = note.into();
        self.update(id, |o| {
            o.notes.push(note);
            o.notes.len()
        })
    }

    pub fn get_order(&self, id: &str, directory: &dyn Directory) -> Result<OrderView> {
        let state = self.lock();
        let order = state
            .orders
            .get(id)
            .ok_or_else(|| DeskError::OrderNotFound(id.to_string()))?
            .clone();
        let assignee = order.assigned_to.map(|member| Assignee {
            id: member,
            display_name: directory.display_name(member),
            role: state.roster.get(&member).cloned(),
        });
        Ok(OrderView { order, assignee })
    }

    pub fn list_orders(&self) -> Vec<Order> {
        self.lock().orders.values().cloned().collect()
    }

    /// Open orders grouped by assignee, sorted by display label.
    ///
    /// Unassigned orders are left out. Assignees that no longer resolve are
    /// kept under an "Unknown member (<id>)" group with `resolved: false`.
    pub fn list_working(&self, directory: &dyn Directory) -> Vec<WorkGroup> {
        let state = self.lock();
        let mut by_member: BTreeMap<MemberId, Vec<Order>> = BTreeMap::new();
        for order in state.orders.values().filter(|o| !o.is_completed()) {
            if let Some(member) = order.assigned_to {
                by_member.entry(member).or_default().push(order.clone());
            }
        }
        let mut groups: Vec<WorkGroup> = by_member
            .into_iter()
            .map(|(member_id, orders)| {
                let name = directory.display_name(member_id);
                WorkGroup {
                    member_id,
                    resolved: name.is_some(),
                    member: name.unwrap_or_else(|| directory::label(directory, member_id)),
                    orders,
                }
            })
            .collect();
        groups.sort_by(|a, b| {
            b.resolved
                .cmp(&a.resolved)
                .then_with(|| a.member.cmp(&b.member))
        });
        groups
    }

    /// A member's own page: role plus every order assigned to them.
    pub fn orders_for(&self, member: MemberId) -> MemberPage {
        let state = self.lock();
        MemberPage {
            member_id: member,
            role: state.roster.get(&member).cloned(),
            orders: state
                .orders
                .values()
                .filter(|o| o.assigned_to == Some(member))
                .cloned()
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
