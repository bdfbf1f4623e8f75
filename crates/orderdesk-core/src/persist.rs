//! JSON persistence for the roster and the order list.
//!
//! Layout:
//!   .orderdesk/team.json    : flat object, member id → role
//!   .orderdesk/orders.json  : array of order records, sorted by id
//!
//! Every save is a full overwrite through [`io::write_json`]. Loading never
//! fails: a missing, unreadable, or malformed file yields an empty collection
//! and the reason is reported as a [`LoadOutcome`].

use crate::error::Result;
use crate::io;
use crate::types::{Order, Roster};
use serde::de::DeserializeOwned;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    Missing,
    Unavailable(String),
    Corrupt(String),
}

#[derive(Debug)]
pub struct Loaded<T> {
    pub value: T,
    pub outcome: LoadOutcome,
}

fn load_json<T: DeserializeOwned + Default>(path: &Path, what: &str) -> Loaded<T> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Loaded {
                value: T::default(),
                outcome: LoadOutcome::Missing,
            };
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "{what} file unreadable, starting empty");
            return Loaded {
                value: T::default(),
                outcome: LoadOutcome::Unavailable(e.to_string()),
            };
        }
    };
    if content.trim().is_empty() {
        return Loaded {
            value: T::default(),
            outcome: LoadOutcome::Loaded,
        };
    }
    match serde_json::from_str(&content) {
        Ok(value) => Loaded {
            value,
            outcome: LoadOutcome::Loaded,
        },
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "{what} file is malformed, starting empty");
            Loaded {
                value: T::default(),
                outcome: LoadOutcome::Corrupt(e.to_string()),
            }
        }
    }
}

pub fn load_roster(path: &Path) -> Loaded<Roster> {
    load_json(path, "team")
}

pub fn save_roster(path: &Path, roster: &Roster) -> Result<()> {
    io::write_json(path, roster)
}

pub fn load_orders(path: &Path) -> Loaded<Vec<Order>> {
    load_json(path, "orders")
}

pub fn save_orders<'a>(path: &Path, orders: impl IntoIterator<Item = &'a Order>) -> Result<()> {
    let orders: Vec<&Order> = orders.into_iter().collect();
    io::write_json(path, &orders)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
