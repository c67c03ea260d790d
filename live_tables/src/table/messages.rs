//! Registry request types.

use super::{
    config::TableOptions,
    entities::{Table, TableId, UserId},
    errors::TableResult,
};
use serde::Serialize;
use std::{fmt, sync::Arc};
use tokio::sync::oneshot;

/// The two kinds of user/table relationship the registry indexes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    Playing,
    Spectating,
}

impl fmt::Display for Membership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Membership::Playing => write!(f, "playing"),
            Membership::Spectating => write!(f, "spectating"),
        }
    }
}

/// Messages processed by the registry worker
#[derive(Debug)]
pub enum RegistryMessage {
    /// Register a new table; `None` options fall back to the registry defaults
    CreateTable {
        name: String,
        options: Option<TableOptions>,
        response: oneshot::Sender<TableResult<TableId>>,
    },

    /// Evict a table and every membership entry referencing it
    RemoveTable {
        table_id: TableId,
        response: oneshot::Sender<TableResult<()>>,
    },

    LookupTable {
        table_id: TableId,
        response: oneshot::Sender<Option<Arc<Table>>>,
    },

    /// Add a table to a user's playing or spectating set
    Join {
        user_id: UserId,
        table_id: TableId,
        membership: Membership,
        response: oneshot::Sender<TableResult<()>>,
    },

    /// Remove a table from a user's playing or spectating set (no-op if absent)
    Leave {
        user_id: UserId,
        table_id: TableId,
        membership: Membership,
        response: oneshot::Sender<()>,
    },

    /// Tables a user belongs to, in join order
    GetUserTables {
        user_id: UserId,
        membership: Membership,
        response: oneshot::Sender<Vec<TableId>>,
    },

    ListTables {
        response: oneshot::Sender<Vec<TableSummary>>,
    },

    /// Stop admitting requests, drain the inbox and exit
    Shutdown,
}

/// Table listing entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSummary {
    pub id: TableId,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_display() {
        assert_eq!(Membership::Playing.to_string(), "playing");
        assert_eq!(Membership::Spectating.to_string(), "spectating");
    }

    #[test]
    fn test_table_summary_serialization() {
        let summary = TableSummary {
            id: 3,
            name: "Carol's Game".to_string(),
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["name"], "Carol's Game");
    }
}
