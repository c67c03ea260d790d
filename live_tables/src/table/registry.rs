//! Single-writer table registry.
//!
//! One worker task owns the table map and the membership indices and
//! processes requests strictly in arrival order. Every other task talks to
//! it through a cloneable [`RegistryHandle`].

use super::{
    config::{RegistryConfig, TableOptions, is_valid_table_name},
    entities::{Table, TableId, UserId},
    errors::{TableError, TableResult},
    messages::{Membership, RegistryMessage, TableSummary},
};
use std::{
    collections::{BTreeMap, HashMap},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};
use tokio::sync::{mpsc, oneshot, watch};

/// Handle for sending requests to the registry
#[derive(Clone, Debug)]
pub struct RegistryHandle {
    sender: mpsc::Sender<RegistryMessage>,
    closed: Arc<AtomicBool>,
    stopped: watch::Receiver<bool>,
}

impl RegistryHandle {
    /// Submit a request and wait for its response
    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> RegistryMessage,
    ) -> TableResult<T> {
        if self.is_closed() {
            return Err(TableError::RegistryClosed);
        }

        let (tx, rx) = oneshot::channel();
        self.sender
            .send(build(tx))
            .await
            .map_err(|_| TableError::RegistryClosed)?;

        rx.await.map_err(|_| TableError::RegistryClosed)
    }

    /// Create a table with the registry's default options
    pub async fn create_table(&self, name: impl Into<String>) -> TableResult<TableId> {
        let name = name.into();
        self.request(|response| RegistryMessage::CreateTable {
            name,
            options: None,
            response,
        })
        .await?
    }

    pub async fn create_table_with_options(
        &self,
        name: impl Into<String>,
        options: TableOptions,
    ) -> TableResult<TableId> {
        let name = name.into();
        self.request(|response| RegistryMessage::CreateTable {
            name,
            options: Some(options),
            response,
        })
        .await?
    }

    pub async fn remove_table(&self, table_id: TableId) -> TableResult<()> {
        self.request(|response| RegistryMessage::RemoveTable { table_id, response })
            .await?
    }

    /// Look up a table; `Ok(None)` if no table has this ID
    pub async fn lookup_table(&self, table_id: TableId) -> TableResult<Option<Arc<Table>>> {
        self.request(|response| RegistryMessage::LookupTable { table_id, response })
            .await
    }

    pub async fn join_playing(&self, user_id: UserId, table_id: TableId) -> TableResult<()> {
        self.join(user_id, table_id, Membership::Playing).await
    }

    pub async fn leave_playing(&self, user_id: UserId, table_id: TableId) -> TableResult<()> {
        self.leave(user_id, table_id, Membership::Playing).await
    }

    pub async fn join_spectating(&self, user_id: UserId, table_id: TableId) -> TableResult<()> {
        self.join(user_id, table_id, Membership::Spectating).await
    }

    pub async fn leave_spectating(&self, user_id: UserId, table_id: TableId) -> TableResult<()> {
        self.leave(user_id, table_id, Membership::Spectating).await
    }

    async fn join(
        &self,
        user_id: UserId,
        table_id: TableId,
        membership: Membership,
    ) -> TableResult<()> {
        self.request(|response| RegistryMessage::Join {
            user_id,
            table_id,
            membership,
            response,
        })
        .await?
    }

    async fn leave(
        &self,
        user_id: UserId,
        table_id: TableId,
        membership: Membership,
    ) -> TableResult<()> {
        self.request(|response| RegistryMessage::Leave {
            user_id,
            table_id,
            membership,
            response,
        })
        .await
    }

    /// Tables the user is playing at, in join order
    pub async fn tables_playing(&self, user_id: UserId) -> TableResult<Vec<TableId>> {
        self.user_tables(user_id, Membership::Playing).await
    }

    /// Tables the user is spectating, in join order
    pub async fn tables_spectating(&self, user_id: UserId) -> TableResult<Vec<TableId>> {
        self.user_tables(user_id, Membership::Spectating).await
    }

    async fn user_tables(
        &self,
        user_id: UserId,
        membership: Membership,
    ) -> TableResult<Vec<TableId>> {
        self.request(|response| RegistryMessage::GetUserTables {
            user_id,
            membership,
            response,
        })
        .await
    }

    /// All registered tables ordered by ID
    pub async fn list_tables(&self) -> TableResult<Vec<TableSummary>> {
        self.request(|response| RegistryMessage::ListTables { response })
            .await
    }

    pub async fn active_table_count(&self) -> TableResult<usize> {
        Ok(self.list_tables().await?.len())
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Close the registry and wait for the worker to finish
    ///
    /// Requests submitted after this call fail with
    /// [`TableError::RegistryClosed`]; requests already queued are still
    /// processed before this returns. Calling it again only waits.
    pub async fn shutdown(&self) {
        if !self.closed.swap(true, Ordering::AcqRel)
            && self.sender.send(RegistryMessage::Shutdown).await.is_err()
        {
            log::debug!("Table registry already stopped");
        }

        let mut stopped = self.stopped.clone();
        // An error means the worker is gone, which is what we wait for anyway
        let _ = stopped.wait_for(|done| *done).await;
    }
}

/// Registry worker owning all tables and membership indices
pub struct TableRegistry {
    config: RegistryConfig,

    /// Registered tables by ID
    tables: BTreeMap<TableId, Arc<Table>>,

    /// Last ID handed out; the first table gets 1
    table_id_counter: TableId,

    /// User ID -> table IDs the user plays at, in join order
    users_playing: HashMap<UserId, Vec<TableId>>,

    /// User ID -> table IDs the user spectates, in join order
    users_spectating: HashMap<UserId, Vec<TableId>>,

    inbox: mpsc::Receiver<RegistryMessage>,
    stopped: watch::Sender<bool>,
}

impl TableRegistry {
    /// Create a registry worker and a handle to it
    ///
    /// The worker does nothing until [`TableRegistry::run`] is awaited.
    pub fn new(config: RegistryConfig) -> (Self, RegistryHandle) {
        let (sender, inbox) = mpsc::channel(config.inbox_capacity.max(1));
        let (stopped_tx, stopped_rx) = watch::channel(false);

        let registry = Self {
            config,
            tables: BTreeMap::new(),
            table_id_counter: 0,
            users_playing: HashMap::new(),
            users_spectating: HashMap::new(),
            inbox,
            stopped: stopped_tx,
        };

        let handle = RegistryHandle {
            sender,
            closed: Arc::new(AtomicBool::new(false)),
            stopped: stopped_rx,
        };

        (registry, handle)
    }

    /// Create a registry and spawn its worker on the current runtime
    pub fn spawn(config: RegistryConfig) -> RegistryHandle {
        let (registry, handle) = Self::new(config);
        tokio::spawn(registry.run());
        handle
    }

    /// Run the registry event loop
    pub async fn run(mut self) {
        log::info!("Table registry starting");

        while let Some(message) = self.inbox.recv().await {
            match message {
                RegistryMessage::Shutdown => {
                    log::info!("Table registry shutting down, draining pending requests");
                    // Buffered messages are still delivered after close
                    self.inbox.close();
                }
                message => self.handle_message(message),
            }
        }

        log::info!(
            "Table registry stopped with {} table(s)",
            self.tables.len()
        );
        let _ = self.stopped.send(true);
    }

    fn handle_message(&mut self, message: RegistryMessage) {
        match message {
            RegistryMessage::CreateTable {
                name,
                options,
                response,
            } => {
                let result = self.create_table(name, options);
                let _ = response.send(result);
            }

            RegistryMessage::RemoveTable { table_id, response } => {
                let result = self.remove_table(table_id);
                let _ = response.send(result);
            }

            RegistryMessage::LookupTable { table_id, response } => {
                let _ = response.send(self.tables.get(&table_id).cloned());
            }

            RegistryMessage::Join {
                user_id,
                table_id,
                membership,
                response,
            } => {
                let result = self.join(user_id, table_id, membership);
                let _ = response.send(result);
            }

            RegistryMessage::Leave {
                user_id,
                table_id,
                membership,
                response,
            } => {
                self.leave(user_id, table_id, membership);
                let _ = response.send(());
            }

            RegistryMessage::GetUserTables {
                user_id,
                membership,
                response,
            } => {
                let tables = self
                    .index(membership)
                    .get(&user_id)
                    .cloned()
                    .unwrap_or_default();
                let _ = response.send(tables);
            }

            RegistryMessage::ListTables { response } => {
                let summaries = self
                    .tables
                    .values()
                    .map(|t| TableSummary {
                        id: t.id(),
                        name: t.name().to_string(),
                    })
                    .collect();
                let _ = response.send(summaries);
            }

            RegistryMessage::Shutdown => {}
        }
    }

    fn create_table(
        &mut self,
        name: String,
        options: Option<TableOptions>,
    ) -> TableResult<TableId> {
        if !is_valid_table_name(&name) {
            return Err(TableError::InvalidName(name));
        }

        let options = options.unwrap_or_else(|| self.config.default_options.clone());
        options.validate().map_err(TableError::InvalidOptions)?;

        self.table_id_counter += 1;
        let table_id = self.table_id_counter;
        log::info!("Created table {} '{}'", table_id, name);
        self.tables
            .insert(table_id, Arc::new(Table::new(table_id, name, options)));

        Ok(table_id)
    }

    fn remove_table(&mut self, table_id: TableId) -> TableResult<()> {
        let table = self
            .tables
            .remove(&table_id)
            .ok_or(TableError::NotFound(table_id))?;
        table.mark_removed();

        for index in [&mut self.users_playing, &mut self.users_spectating] {
            index.retain(|_, tables| {
                tables.retain(|id| *id != table_id);
                !tables.is_empty()
            });
        }

        log::info!("Removed table {} '{}'", table_id, table.name());

        Ok(())
    }

    fn join(
        &mut self,
        user_id: UserId,
        table_id: TableId,
        membership: Membership,
    ) -> TableResult<()> {
        if !self.tables.contains_key(&table_id) {
            return Err(TableError::NotFound(table_id));
        }

        let tables = self.index_mut(membership).entry(user_id).or_default();
        if !tables.contains(&table_id) {
            tables.push(table_id);
            log::debug!("User {} is now {} at table {}", user_id, membership, table_id);
        }

        Ok(())
    }

    fn leave(&mut self, user_id: UserId, table_id: TableId, membership: Membership) {
        let index = self.index_mut(membership);
        if let Some(tables) = index.get_mut(&user_id) {
            tables.retain(|id| *id != table_id);
            if tables.is_empty() {
                index.remove(&user_id);
            }
            log::debug!("User {} stopped {} at table {}", user_id, membership, table_id);
        }
    }

    fn index(&self, membership: Membership) -> &HashMap<UserId, Vec<TableId>> {
        match membership {
            Membership::Playing => &self.users_playing,
            Membership::Spectating => &self.users_spectating,
        }
    }

    fn index_mut(&mut self, membership: Membership) -> &mut HashMap<UserId, Vec<TableId>> {
        match membership {
            Membership::Playing => &mut self.users_playing,
            Membership::Spectating => &mut self.users_spectating,
        }
    }
}
