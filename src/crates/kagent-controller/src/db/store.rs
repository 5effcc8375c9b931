//! Aggregate access to every repository plus the operations that span tables

use serde::Serialize;
use serde_json::{json, Value};

use crate::db::connection::{DatabaseConnection, DatabasePool};
use crate::db::error::DbResult;
use crate::db::models::{
    Feedback, Memory, Message, Run, Session, Team, Tool, ToolServer,
};
use crate::db::repository::{self, Clause, Order, Repository};

/// A run together with the messages it produced
#[derive(Debug, Clone, Serialize)]
pub struct RunWithMessages {
    #[serde(flatten)]
    pub run: Run,
    pub messages: Vec<Message>,
}

/// Handle to all persisted entities
#[derive(Clone)]
pub struct Store {
    pool: DatabasePool,
    pub teams: Repository<Team>,
    pub sessions: Repository<Session>,
    pub runs: Repository<Run>,
    pub messages: Repository<Message>,
    pub feedback: Repository<Feedback>,
    pub tools: Repository<Tool>,
    pub tool_servers: Repository<ToolServer>,
    pub memories: Repository<Memory>,
}

impl Store {
    pub fn new(db: &DatabaseConnection) -> Self {
        let pool = db.pool().clone();
        Self {
            teams: Repository::new(pool.clone()),
            sessions: Repository::new(pool.clone()),
            runs: Repository::new(pool.clone()),
            messages: Repository::new(pool.clone()),
            feedback: Repository::new(pool.clone()),
            tools: Repository::new(pool.clone()),
            tool_servers: Repository::new(pool.clone()),
            memories: Repository::new(pool.clone()),
            pool,
        }
    }

    /// Runs of a session in chronological order, each with its messages
    ///
    /// A failed message lookup is logged and yields an empty list for that
    /// run rather than failing the whole listing.
    pub async fn session_runs(&self, session: &Session) -> DbResult<Vec<RunWithMessages>> {
        let runs = self
            .runs
            .list_ordered(
                Order::OldestFirst,
                &[Clause::new("session_id", session.id), Clause::user(&session.user_id)],
            )
            .await?;

        let mut out = Vec::with_capacity(runs.len());
        for run in runs {
            let messages = match self
                .messages
                .list_ordered(Order::OldestFirst, &[Clause::new("run_id", run.id)])
                .await
            {
                Ok(messages) => messages,
                Err(e) => {
                    tracing::warn!(run_id = run.id, error = %e, "failed to load run messages");
                    Vec::new()
                }
            };
            out.push(RunWithMessages { run, messages });
        }
        Ok(out)
    }

    /// Persist the messages a run produced, in order
    pub async fn record_run_messages(&self, run: &Run, messages: &[Value]) -> DbResult<usize> {
        let mut tx = self.pool.begin().await?;
        for message in messages {
            let meta = json!({
                "source": message.get("source").cloned().unwrap_or(Value::Null),
                "type": message.get("type").cloned().unwrap_or(Value::Null),
            });
            let row = Message::new(&run.user_id, message.clone())
                .for_run(run.session_id, run.id)
                .with_meta(meta);
            repository::insert(&mut *tx, &row).await?;
        }
        tx.commit().await?;
        Ok(messages.len())
    }

    /// Delete a tool server and every tool it hosts in one transaction
    ///
    /// Returns the number of tools removed.
    pub async fn delete_tool_server(&self, server: &ToolServer) -> DbResult<u64> {
        let mut tx = self.pool.begin().await?;

        let tools = repository::delete_matching::<Tool, _>(
            &mut *tx,
            &[Clause::new("server_id", server.id), Clause::user(&server.user_id)],
        )
        .await?;
        repository::delete_where::<ToolServer, _>(
            &mut *tx,
            &[Clause::id(server.id), Clause::user(&server.user_id)],
        )
        .await?;

        tx.commit().await?;
        Ok(tools)
    }

    /// Reconcile a server's tools with what it currently reports
    ///
    /// Tools are matched by name: known ones get the new component, new ones
    /// are inserted, and ones no longer reported are deleted. The server's
    /// `last_connected` is refreshed. Returns the resulting tool set.
    pub async fn refresh_tools_for_server(
        &self,
        server: &ToolServer,
        discovered: Vec<(String, Value)>,
    ) -> DbResult<Vec<Tool>> {
        let filter = [Clause::new("server_id", server.id), Clause::user(&server.user_id)];
        let mut tx = self.pool.begin().await?;

        let existing: Vec<Tool> =
            repository::fetch_all(&mut *tx, Order::OldestFirst, &filter).await?;

        for (name, component) in &discovered {
            match existing.iter().find(|t| &t.name == name) {
                Some(tool) => {
                    let mut tool = tool.clone();
                    tool.component = sqlx::types::Json(component.clone());
                    repository::update_row(&mut *tx, &tool).await?;
                }
                None => {
                    let tool = Tool::new(&server.user_id, name, component.clone()).on_server(server.id);
                    repository::insert(&mut *tx, &tool).await?;
                }
            }
        }

        for stale in existing
            .iter()
            .filter(|t| !discovered.iter().any(|(name, _)| name == &t.name))
        {
            tracing::debug!(tool = %stale.name, server = %server.name, "removing tool no longer reported");
            repository::delete_where::<Tool, _>(&mut *tx, &[Clause::id(stale.id)]).await?;
        }

        let mut server = server.clone();
        server.touch_connected();
        repository::update_row(&mut *tx, &server).await?;

        tx.commit().await?;

        self.tools.list_ordered(Order::OldestFirst, &filter).await
    }
}
