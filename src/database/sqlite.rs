use crate::core::{
    filter::{Condition, Query},
    models::{
        common::Pagination,
        option::{Insert as OptionInsert, QuestionOption},
        question::{Insert as QuestionInsert, Question, Update as QuestionUpdate},
    },
    ports::repository::{Common, Manager, QuestionCommon, QuestionOptionCommon, Store, TxStore},
};
use crate::database::models::{option::Opt, question::Question as QuestionRow};
use crate::error::Error;
use crate::validation::ValidationErrors;
use futures::future::LocalBoxFuture;
use itertools::Itertools;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqlitePool, SqlitePoolOptions};
use sqlx::{query, query_as, query_scalar, Connection, Executor, QueryBuilder, Sqlite, Transaction};

/// Where a store sends its statements.
pub trait Handle {
    fn connection(&mut self) -> &mut SqliteConnection;

    /// Opens a transaction scope on this handle. A plain connection starts a new transaction;
    /// a handle that is already inside one joins it.
    async fn scope(&mut self) -> Result<Scope<'_>, Error>;
}

/// A transaction scope. Only a `New` scope commits or rolls back; a `Joined` scope leaves
/// that to the scope that opened the transaction, so nesting never commits twice.
pub enum Scope<'s> {
    New(Transaction<'s, Sqlite>),
    Joined(&'s mut SqliteConnection),
}

impl<'s> Scope<'s> {
    async fn commit(self) -> Result<(), Error> {
        if let Scope::New(tx) = self {
            tx.commit().await?;
        }
        Ok(())
    }

    async fn rollback(self) -> Result<(), Error> {
        if let Scope::New(tx) = self {
            tx.rollback().await?;
        }
        Ok(())
    }
}

impl Handle for PoolConnection<Sqlite> {
    fn connection(&mut self) -> &mut SqliteConnection {
        &mut **self
    }

    async fn scope(&mut self) -> Result<Scope<'_>, Error> {
        let tx = Connection::begin(&mut **self).await?;
        Ok(Scope::New(tx))
    }
}

impl<'s> Handle for Scope<'s> {
    fn connection(&mut self) -> &mut SqliteConnection {
        match self {
            Scope::New(tx) => &mut **tx,
            Scope::Joined(conn) => &mut **conn,
        }
    }

    async fn scope(&mut self) -> Result<Scope<'_>, Error> {
        Ok(Scope::Joined(self.connection()))
    }
}

pub struct SqliteStore<H> {
    handle: H,
}

impl<H> SqliteStore<H>
where
    H: Handle,
{
    pub fn new(handle: H) -> Self {
        Self { handle }
    }

    /// Runs `f` against a transaction-scoped store, committing when it returns `Ok` and rolling
    /// back when it returns `Err`. Called on a store that is already transactional, `f` joins
    /// the running transaction.
    pub async fn run_in_transaction<F, R>(&mut self, f: F) -> Result<R, Error>
    where
        F: for<'t> FnOnce(&'t mut SqliteStore<Scope<'_>>) -> LocalBoxFuture<'t, Result<R, Error>>,
    {
        let mut tx = SqliteStore::new(self.handle.scope().await?);
        match f(&mut tx).await {
            Ok(res) => {
                tx.commit().await?;
                Ok(res)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    log::error!("failed to roll back transaction: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

impl<H> QuestionCommon for SqliteStore<H>
where
    H: Handle,
{
    async fn query(&mut self, query: &Query, pagination: Pagination) -> Result<Vec<Question>, Error> {
        let mut stmt = QueryBuilder::<Sqlite>::new("SELECT id, body, author_id FROM questions WHERE 1 = 1");
        for condition in query.conditions() {
            match condition {
                Condition::AuthorIdEq(author_id) => {
                    stmt.push(" AND author_id = ").push_bind(*author_id);
                }
            }
        }
        if let Some(last_id) = pagination.last_id() {
            stmt.push(" AND id > ").push_bind(last_id);
        }
        stmt.push(" ORDER BY id LIMIT ").push_bind(pagination.size() as i64);
        let rows: Vec<QuestionRow> = stmt.build_query_as().fetch_all(self.handle.connection()).await?;

        let ids: Vec<i64> = rows.iter().map(|q| q.id).collect();
        let mut options = QuestionOptionCommon::query_by_questions(self, &ids)
            .await?
            .into_iter()
            .into_group_map_by(|o| o.question_id);
        let questions = rows
            .into_iter()
            .map(|row| {
                let mut question: Question = row.into();
                question.options = options.remove(&question.id).unwrap_or_default();
                question
            })
            .collect();
        Ok(questions)
    }

    async fn insert(&mut self, question: QuestionInsert) -> Result<i64, Error> {
        let mut errors = ValidationErrors::default();
        if question.body.is_empty() {
            errors.add("body", "required");
        }
        if question.author_id == 0 {
            errors.add("authorId", "required");
        }
        if !errors.is_empty() {
            return Err(errors.into());
        }
        let id = query_scalar("INSERT INTO questions (body, author_id) VALUES (?, ?) RETURNING id")
            .bind(question.body)
            .bind(question.author_id)
            .fetch_one(self.handle.connection())
            .await?;
        Ok(id)
    }

    async fn get(&mut self, id: i64) -> Result<Question, Error> {
        let row: Option<QuestionRow> = query_as("SELECT id, body, author_id FROM questions WHERE id = ?")
            .bind(id)
            .fetch_optional(self.handle.connection())
            .await?;
        row.map(Into::into).ok_or(Error::NotFound)
    }

    async fn update(&mut self, id: i64, question: QuestionUpdate) -> Result<(), Error> {
        if question.body.is_empty() {
            let mut errors = ValidationErrors::default();
            errors.add("body", "required");
            return Err(errors.into());
        }
        let res = query("UPDATE questions SET body = ? WHERE id = ?")
            .bind(question.body)
            .bind(id)
            .execute(self.handle.connection())
            .await?;
        if res.rows_affected() == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    async fn delete(&mut self, id: i64) -> Result<(), Error> {
        query("DELETE FROM questions WHERE id = ?").bind(id).execute(self.handle.connection()).await?;
        Ok(())
    }
}

impl<H> QuestionOptionCommon for SqliteStore<H>
where
    H: Handle,
{
    async fn bulk_insert(&mut self, question_id: i64, options: Vec<OptionInsert>) -> Result<Vec<QuestionOption>, Error> {
        if options.is_empty() {
            return Ok(Vec::new());
        }
        let mut stmt = QueryBuilder::<Sqlite>::new("INSERT INTO question_options (body, correct, question_id) ");
        stmt.push_values(options, |mut b, opt| {
            b.push_bind(opt.body).push_bind(opt.correct).push_bind(question_id);
        });
        stmt.push(" RETURNING id, body, correct, question_id");
        let mut rows: Vec<Opt> = stmt.build_query_as().fetch_all(self.handle.connection()).await?;
        // RETURNING order is unspecified, ids follow insertion order
        rows.sort_by_key(|o| o.id);
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn bulk_replace(&mut self, question_id: i64, options: Vec<OptionInsert>) -> Result<Vec<QuestionOption>, Error> {
        self.run_in_transaction(|tx| {
            Box::pin(async move {
                query("DELETE FROM question_options WHERE question_id = ?")
                    .bind(question_id)
                    .execute(tx.handle.connection())
                    .await?;
                tx.bulk_insert(question_id, options).await
            })
        })
        .await
    }

    async fn query_by_questions(&mut self, question_ids: &[i64]) -> Result<Vec<QuestionOption>, Error> {
        if question_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut stmt = QueryBuilder::<Sqlite>::new("SELECT id, body, correct, question_id FROM question_options WHERE question_id IN (");
        let mut ids = stmt.separated(", ");
        for id in question_ids {
            ids.push_bind(*id);
        }
        ids.push_unseparated(") ORDER BY id");
        let rows: Vec<Opt> = stmt.build_query_as().fetch_all(self.handle.connection()).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

impl<H: Handle> Common for SqliteStore<H> {}
impl<H: Handle> Store for SqliteStore<H> {}

impl<'s> TxStore for SqliteStore<Scope<'s>> {
    async fn commit(self) -> Result<(), Error> {
        self.handle.commit().await
    }

    async fn rollback(self) -> Result<(), Error> {
        self.handle.rollback().await
    }
}

#[derive(Debug, Clone)]
pub struct SqliteStoreManager {
    pool: SqlitePool,
}

impl SqliteStoreManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn connect(path: &str) -> Result<Self, Error> {
        let options = SqliteConnectOptions::new().filename(path).create_if_missing(true).foreign_keys(true);
        let pool = SqlitePoolOptions::new().max_connections(5).connect_with(options).await?;
        Ok(Self::new(pool))
    }

    /// Executes every statement of `sql`, in order.
    pub async fn run_script(&self, sql: &str) -> Result<(), Error> {
        self.pool.execute(sql).await?;
        Ok(())
    }

    pub async fn acquire(&self) -> Result<SqliteStore<PoolConnection<Sqlite>>, Error> {
        let conn = self.pool.acquire().await?;
        Ok(SqliteStore::new(conn))
    }
}

impl Manager for SqliteStoreManager {
    type Store = SqliteStore<PoolConnection<Sqlite>>;

    async fn db(&self) -> Result<Self::Store, Error> {
        self.acquire().await
    }
}

#[cfg(test)]
pub const SCHEMA: &str = include_str!("../../database_init.sql");

/// An in-memory database behind a single connection, so every handle sees the same data.
#[cfg(test)]
pub async fn test_manager() -> SqliteStoreManager {
    use std::str::FromStr;

    let options = SqliteConnectOptions::from_str("sqlite::memory:").unwrap().foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();
    let manager = SqliteStoreManager::new(pool);
    manager.run_script(SCHEMA).await.unwrap();
    manager
}
