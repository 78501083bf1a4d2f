use crate::core::filter::Query;
use crate::core::models::{
    common::Pagination,
    option::{Insert as OptionInsert, QuestionOption},
    question::{Insert as QuestionInsert, Question, Update as QuestionUpdate},
};
use crate::error::Error;

pub trait QuestionCommon {
    /// Questions matching `query` in ascending id order, each with its options loaded.
    async fn query(&mut self, query: &Query, pagination: Pagination) -> Result<Vec<Question>, Error>;
    /// Stores the question row only; options go through [`QuestionOptionCommon::bulk_insert`].
    async fn insert(&mut self, question: QuestionInsert) -> Result<i64, Error>;
    /// Options are left empty.
    async fn get(&mut self, id: i64) -> Result<Question, Error>;
    async fn update(&mut self, id: i64, question: QuestionUpdate) -> Result<(), Error>;
    async fn delete(&mut self, id: i64) -> Result<(), Error>;
}

pub trait QuestionOptionCommon {
    async fn bulk_insert(&mut self, question_id: i64, options: Vec<OptionInsert>) -> Result<Vec<QuestionOption>, Error>;
    /// Deletes every option of the question and inserts `options` in their place, atomically.
    async fn bulk_replace(&mut self, question_id: i64, options: Vec<OptionInsert>) -> Result<Vec<QuestionOption>, Error>;
    async fn query_by_questions(&mut self, question_ids: &[i64]) -> Result<Vec<QuestionOption>, Error>;
}

pub trait Common: QuestionCommon + QuestionOptionCommon {}

pub trait Store: Common {}

pub trait TxStore: Store {
    async fn commit(self) -> Result<(), Error>;
    async fn rollback(self) -> Result<(), Error>;
}

pub trait Manager {
    type Store: Store;

    async fn db(&self) -> Result<Self::Store, Error>;
}
