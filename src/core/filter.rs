//! Composable predicates for list queries.
//!
//! A filter only ever adds equality conditions to a [`Query`] and the store joins them with
//! `AND`, so combining filters in any grouping or order selects the same rows.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Condition {
    AuthorIdEq(i64),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    conditions: Vec<Condition>,
}

impl Query {
    pub fn new<F: Filter + ?Sized>(filter: &F) -> Self {
        let mut query = Query::default();
        filter.apply(&mut query);
        query
    }

    pub fn push(&mut self, condition: Condition) {
        self.conditions.push(condition);
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }
}

pub trait Filter {
    fn apply(&self, query: &mut Query);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuestionFilter {
    pub author_id: Option<i64>,
}

impl QuestionFilter {
    pub fn by_author(author_id: i64) -> Self {
        Self { author_id: Some(author_id) }
    }
}

impl Filter for QuestionFilter {
    fn apply(&self, query: &mut Query) {
        // zero is the unset author, not a literal match on author 0
        if let Some(author_id) = self.author_id.filter(|id| *id != 0) {
            query.push(Condition::AuthorIdEq(author_id));
        }
    }
}

impl Filter for () {
    fn apply(&self, _: &mut Query) {}
}

impl<F: Filter + ?Sized> Filter for &F {
    fn apply(&self, query: &mut Query) {
        (**self).apply(query)
    }
}

impl<F: Filter> Filter for Option<F> {
    fn apply(&self, query: &mut Query) {
        if let Some(filter) = self {
            filter.apply(query)
        }
    }
}

impl<F: Filter> Filter for [F] {
    fn apply(&self, query: &mut Query) {
        for filter in self {
            filter.apply(query)
        }
    }
}

impl<A: Filter, B: Filter> Filter for (A, B) {
    fn apply(&self, query: &mut Query) {
        self.0.apply(query);
        self.1.apply(query);
    }
}
