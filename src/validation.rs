//! Request validation driven by explicit schemas.
//!
//! A [`Schema`] is a list of field paths, each with the constraints it must satisfy. Paths are
//! dot separated and a `[]` suffix visits every element of an array, so `options[].body` checks
//! the body of each option and reports violations as `options[0].body`, `options[1].body`, ...
//! Schemas run against the parsed JSON value before it is turned into a typed request.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Present, not null, and not an empty string.
    Required,
    /// Numbers are compared by value, strings by character count, arrays by length.
    Max(u64),
}

impl Constraint {
    pub fn tag(&self) -> &'static str {
        match self {
            Constraint::Required => "required",
            Constraint::Max(_) => "max",
        }
    }

    fn check(&self, value: Option<&Value>) -> bool {
        match self {
            Constraint::Required => match value {
                None | Some(Value::Null) => false,
                Some(Value::String(s)) => !s.is_empty(),
                Some(_) => true,
            },
            Constraint::Max(max) => match value {
                Some(Value::Number(n)) => n.as_f64().map_or(true, |n| n <= *max as f64),
                Some(Value::String(s)) => s.chars().count() as u64 <= *max,
                Some(Value::Array(items)) => items.len() as u64 <= *max,
                _ => true,
            },
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<&'static str>>);

impl ValidationErrors {
    pub fn add(&mut self, field: impl Into<String>, tag: &'static str) {
        self.0.entry(field.into()).or_default().push(tag);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[&'static str]> {
        self.0.get(field).map(Vec::as_slice)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, tags) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, tags.join(", "))?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

#[derive(Debug)]
struct Rule {
    path: &'static str,
    constraints: Vec<Constraint>,
}

#[derive(Debug, Default)]
pub struct Schema {
    rules: Vec<Rule>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, path: &'static str, constraints: &[Constraint]) -> Self {
        self.rules.push(Rule {
            path,
            constraints: constraints.to_vec(),
        });
        self
    }

    pub fn validate(&self, value: &Value) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        for rule in &self.rules {
            let segments: Vec<&str> = rule.path.split('.').collect();
            let mut targets = Vec::new();
            resolve(Some(value), &segments, String::new(), &mut targets);
            for (path, target) in targets {
                for constraint in &rule.constraints {
                    if !constraint.check(target) {
                        errors.add(path.clone(), constraint.tag());
                    }
                }
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn resolve<'v>(value: Option<&'v Value>, segments: &[&str], prefix: String, out: &mut Vec<(String, Option<&'v Value>)>) {
    let Some((head, rest)) = segments.split_first() else {
        out.push((prefix, value));
        return;
    };
    let (name, each) = match head.strip_suffix("[]") {
        Some(name) => (name, true),
        None => (*head, false),
    };
    let path = if prefix.is_empty() { name.to_owned() } else { format!("{}.{}", prefix, name) };
    let child = value.and_then(|v| v.get(name));
    if !each {
        resolve(child, rest, path, out);
        return;
    }
    // a missing array is reported by the rule on the array itself
    if let Some(Value::Array(items)) = child {
        for (i, item) in items.iter().enumerate() {
            resolve(Some(item), rest, format!("{}[{}]", path, i), out);
        }
    }
}

/// Process-wide validator, built once at startup and shared read-only between workers.
#[derive(Debug)]
pub struct Validator {
    question: Schema,
    list: Schema,
}

impl Validator {
    pub fn new(max_page_size: u32) -> Self {
        use Constraint::*;
        Self {
            question: Schema::new()
                .field("body", &[Required])
                .field("options", &[Required])
                .field("options[].body", &[Required])
                .field("options[].correct", &[Required]),
            list: Schema::new().field("pageSize", &[Max(max_page_size as u64)]),
        }
    }

    pub fn parse_question<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T, Error> {
        parse(&self.question, body)
    }

    pub fn parse_list<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T, Error> {
        parse(&self.list, body)
    }
}

fn parse<T: DeserializeOwned>(schema: &Schema, body: &[u8]) -> Result<T, Error> {
    let value: Value = serde_json::from_slice(body)?;
    // typed requests would otherwise accept arrays by field position and skip the schema
    if !value.is_object() {
        return Err(Error::BadRequest("request body must be a JSON object".into()));
    }
    schema.validate(&value)?;
    Ok(serde_json::from_value(value)?)
}
