use std::collections::HashMap;

use sqlx::{Database, Encode, Type, query::QueryAs};

use crate::prelude::{AppError, FieldError, Result};

/// How a single query-string filter turns into SQL.
#[derive(Debug, Clone, Copy)]
pub enum Match {
    /// `column = value`
    Exact(&'static str),
    /// `column = value`, where value must be one of the listed literals.
    OneOf(&'static str, &'static [&'static str]),
    /// `column = value` with the value parsed as an integer id.
    Id(&'static str),
    /// Selects a fixed, bind-free fragment by value, e.g. `active` -> `is_active = TRUE`.
    Flag(&'static [(&'static str, &'static str)]),
    /// Case-insensitive `%term%` match OR-ed across the columns; one bind per column.
    Search(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
pub struct Filter {
    pub name: &'static str,
    pub matcher: Match,
}

impl Filter {
    pub const fn new(name: &'static str, matcher: Match) -> Self {
        Filter { name, matcher }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Bind {
    Text(String),
    Int(i64),
}

/// WHERE conditions with `?` markers plus their binds, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Predicate {
    conditions: Vec<String>,
    binds: Vec<Bind>,
}

impl Predicate {
    /// Builds conditions for every filter that has a usable value in `params`.
    ///
    /// Missing, blank and `all` values are skipped entirely. Values a filter
    /// cannot accept (non-numeric ids, unknown enum members) are reported
    /// together as a validation error.
    pub fn build(filters: &[Filter], params: &HashMap<String, String>) -> Result<Self> {
        let mut predicate = Predicate::default();
        let mut errors = vec![];
        for filter in filters {
            let Some(value) = params.get(filter.name).map(|v| v.trim()) else {
                continue;
            };
            if value.is_empty() {
                continue;
            }
            if value.eq_ignore_ascii_case("all") && !matches!(filter.matcher, Match::Search(_)) {
                continue;
            }
            match filter.matcher {
                Match::Exact(column) => {
                    predicate.push(format!("{column} = ?"), vec![Bind::Text(value.to_string())]);
                }
                Match::OneOf(column, allowed) => {
                    if allowed.contains(&value) {
                        predicate.push(format!("{column} = ?"), vec![Bind::Text(value.to_string())]);
                    } else {
                        errors.push(FieldError::new(
                            filter.name,
                            format!("must be one of: {}", allowed.join(", ")),
                        ));
                    }
                }
                Match::Id(column) => match value.parse::<i64>() {
                    Ok(id) => predicate.push(format!("{column} = ?"), vec![Bind::Int(id)]),
                    Err(_) => errors.push(FieldError::new(filter.name, "must be a numeric id")),
                },
                Match::Flag(options) => match options.iter().find(|(key, _)| *key == value) {
                    Some((_, sql)) => predicate.push(sql.to_string(), vec![]),
                    None => {
                        let keys: Vec<&str> = options.iter().map(|(key, _)| *key).collect();
                        errors.push(FieldError::new(
                            filter.name,
                            format!("must be one of: {}", keys.join(", ")),
                        ));
                    }
                },
                Match::Search(columns) => {
                    let pattern = format!("%{}%", escape_like(&value.to_lowercase()));
                    let sql = columns
                        .iter()
                        .map(|column| format!("LOWER({column}) LIKE ? ESCAPE '\\'"))
                        .collect::<Vec<_>>()
                        .join(" OR ");
                    predicate.push(format!("({sql})"), vec![Bind::Text(pattern); columns.len()]);
                }
            }
        }
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }
        Ok(predicate)
    }

    /// Adds a fixed condition that every row must satisfy, e.g. public visibility.
    pub fn and(mut self, sql: &'static str) -> Self {
        self.push(sql.to_string(), vec![]);
        self
    }

    fn push(&mut self, sql: String, binds: Vec<Bind>) {
        debug_assert_eq!(sql.matches('?').count(), binds.len(), "placeholder mismatch in {sql}");
        self.conditions.push(sql);
        self.binds.extend(binds);
    }

    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    pub fn binds(&self) -> &[Bind] {
        &self.binds
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// The WHERE clause with `?` markers, or an empty string.
    pub fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }

    /// The WHERE clause with placeholders numbered `$first`, `$first + 1`, ...
    pub fn render(&self, first: usize) -> String {
        let clause = self.where_clause();
        let mut rendered = String::with_capacity(clause.len() + self.binds.len() * 2);
        for (i, part) in clause.split('?').enumerate() {
            if i > 0 {
                rendered.push_str(&format!("${}", first + i - 1));
            }
            rendered.push_str(part);
        }
        rendered
    }

    /// Binds every value, in order, onto a query rendered with [`Predicate::render`].
    pub fn bind<'q, DB, O>(
        &self,
        mut query: QueryAs<'q, DB, O, <DB as Database>::Arguments<'q>>,
    ) -> QueryAs<'q, DB, O, <DB as Database>::Arguments<'q>>
    where
        DB: Database,
        String: for<'e> Encode<'e, DB> + Type<DB>,
        i64: for<'e> Encode<'e, DB> + Type<DB>,
    {
        for bind in &self.binds {
            query = match bind {
                Bind::Text(text) => query.bind(text.clone()),
                Bind::Int(n) => query.bind(*n),
            };
        }
        query
    }
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
