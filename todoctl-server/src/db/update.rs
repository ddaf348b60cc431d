//! Partial-update statement builder
//!
//! Starts from an empty assignment set and appends one `SET` clause per
//! supplied field, so a column the caller did not supply can never appear
//! in the statement.

use sqlx::{Postgres, QueryBuilder};

use crate::models::{TodoPatch, TodoTitle, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Assignment {
    Title(String),
    Completed(bool),
}

impl Assignment {
    fn column(&self) -> &'static str {
        match self {
            Self::Title(_) => "title",
            Self::Completed(_) => "completed",
        }
    }
}

/// Assignment set for `UPDATE todos SET ... WHERE id = $n`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoUpdate {
    assignments: Vec<Assignment>,
}

impl TodoUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: TodoTitle) -> Self {
        self.set(Assignment::Title(title.into_string()));
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.set(Assignment::Completed(completed));
        self
    }

    /// Setting a column twice keeps the latest value rather than emitting
    /// a duplicate assignment.
    fn set(&mut self, assignment: Assignment) {
        match self
            .assignments
            .iter_mut()
            .find(|a| a.column() == assignment.column())
        {
            Some(existing) => *existing = assignment,
            None => self.assignments.push(assignment),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Columns the statement will write, in clause order.
    pub fn columns(&self) -> Vec<&'static str> {
        self.assignments.iter().map(Assignment::column).collect()
    }

    /// Build the `UPDATE ... RETURNING` statement for `id`.
    ///
    /// # Errors
    ///
    /// [`ValidationError::NoFields`] if nothing was assigned.
    pub fn into_query(self, id: i64) -> Result<QueryBuilder<'static, Postgres>, ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::NoFields);
        }

        let mut query = QueryBuilder::new("UPDATE todos SET ");
        let mut set = query.separated(", ");
        for assignment in self.assignments {
            match assignment {
                Assignment::Title(title) => {
                    set.push("title = ");
                    set.push_bind_unseparated(title);
                }
                Assignment::Completed(completed) => {
                    set.push("completed = ");
                    set.push_bind_unseparated(completed);
                }
            }
        }
        query.push(" WHERE id = ");
        query.push_bind(id);
        query.push(" RETURNING id, title, completed");

        Ok(query)
    }
}

impl From<TodoPatch> for TodoUpdate {
    fn from(patch: TodoPatch) -> Self {
        let (title, completed) = patch.into_parts();
        let mut update = Self::new();
        if let Some(title) = title {
            update = update.title(title);
        }
        if let Some(completed) = completed {
            update = update.completed(completed);
        }
        update
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TodoChanges;

    fn title(s: &str) -> TodoTitle {
        TodoTitle::new(s).unwrap()
    }

    #[test]
    fn empty_update_is_rejected() {
        let err = TodoUpdate::new().into_query(1).err().unwrap();
        assert_eq!(err, ValidationError::NoFields);
    }

    #[test]
    fn completed_only_leaves_title_out() {
        let query = TodoUpdate::new().completed(true).into_query(7).unwrap();
        assert_eq!(
            query.sql(),
            "UPDATE todos SET completed = $1 WHERE id = $2 RETURNING id, title, completed"
        );
    }

    #[test]
    fn title_only_leaves_completed_out() {
        let query = TodoUpdate::new().title(title("x")).into_query(7).unwrap();
        assert_eq!(
            query.sql(),
            "UPDATE todos SET title = $1 WHERE id = $2 RETURNING id, title, completed"
        );
    }

    #[test]
    fn both_fields_are_comma_separated() {
        let query = TodoUpdate::new()
            .title(title("x"))
            .completed(false)
            .into_query(7)
            .unwrap();
        assert_eq!(
            query.sql(),
            "UPDATE todos SET title = $1, completed = $2 WHERE id = $3 RETURNING id, title, completed"
        );
    }

    #[test]
    fn repeated_column_keeps_latest() {
        let update = TodoUpdate::new().completed(true).completed(false);
        assert_eq!(update.columns(), vec!["completed"]);
        assert_eq!(update, TodoUpdate::new().completed(false));
    }

    #[test]
    fn from_patch_mirrors_supplied_fields() {
        let patch = TodoPatch::try_from(TodoChanges::completed(true)).unwrap();
        assert_eq!(TodoUpdate::from(patch).columns(), vec!["completed"]);

        let patch = TodoPatch::try_from(TodoChanges {
            title: Some("a".into()),
            completed: Some(true),
        })
        .unwrap();
        assert_eq!(TodoUpdate::from(patch).columns(), vec!["title", "completed"]);
    }
}
