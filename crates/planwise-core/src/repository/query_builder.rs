use crate::models::OwnerId;
use crate::query::TaskQuery;
use sqlx::{QueryBuilder, Sqlite};

/// Utility functions for turning a [`TaskQuery`] into SQL
pub struct SqlQueryBuilder;

impl SqlQueryBuilder {
    /// Push a WHERE clause scoping `t` (the tasks table alias) to the owner
    /// and the query's filters
    pub fn build_task_where_clause<'a>(
        owner: &OwnerId,
        query: &TaskQuery,
        qb: &mut QueryBuilder<'a, Sqlite>,
    ) {
        qb.push(" WHERE t.owner = ");
        qb.push_bind(owner.clone());

        if query.top_level_only {
            qb.push(" AND t.parent_id IS NULL");
        }

        if let Some(category_id) = query.category_id {
            qb.push(" AND t.category_id = ");
            qb.push_bind(category_id);
        }

        if let Some(completed) = query.completed {
            qb.push(" AND t.is_completed = ");
            qb.push_bind(completed);
        }

        if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = Self::like_pattern(search);
            qb.push(" AND (LOWER(t.title) LIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" ESCAPE '\\' OR LOWER(COALESCE(t.description, '')) LIKE ");
            qb.push_bind(pattern);
            qb.push(" ESCAPE '\\')");
        }
    }

    /// Build a `%needle%` pattern with LIKE wildcards in the needle escaped
    fn like_pattern(needle: &str) -> String {
        let mut pattern = String::with_capacity(needle.len() + 2);
        pattern.push('%');
        for c in needle.to_lowercase().chars() {
            if matches!(c, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        pattern
    }
}
