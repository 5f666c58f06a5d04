use serde::Serialize;
use sqlx::postgres::PgRow;

/// A named, user-owned label that can be attached to recipes.
///
/// Tags and ingredients share storage layout and API behaviour; the
/// implementing type only supplies its table and the wording used in
/// error messages and logs.
pub trait RecipeAttribute:
    for<'r> sqlx::FromRow<'r, PgRow> + Serialize + Send + Unpin + 'static
{
    /// Table holding `(id, user_id, name)` rows.
    const TABLE: &'static str;
    /// Human readable name, e.g. "Tag".
    const LABEL: &'static str;

    fn id(&self) -> i64;
}
