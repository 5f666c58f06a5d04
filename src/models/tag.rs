use serde::Serialize;

use super::RecipeAttribute;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Tag {
    pub id: i64,
    #[serde(skip)]
    pub user_id: i64,
    pub name: String,
}

impl RecipeAttribute for Tag {
    const TABLE: &'static str = "tags";
    const LABEL: &'static str = "Tag";

    fn id(&self) -> i64 {
        self.id
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
