use serde::Serialize;

use super::RecipeAttribute;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Ingredient {
    pub id: i64,
    #[serde(skip)]
    pub user_id: i64,
    pub name: String,
}

impl RecipeAttribute for Ingredient {
    const TABLE: &'static str = "ingredients";
    const LABEL: &'static str = "Ingredient";

    fn id(&self) -> i64 {
        self.id
    }
}

impl std::fmt::Display for Ingredient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_as_name() {
        let ingredient = Ingredient {
            id: 1,
            user_id: 1,
            name: "Ingredient1".to_string(),
        };
        assert_eq!(ingredient.to_string(), ingredient.name);
        assert_eq!(Ingredient::TABLE, "ingredients");
    }
}
