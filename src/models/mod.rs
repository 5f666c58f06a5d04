mod attribute;
mod ingredient;
mod recipe;
mod tag;
mod user;

pub use attribute::RecipeAttribute;
pub use ingredient::Ingredient;
pub use recipe::{Recipe, RecipeDetail, RecipeImage, RecipeSummary};
pub use tag::Tag;
pub use user::{User, UserProfile};
