//! Categories that each user groups their transactions by.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod list;

pub use create::create_category_endpoint;
pub use db::{
    create_category, create_category_table, delete_category, get_categories, get_category,
    map_category_row, update_category,
};
pub use delete::delete_category_endpoint;
pub use domain::{Category, CategoryData, CategoryId, CategoryName};
pub use edit::update_category_endpoint;
pub use list::{get_categories_endpoint, get_category_endpoint};
