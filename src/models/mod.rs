pub mod admin;
pub mod machine;
pub mod order;
pub mod part;
pub mod subcategory;
