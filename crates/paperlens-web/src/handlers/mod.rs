pub mod api_key;
pub mod paper;
pub mod section;
pub mod summary;
