pub mod labeling;
pub mod models;
