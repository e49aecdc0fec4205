pub mod perspective;
pub mod posts;
pub mod status;
