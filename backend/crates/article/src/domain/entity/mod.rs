pub mod article;
pub mod media_file;
pub mod section;
