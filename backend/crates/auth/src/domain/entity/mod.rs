pub mod profile_image;
pub mod user;
pub mod user_infos;
