pub mod access;
pub mod review;
pub mod sessions;
