pub mod admin;
pub mod analytics;
pub mod contact;
pub mod docs;
pub mod health;
pub mod pages;
pub mod seo;
