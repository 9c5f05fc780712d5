//! The unauthenticated endpoints reached from campaign e-mails and the
//! hosted signup form.

pub mod export;
pub mod form;
pub mod message;
pub mod optin;
pub mod pages;
pub mod params;
pub mod subscription;
pub mod track;
pub mod wipe;
