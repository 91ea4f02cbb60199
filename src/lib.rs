// Library exports for folio

pub mod config;
pub mod richtext;
