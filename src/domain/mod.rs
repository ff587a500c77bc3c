pub mod format;
pub mod format_factory;
pub mod formats;
pub mod validate;
