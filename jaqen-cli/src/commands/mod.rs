pub(crate) mod assign;
pub(crate) mod categories;
pub(crate) mod config;
pub(crate) mod resolve;
