pub(crate) mod config;
pub(crate) mod selector;
pub(crate) mod session;
