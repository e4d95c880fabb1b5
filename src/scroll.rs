pub(crate) mod signal;
pub(crate) mod tracker;
