pub(crate) mod timeline;
pub(crate) mod visibility;
