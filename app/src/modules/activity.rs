pub(crate) mod api;
pub(crate) mod seed;
pub(crate) mod service;
