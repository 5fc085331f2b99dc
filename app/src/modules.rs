pub(crate) mod activity;
