pub(crate) mod cloud;
pub(crate) mod engine;
pub(crate) mod live;
