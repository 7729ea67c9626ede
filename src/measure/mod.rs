pub(crate) mod metrics_engine;
pub(crate) mod parley_engine;
pub(crate) mod service;
