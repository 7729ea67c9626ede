pub(crate) mod controller;
pub(crate) mod surface;
pub(crate) mod timing;
