pub(crate) mod index;
pub(crate) mod model;
