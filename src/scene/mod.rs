pub(crate) mod color;
pub(crate) mod fingerprint;
pub(crate) mod model;
