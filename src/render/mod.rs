pub(crate) mod blur;
pub(crate) mod compositor;
pub(crate) mod mask;
pub(crate) mod pipeline;
pub(crate) mod surface;
pub(crate) mod text;
