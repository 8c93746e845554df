// Domain layer: the value model and the seams (encoder hook, storage) the core is written against.

pub mod model;
pub mod ports;
