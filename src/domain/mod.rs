// Domain layer: catalog records and the ports the extraction and rendering code talks through.

pub mod model;
pub mod ports;
