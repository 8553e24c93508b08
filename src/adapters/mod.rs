// Adapters layer: concrete implementations of the domain ports.

pub mod calamine_reader;
pub mod html;
pub mod http;
pub mod storage;
