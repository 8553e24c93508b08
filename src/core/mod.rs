pub mod etl;
pub mod extractor;
pub mod source;

pub use crate::domain::model::{PageData, RecordSet, RenderedCatalog};
pub use crate::domain::ports::{PageRenderer, Pipeline, RemoteFetcher, SpreadsheetReader, Storage};
pub use crate::utils::error::Result;
