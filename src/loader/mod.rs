//! Loader Module
//!
//! Resolves batches of property ids through the cache, fetching misses from
//! a remote listing source.

mod batch;
mod http;
mod observer;
mod source;


pub use batch::{BatchLoader, LoadOptions, LoadReport, Resolution};
pub use http::HttpImageSource;
pub use observer::{LoadEvent, LoadObserver};
pub use source::{FileDescriptor, ImageLayout, ImageListing, ImageSource};
