//! sha256-stream: SHA-256 over a stream of 32-bit words
//!
//! The compression core consumes big-endian words one at a time from a
//! bounded source and emits the eight-word digest once the declared number of
//! blocks has been folded.

pub mod config;
pub mod error;
pub mod hash;
pub mod output;
pub mod padding;
pub mod pipeline;
pub mod result;
pub mod stream;
pub mod transport;


pub use config::Config;
pub use error::HashError;
pub use hash::{sha256, Digest};
pub use output::{save_report, OutputFormat};
pub use pipeline::{Pipeline, PipelineConfig};
pub use result::HashReport;
pub use stream::{Controller, Phase};
pub use transport::WordSource;
