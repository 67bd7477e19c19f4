//! Request validation and origin resolution for the shard edge
//!
//! Every inbound request flows through [`Pipeline`]:
//!
//! 1. Cache lookup keyed by the request URL only
//! 2. Path classification by file extension
//! 3. Referer guard (hotlink protection)
//! 4. Shard resolution from the request hostname
//! 5. `index.html` redirect to the site root
//! 6. Video ID extraction
//! 7. Origin URL construction
//! 8. Origin fetch, header decoration and cache population
//!
//! Stages 2 through 7 are pure and synchronous; see [`Pipeline::route`].

mod classify;
mod error;
mod origin;
mod pipeline;
mod referer;
mod request;
mod response;
mod rules;
mod shard;
mod video_id;

pub use classify::{NormalizedPath, PathClassification};
pub use error::EdgeError;
pub use origin::OriginDescriptor;
pub use pipeline::{Pipeline, Route};
pub use referer::check_referer;
pub use request::{IncomingRequest, RefererHeader};
pub use response::{EdgeResponse, decorate};
pub use rules::EdgeRules;
pub use shard::ShardId;
pub use video_id::{VideoId, extract_video_id, parse_thumbnail_prefix};
