//! Marker files: text format, keep-list import and canonical file resolution

pub mod format;
pub mod gateway;
pub mod keeplist;

pub use format::{format_marker_text, parse_marker_text, strip_degenerate_lines};
pub use gateway::{GatewayOutcome, MarkerCandidates, MarkerFormat, MarkerGateway};
pub use keeplist::{import_keep_list, parse_keep_list};
