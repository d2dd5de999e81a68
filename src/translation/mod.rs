// Translation pipeline - canonical request preparation and result normalization
// Author: kelexine (https://github.com/kelexine)

pub mod request;
pub mod response;

pub use request::{
    extend_passthrough, passthrough_json, passthrough_pairs, request_segments, KeyConvention,
};
pub use response::{normalize, NormalizeOptions, RawTranslation};
