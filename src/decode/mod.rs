pub mod codec;
pub mod url;

pub use codec::{decode, decode_bytes, normalize};
pub use url::{classify, is_web_url, UrlClassification};
