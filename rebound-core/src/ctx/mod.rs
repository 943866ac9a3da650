mod filter_state;
mod request_ctx;
mod request_id;
mod response_ctx;
mod stream_info;


pub use filter_state::{FilterState, FilterStateError, Lifespan, Mutability};
pub use request_ctx::RequestCtx;
pub use request_id::RequestId;
pub use response_ctx::ResponseCtx;
pub use stream_info::StreamInfo;
