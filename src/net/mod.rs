pub mod codec;
pub mod messages;
pub mod shared;
pub mod tcp;
