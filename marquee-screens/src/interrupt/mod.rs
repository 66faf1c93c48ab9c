//! Screens that preempt the rotation

pub mod greet;
pub mod ip;
pub mod message;
pub mod splash;

pub use greet::Greet;
pub use ip::IpAddress;
pub use message::Message;
pub use splash::Splash;
