pub mod hashing;
pub mod jwt;
pub mod notifier;
pub mod otp;
