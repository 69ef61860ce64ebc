pub mod audio;
pub mod meditation;
pub mod speech;
