pub mod assembler;
pub mod clip;
pub mod codec;

pub use assembler::{Artifact, AssemblyError, AudioAssembler, BackgroundSource};
pub use clip::AudioClip;
pub use codec::AudioError;
