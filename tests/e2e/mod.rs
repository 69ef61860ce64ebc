// End-to-end tests for the Meditation Backend API
//
// Every test gets its own server on an ephemeral port, backed by a scratch
// output directory and in-process fake script/TTS providers. Nothing leaves
// the machine, so tests run in parallel.

mod test_download;
mod test_health;
mod test_meditation;
