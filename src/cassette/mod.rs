//! Cassettes: ordered records of element writes, for recording a run and
//! verifying later runs against it.

pub mod format;
pub mod recorder;
pub mod replayer;
pub mod session;
