//! This module defines the traits implemented by circuits and proving backends.
pub mod circuit;
pub mod snark;
