//! Core utilities.

pub(crate) mod io;
pub(crate) mod raw;

pub(crate) use io::{BufStream, StreamError};
