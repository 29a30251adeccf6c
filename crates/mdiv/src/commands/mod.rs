//! CLI command implementations.

mod check;
mod convert;
mod source;

pub(crate) use check::CheckArgs;
pub(crate) use convert::ConvertArgs;
