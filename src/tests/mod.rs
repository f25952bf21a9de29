mod drop;
mod fmt;
mod shared;
