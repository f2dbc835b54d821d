// Allow for using booleans in match statements where it makes it more readable
#![allow(clippy::match_bool)]

// Re-export all items
pub mod cli;
pub mod convert;
pub mod io;
pub mod schema;
pub mod shared;
pub mod shell;
pub mod table;
pub mod track;
