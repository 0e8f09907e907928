pub mod csv;
pub mod ics;
pub mod json;
pub mod table;
