//! Input adapters turning external point data into markers

pub mod csv;
pub mod kml;
