//! Core domain modules for healthflux.
//!
//! Contains the record and point model, the export archive reader, XML
//! parsing, the watermark and the importer that ties them together.

pub mod archive;
pub mod health_record;
pub mod importer;
pub mod point;
pub mod watermark;
pub mod xml_parser;
