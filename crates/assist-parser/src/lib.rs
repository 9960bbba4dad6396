//! Assist Parser - XML to model parser for reporting modules
//!
//! This crate converts reporting-module XML documents (`ReportingModule` /
//! `AssistModule`) into the [`assist_core::Module`] model. It checks document
//! shape only; references between ids are validated by `assist-compiler`.

pub mod element_parser;
pub mod endpoint_parser;
pub mod error;
pub mod module_parser;
pub mod rule_parser;
pub mod template_parser;
pub mod xml_parser;

// Re-export main parser types
pub use error::{ParseError, Result};
pub use module_parser::ModuleParser;
pub use xml_parser::{XmlNode, XmlParser};
