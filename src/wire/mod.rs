//! Wire-format encoders for the legacy protocol.

pub mod xml;

pub use xml::{XmlDocument, XmlValue};
