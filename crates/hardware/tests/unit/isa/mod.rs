/// Decoding of trace lines into instruction records.
pub mod decode;
