//! Query table end-to-end
//!
//! A fixture in the shape the Slim query table expects: its constructor
//! takes one wire string coerced to a date, and `query` returns rows that
//! serialize to a list of rows, each row a list of `[field, value]` pairs.

#[path = "../common/mod.rs"]
mod common;

mod employees;
