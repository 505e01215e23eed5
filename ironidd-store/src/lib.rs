/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # IronIdd Store
//!
//! Dictionary sources and caching for the IronIdd dictionary toolkit.
//!
//! This crate provides:
//! - **MemorySources**: In-memory source map for tests and embedded dictionaries
//! - **FileSystemLoader**: Loads sources relative to a root directory
//! - **DictionaryCache**: Process-wide, load-once cache of parsed dictionaries

pub mod cache;
pub mod file;
pub mod memory;

pub use cache::DictionaryCache;
pub use file::FileSystemLoader;
pub use ironidd_dictionary::SourceLoader;
pub use memory::MemorySources;
