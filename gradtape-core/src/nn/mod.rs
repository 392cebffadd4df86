//! The contract between model code and the engine. Concrete networks live outside
//! this crate; they only need to implement [`Module`].

pub mod module;

pub use module::Module;
