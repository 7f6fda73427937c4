//! Language-specific grammar implementations.

mod javascript;
mod motoko;
mod rust_lang;

pub use javascript::JavaScriptGrammar;
pub use motoko::MotokoGrammar;
pub use rust_lang::RustGrammar;
