//! Language packs for the rule-based sentence model

pub mod config;
pub mod loader;

pub use config::LanguagePack;
pub use loader::{
    bundled_languages, bundled_pack, load_pack_file, normalize_code, parse_pack, resolve_pack,
};
