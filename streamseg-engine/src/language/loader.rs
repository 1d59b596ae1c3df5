//! Language pack resolution
//!
//! Packs live in an optional data directory as `<code>.toml`. Bundled packs
//! are compiled in and are installed into the data directory on first use
//! unless offline mode forbids it.

use super::config::LanguagePack;
use crate::error::InitError;
use std::fs;
use std::path::Path;

const BUNDLED: [(&str, &str); 2] = [
    ("en", include_str!("../../configs/languages/english.toml")),
    ("ru", include_str!("../../configs/languages/russian.toml")),
];

/// Canonical pack code for a user-supplied language name
pub fn normalize_code(language: &str) -> String {
    let lower = language.trim().to_lowercase();
    let base = lower
        .split(&['-', '_'][..])
        .next()
        .unwrap_or_default()
        .to_string();

    match base.as_str() {
        "english" | "eng" => "en".to_string(),
        "russian" | "rus" => "ru".to_string(),
        _ => base,
    }
}

/// Codes of the compiled-in packs
pub fn bundled_languages() -> Vec<&'static str> {
    BUNDLED.iter().map(|(code, _)| *code).collect()
}

/// Raw TOML of a compiled-in pack
pub fn bundled_pack_source(code: &str) -> Option<&'static str> {
    BUNDLED
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, source)| *source)
}

/// Parse and validate a compiled-in pack
pub fn bundled_pack(language: &str) -> Result<LanguagePack, InitError> {
    let code = normalize_code(language);
    let source = bundled_pack_source(&code).ok_or(InitError::UnknownLanguage(code.clone()))?;
    parse_pack(&code, source)
}

/// Parse and validate pack TOML for the given code
pub fn parse_pack(code: &str, source: &str) -> Result<LanguagePack, InitError> {
    let pack: LanguagePack = toml::from_str(source).map_err(|e| InitError::PackParse {
        language: code.to_string(),
        reason: e.to_string(),
    })?;

    pack.validate().map_err(|reason| InitError::PackInvalid {
        language: code.to_string(),
        reason,
    })?;

    let declared = normalize_code(&pack.metadata.code);
    if declared != code {
        return Err(InitError::PackInvalid {
            language: code.to_string(),
            reason: format!("pack declares code '{declared}'"),
        });
    }

    Ok(pack)
}

/// Locate the pack for `language`
///
/// Order: `data_dir/<code>.toml`; then, unless offline with a data directory
/// configured, the bundled pack (installed into `data_dir` when set).
pub fn resolve_pack(
    language: &str,
    offline: bool,
    data_dir: Option<&Path>,
) -> Result<LanguagePack, InitError> {
    let code = normalize_code(language);

    if let Some(dir) = data_dir {
        let path = dir.join(format!("{code}.toml"));
        if path.is_file() {
            log::info!("Loading language pack '{code}' from {}", path.display());
            let source = fs::read_to_string(&path)
                .map_err(|e| InitError::Io(format!("{}: {e}", path.display())))?;
            return parse_pack(&code, &source);
        }

        if offline {
            return Err(InitError::PackUnavailable { language: code });
        }
    }

    let source = bundled_pack_source(&code).ok_or(InitError::UnknownLanguage(code.clone()))?;
    let pack = parse_pack(&code, source)?;

    if let Some(dir) = data_dir {
        match install_pack(dir, &code, source) {
            Ok(()) => log::info!("Installed language pack '{code}' into {}", dir.display()),
            Err(e) => log::warn!("Failed to install language pack '{code}': {e}"),
        }
    }

    Ok(pack)
}

/// Parse and validate a standalone pack file under its declared code
pub fn load_pack_file(path: &Path) -> Result<LanguagePack, InitError> {
    let source = fs::read_to_string(path)
        .map_err(|e| InitError::Io(format!("{}: {e}", path.display())))?;
    let label = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let declared: LanguagePack = toml::from_str(&source).map_err(|e| InitError::PackParse {
        language: label,
        reason: e.to_string(),
    })?;
    parse_pack(&normalize_code(&declared.metadata.code), &source)
}

fn install_pack(dir: &Path, code: &str, source: &str) -> std::io::Result<()> {
    fs::create_dir_all(dir)?;
    fs::write(dir.join(format!("{code}.toml")), source)
}
