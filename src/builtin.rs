//! Profile sources compiled into the binary
//!
//! Listed in file-name order so the built-in table matches loading
//! `data/language/` as a directory.

pub(crate) const PROFILE_SOURCES: &[(&str, &str)] = &[
    ("css.toml", include_str!("../data/language/css.toml")),
    ("go.toml", include_str!("../data/language/go.toml")),
    ("html.toml", include_str!("../data/language/html.toml")),
    ("java.toml", include_str!("../data/language/java.toml")),
    ("javascript.toml", include_str!("../data/language/javascript.toml")),
    ("php.toml", include_str!("../data/language/php.toml")),
    ("python.toml", include_str!("../data/language/python.toml")),
    ("ruby.toml", include_str!("../data/language/ruby.toml")),
    ("svg.toml", include_str!("../data/language/svg.toml")),
    ("twig.toml", include_str!("../data/language/twig.toml")),
    ("typescript.toml", include_str!("../data/language/typescript.toml")),
    ("xml.toml", include_str!("../data/language/xml.toml")),
];
