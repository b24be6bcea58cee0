pub(crate) const DEFAULT_USER_AGENT: &str = concat!("kcload/", env!("CARGO_PKG_VERSION"));
