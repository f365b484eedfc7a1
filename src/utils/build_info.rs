/// Compile-time build metadata produced by `build.rs`.
#[derive(Debug, Clone, Copy)]
pub struct BuildMetadata {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub git_status: &'static str,
    pub timestamp: &'static str,
    pub target: &'static str,
    pub profile: &'static str,
    pub rustc: &'static str,
}

impl BuildMetadata {
    /// Short form used in report footers, e.g. `0.1.0 (a1b2c3d)`.
    pub fn short_label(&self) -> String {
        let hash: String = self.git_hash.chars().take(7).collect();
        format!("{} ({})", self.version, hash)
    }
}

pub fn current() -> BuildMetadata {
    BuildMetadata {
        version: env!("CARGO_PKG_VERSION"),
        git_hash: option_env!("DOCE_GESTAO_BUILD_HASH").unwrap_or("unknown"),
        git_status: option_env!("DOCE_GESTAO_BUILD_STATUS").unwrap_or("unknown"),
        timestamp: option_env!("DOCE_GESTAO_BUILD_TIMESTAMP").unwrap_or("unknown"),
        target: option_env!("DOCE_GESTAO_BUILD_TARGET").unwrap_or("unknown"),
        profile: option_env!("DOCE_GESTAO_BUILD_PROFILE").unwrap_or("unknown"),
        rustc: option_env!("DOCE_GESTAO_BUILD_RUSTC").unwrap_or("unknown"),
    }
}
