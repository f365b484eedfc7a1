pub mod build_info;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVE: &str = "doce_gestao=info";

/// Installs the global fmt subscriber; `RUST_LOG` directives are honored.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = match DEFAULT_DIRECTIVE.parse() {
            Ok(directive) => EnvFilter::from_default_env().add_directive(directive),
            Err(_) => EnvFilter::from_default_env(),
        };

        // Another subscriber may already be installed by the host.
        let _ = fmt().with_env_filter(filter).try_init();
    });
}
