mod scan;
mod universe;

use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;

use tracing::warn;

use idxscreen_core::registry::idx_listing::IdxListingSource;
use idxscreen_core::{HttpClient, NoopHttpClient, ReqwestHttpClient, TickerRegistry};

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::Scan(args) => scan::run(cli, args).await,
        Command::Universe(args) => universe::run(cli, args).await,
    }
}

fn http_client(offline: bool) -> Arc<dyn HttpClient> {
    if offline {
        Arc::new(NoopHttpClient)
    } else {
        Arc::new(ReqwestHttpClient::new())
    }
}

/// Resolve the ticker universe: an explicit file wins, otherwise the live
/// IDX listing with the bundled universe as fallback.
async fn resolve_registry(
    client: &Arc<dyn HttpClient>,
    universe_path: Option<&str>,
    offline: bool,
    timeout_ms: u64,
) -> Result<TickerRegistry, CliError> {
    if let Some(path) = universe_path {
        let file = File::open(path)?;
        return TickerRegistry::from_json_reader(BufReader::new(file))
            .map_err(|error| CliError::Command(format!("universe file {path}: {error}")));
    }

    if offline {
        return Ok(TickerRegistry::bundled());
    }

    let listing = IdxListingSource::new(Arc::clone(client)).with_timeout_ms(timeout_ms);
    match listing.fetch().await {
        Ok(registry) => Ok(registry),
        Err(error) => {
            warn!(
                code = error.code(),
                "idx listing unavailable, using bundled universe: {}",
                error.message()
            );
            Ok(TickerRegistry::bundled())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[tokio::test]
    async fn explicit_universe_file_wins_over_everything_else() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"[
                {{ "symbol": "tlkm.jk", "name": "Telkom Indonesia", "sector": "Telecom" }},
                {{ "symbol": "BBCA.JK", "name": "Bank Central Asia" }}
            ]"#
        )
        .expect("write universe");

        let client = http_client(true);
        let path = file.path().to_str().expect("utf-8 path");
        let registry = resolve_registry(&client, Some(path), false, 1_000)
            .await
            .expect("file universe must load");

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.instruments()[0].symbol.as_str(), "BBCA.JK");
        assert_eq!(registry.instruments()[1].symbol.as_str(), "TLKM.JK");
    }

    #[tokio::test]
    async fn missing_universe_file_is_an_io_error() {
        let client = http_client(true);
        let err = resolve_registry(&client, Some("/no/such/universe.json"), false, 1_000)
            .await
            .expect_err("must fail");
        assert!(matches!(err, CliError::Io(_)));
    }

    #[tokio::test]
    async fn malformed_universe_file_is_a_command_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "{{not json").expect("write body");

        let client = http_client(true);
        let path = file.path().to_str().expect("utf-8 path");
        let err = resolve_registry(&client, Some(path), false, 1_000)
            .await
            .expect_err("must fail");
        assert!(matches!(err, CliError::Command(_)));
    }

    #[tokio::test]
    async fn offline_resolution_uses_the_bundled_universe() {
        let client = http_client(true);
        let registry = resolve_registry(&client, None, true, 1_000)
            .await
            .expect("bundled universe");
        assert!(registry.len() >= 30);
    }
}
