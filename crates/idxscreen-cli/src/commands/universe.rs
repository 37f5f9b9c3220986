use crate::cli::{Cli, UniverseArgs};
use crate::error::CliError;
use crate::output;

use super::{http_client, resolve_registry};

pub async fn run(cli: &Cli, args: &UniverseArgs) -> Result<(), CliError> {
    let client = http_client(args.offline);
    let registry = resolve_registry(
        &client,
        args.universe.as_deref(),
        args.offline,
        cli.timeout_ms,
    )
    .await?;

    output::render_universe(&registry, cli.format, cli.pretty)
}
