use stubrun_stub::{AppResolver, Catalog};

use crate::cmd::ResolveArgs;
use crate::exit::{resolve_error, CliResult, SUCCESS};
use crate::output::{print_catalog, print_resolved, OutputFormat};

pub fn run(args: ResolveArgs, format: OutputFormat) -> CliResult<i32> {
    let catalog =
        Catalog::load(&args.catalog).map_err(|err| resolve_error("catalog load failed", err))?;

    match &args.app {
        Some(app) => {
            let path = catalog
                .resolve(app)
                .map_err(|err| resolve_error("resolve failed", err))?;
            print_resolved(app, &path, format);
        }
        None => print_catalog(catalog.records(), format),
    }

    Ok(SUCCESS)
}
