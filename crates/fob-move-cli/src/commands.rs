//! The move command: load settings, run the move on a staged tree, then
//! flush, format and report.

use std::sync::Arc;

use fob_move::{
    FsTree, ImportScanGraphProvider, JsonGraphProvider, MoveFileGenerator, MoveSummary, ProjectGraphProvider,
    Workspace,
};
use tracing::debug;

use crate::cli::Cli;
use crate::config::Settings;
use crate::error::{CliError, Result};
use crate::formatter::CommandFormatter;
use crate::ui;

/// Run one move request. Nothing reaches the disk unless the whole request
/// succeeds and `--dry-run` is off.
pub async fn execute(args: Cli) -> Result<MoveSummary> {
    if !args.cwd.is_dir() {
        return Err(CliError::RootNotFound(args.cwd.clone()));
    }
    let root = args.cwd.clone();
    let settings = Settings::load(&root, args.config.as_deref(), args.graph.as_deref())?;
    let options = args.move_options();
    debug!(root = %root.display(), ?settings, "loaded settings");

    let formatter = settings
        .formatter
        .as_deref()
        .and_then(CommandFormatter::new)
        .map(Arc::new);

    let mut tree = FsTree::new(&root);
    let summary = {
        let mut workspace = Workspace::open(&mut tree, settings.workspace.clone());
        let graph: Box<dyn ProjectGraphProvider> = match &settings.graph_file {
            Some(path) => Box::new(JsonGraphProvider::new(path.as_str())),
            None => Box::new(ImportScanGraphProvider::new(
                workspace.projects().clone(),
                settings.workspace.clone(),
            )),
        };

        let mut generator = MoveFileGenerator::new(graph.as_ref());
        if let Some(formatter) = &formatter {
            generator = generator.with_formatter(formatter.clone());
        }
        generator.run(&mut workspace, &options).await?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if !args.quiet {
        ui::print_summary(&summary, args.dry_run);
    }

    if args.dry_run {
        return Ok(summary);
    }

    tree.flush().map_err(CliError::Flush)?;

    if let Some(formatter) = formatter.filter(|_| !options.skip_format) {
        formatter.run(&root).await?;
    }

    Ok(summary)
}
