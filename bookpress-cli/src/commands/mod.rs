//! CLI command implementations

mod batch;
mod convert;
mod info;

pub use batch::batch;
pub use convert::convert;
pub use info::info;

use crate::RenderArgs;
use anyhow::{Context, Result};
use bookpress_core::{renderer_for_format, CommandRenderer, DocumentRenderer};

/// Pick the renderer for the requested format
fn build_renderer(args: &RenderArgs) -> Result<Box<dyn DocumentRenderer>> {
    if args.format.eq_ignore_ascii_case("pdf") {
        return Ok(Box::new(
            CommandRenderer::new().with_program(args.renderer.as_str()),
        ));
    }
    renderer_for_format(&args.format)
        .with_context(|| format!("No renderer available for {} format", args.format))
}
