//! Render command - turn content into HTML

use crate::cli::args::{RenderArgs, RenderOutput};
use crate::config::Config;
use crate::engine::assets;
use crate::error::{MathError, MathResult};
use crate::render::{standalone_document, MathRenderer, Stylesheet};
use tokio::io::AsyncReadExt;
use tracing::{debug, warn};

/// Execute the render command
pub async fn execute(args: RenderArgs, config: &Config) -> MathResult<()> {
    let content = read_content(&args).await?;
    let mode = args.mode.unwrap_or(config.render.default_mode);
    debug!("Rendering {} bytes in {} mode", content.len(), mode.as_str());

    let renderer = MathRenderer::from_config(config)?;
    let markup = renderer.render(&content, mode, args.inline).await;

    if markup.has_errors() {
        warn!("Some formulas could not be rendered and were left as source");
    }

    match args.output {
        RenderOutput::Json => {
            println!("{}", serde_json::to_string_pretty(&markup)?);
        }
        RenderOutput::Html if args.standalone => {
            let stylesheet = if args.embed_css {
                Stylesheet::Inline(assets::fetch_stylesheet(&config.engine.version).await?)
            } else {
                Stylesheet::Link(assets::stylesheet_url(&config.engine.version))
            };
            print!("{}", standalone_document(&markup.to_html(), &stylesheet));
        }
        RenderOutput::Html => println!("{}", markup),
    }

    Ok(())
}

/// Content from the argument, the `--file` path, or stdin
async fn read_content(args: &RenderArgs) -> MathResult<String> {
    if let Some(ref content) = args.content {
        return Ok(content.clone());
    }

    if let Some(ref path) = args.file {
        return tokio::fs::read_to_string(path)
            .await
            .map_err(|e| MathError::io(format!("reading {}", path.display()), e));
    }

    let mut content = String::new();
    tokio::io::stdin()
        .read_to_string(&mut content)
        .await
        .map_err(|e| MathError::io("reading stdin", e))?;

    if content.is_empty() {
        return Err(MathError::User(
            "Nothing to render: pass content, --file, or pipe stdin".to_string(),
        ));
    }
    Ok(content)
}
