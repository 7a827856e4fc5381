use super::{model_index, read_text, write_text};
use crate::cli::ExtractArgs;
use crate::error::Result;
use dockscope::core::io::extract::extract_model;
use dockscope::core::io::layout::has_multiple_models;
use std::borrow::Cow;
use tracing::{info, warn};

pub async fn run(args: ExtractArgs) -> Result<()> {
    let text = read_text(&args.input).await?;
    let model_number = model_index(args.model)? + 1;

    if !has_multiple_models(&text) {
        warn!(
            "{:?} has no MODEL blocks; writing the file unchanged.",
            &args.input
        );
    }

    let extracted = extract_model(&text, model_number);
    match &extracted {
        Cow::Borrowed(_) => warn!(
            model = model_number,
            "Model not found or empty; writing the input text unchanged."
        ),
        Cow::Owned(lines) => info!(
            model = model_number,
            atoms = lines.lines().count(),
            "Extracted model."
        ),
    }

    write_text(args.output.as_deref(), &extracted).await
}
