//! Labels command - replay an operation log and print the labeling

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use spanlab::{
    markup_document_span, save_types_as_ops, save_types_as_strings, save_types_as_xml,
    ClosurePolicy, TextLabels, TextLabelsLoader,
};
use spanlab_core::TextBase;

use crate::output::{format_error, log_info, write_output};
use crate::parser::LabelFormat;

/// Replay an operation log over a document directory
#[derive(Parser, Debug)]
pub struct LabelsArgs {
    /// Directory of documents; each file is one document, named by its file name
    #[arg(long, value_name = "DIR")]
    pub docs: PathBuf,

    /// Operation log to replay
    #[arg(long, value_name = "FILE")]
    pub ops: PathBuf,

    /// Closure policy to start the replay with (setClosure lines override it)
    #[arg(long, value_name = "POLICY")]
    pub policy: Option<ClosurePolicy>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = LabelFormat::Ops)]
    pub format: LabelFormat,

    /// Only mark up this document (markup format)
    #[arg(long, value_name = "ID")]
    pub doc: Option<String>,

    /// Append `:doc:lo:hi` to each type (strings format)
    #[arg(long)]
    pub offsets: bool,

    /// Write to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Suppress the replay summary
    #[arg(short, long)]
    pub quiet: bool,
}

pub fn run(args: LabelsArgs) -> Result<(), String> {
    let base = TextBase::from_dir(&args.docs)
        .map_err(|e| format_error(&format!("reading {}", args.docs.display()), e))?;
    let base = Arc::new(base);

    let mut loader = TextLabelsLoader::new();
    if let Some(policy) = args.policy {
        loader = loader.with_closure_policy(policy);
    }

    let mut labels = TextLabels::new(Arc::clone(&base));
    let stats = loader
        .import_ops(&mut labels, &args.ops)
        .map_err(|e| format_error("replay", e))?;
    log_info(
        &format!(
            "{} documents, {} operations ({} skipped), {} instances of {} types, closure {}",
            base.len(),
            stats.operations,
            stats.skipped,
            labels.instance_count(),
            labels.types().count(),
            stats.policy
        ),
        args.quiet,
    );

    let content = render(&labels, &args)?;
    write_output(&content, args.output.as_deref())
}

fn render(labels: &TextLabels, args: &LabelsArgs) -> Result<String, String> {
    match args.format {
        LabelFormat::Ops => {
            let mut buf = Vec::new();
            save_types_as_ops(labels, &mut buf).map_err(|e| format_error("save ops", e))?;
            String::from_utf8(buf).map_err(|e| format_error("save ops", e))
        }
        LabelFormat::Strings => {
            let mut buf = Vec::new();
            save_types_as_strings(labels, &mut buf, args.offsets)
                .map_err(|e| format_error("save strings", e))?;
            String::from_utf8(buf).map_err(|e| format_error("save strings", e))
        }
        LabelFormat::Xml => save_types_as_xml(labels).map_err(|e| format_error("save xml", e)),
        LabelFormat::Markup => {
            let ids: Vec<String> = match &args.doc {
                Some(id) => vec![id.clone()],
                None => labels
                    .text_base()
                    .document_spans()
                    .map(|span| span.document_id().to_string())
                    .collect(),
            };
            let mut out = String::new();
            for id in ids {
                let xml = markup_document_span(&id, labels)
                    .map_err(|e| format_error(&format!("markup {}", id), e))?;
                out.push_str(&xml);
                out.push('\n');
            }
            Ok(out)
        }
    }
}
