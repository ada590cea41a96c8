//! The host page and the one load sequence that runs against it.

use std::time::Duration;

use tracing::{info, warn};

use crate::{
    cli::Source,
    dom::{Document, Element, Node, Tag, el},
    loader::{self, LoadError},
    render::{self, group_by_year},
    report::report_error,
};

/// Id of the element the publication list is rendered into.
pub const ROOT_ID: &str = "pubs-root";

/// Id of the element failures are shown in.
pub const ERROR_ID: &str = "pubs-error";

#[derive(Debug, Clone)]
pub struct PageOptions {
    pub title: String,
    pub error_area: bool,
}

impl Default for PageOptions {
    fn default() -> Self {
        PageOptions {
            title: "Publications".to_string(),
            error_area: true,
        }
    }
}

/// Build the empty page: a hidden error area (unless disabled) followed by the container.
pub fn skeleton(opts: &PageOptions) -> Document {
    let head = el(
        Tag::Head,
        &[],
        vec![
            el(Tag::Meta, &[("charset", "utf-8")], vec![]).into(),
            el(Tag::Title, &[("text", opts.title.as_str())], vec![]).into(),
        ],
    );

    let mut main: Vec<Node> = vec![el(Tag::H2, &[("text", opts.title.as_str())], vec![]).into()];
    if opts.error_area {
        main.push(
            el(
                Tag::Div,
                &[("id", ERROR_ID), ("class", "pubs-error"), ("style", "display: none")],
                vec![],
            )
            .into(),
        );
    }
    main.push(el(Tag::Div, &[("id", ROOT_ID), ("class", "pubs-root")], vec![]).into());

    let body = el(Tag::Body, &[], vec![el(Tag::Main, &[], main).into()]);
    Document::new(el(Tag::Html, &[("lang", "en")], vec![head.into(), body.into()]))
}

/// What a load sequence did to the page.
#[derive(Debug)]
pub enum Outcome {
    Rendered { records: usize, groups: usize },
    Failed(LoadError),
}

/// Load `source` and either render it into the container or report the failure.
///
/// Exactly one of the two happens. On failure the container is left untouched.
pub fn load_into(document: &mut Document, source: &Source, timeout: Option<Duration>) -> Outcome {
    match loader::load(source, timeout) {
        Ok(records) => {
            let groups = group_by_year(&records).len();
            render::render(document, ROOT_ID, &records);
            info!(records = records.len(), groups, "rendered publications");
            Outcome::Rendered {
                records: records.len(),
                groups,
            }
        }
        Err(err) => {
            warn!(%source, error = %err, "could not load publications");
            report_error(document, ERROR_ID, &err.to_string());
            Outcome::Failed(err)
        }
    }
}

/// Markup of the error area (if any) and the container, without the surrounding page.
pub fn fragment(document: &Document) -> String {
    [ERROR_ID, ROOT_ID]
        .into_iter()
        .filter_map(|id| document.element_by_id(id))
        .map(Element::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
