//! Server-side rendering
//!
//! All templates are compiled once at startup from strings embedded in the
//! binary. The partial templates (`organism_results`, `protein_results`,
//! `progress_status`) are also registered as handlebars partials so the full
//! pages include them — the same fragment serves both the full render and
//! the partial-update response.

use handlebars::Handlebars;
use serde::Serialize;
use serde_json::Value;

use peptide_catalog::filter::ResultPage;

pub struct TemplateRegistry {
    handlebars: Handlebars<'static>,
}

impl TemplateRegistry {
    pub fn new() -> Result<Self, handlebars::TemplateError> {
        let mut handlebars = Handlebars::new();
        handlebars.register_helper("json", Box::new(json_helper));

        handlebars.register_template_string(
            "organism_results",
            include_str!("../templates/organism_results.hbs"),
        )?;
        handlebars.register_template_string(
            "organism_list",
            include_str!("../templates/organism_list.hbs"),
        )?;
        handlebars.register_template_string(
            "protein_results",
            include_str!("../templates/protein_results.hbs"),
        )?;
        handlebars.register_template_string(
            "protein_list",
            include_str!("../templates/protein_list.hbs"),
        )?;
        handlebars.register_template_string(
            "task_progress",
            include_str!("../templates/task_progress.hbs"),
        )?;
        handlebars.register_template_string(
            "progress_status",
            include_str!("../templates/progress_status.hbs"),
        )?;

        Ok(Self { handlebars })
    }

    pub fn render(&self, name: &str, data: &Value) -> Result<String, handlebars::RenderError> {
        self.handlebars.render(name, data)
    }
}

/// `{{{json value}}}` — serialize a context value to a JSON string, used to
/// embed option sets and the current selection for the client-side widget
/// rebuild. Triple-stache in templates: the output is JSON, not HTML.
fn json_helper(
    h: &handlebars::Helper,
    _: &Handlebars,
    _: &handlebars::Context,
    _: &mut handlebars::RenderContext,
    out: &mut dyn handlebars::Output,
) -> handlebars::HelperResult {
    let value = h.param(0).map(|p| p.value()).unwrap_or(&Value::Null);
    let rendered = serde_json::to_string(value).unwrap_or_else(|_| "null".to_string());
    out.write(&rendered)?;
    Ok(())
}

/// Pagination context for the templates: the page's counters plus the
/// navigation accessors, which serde cannot see. Items are passed separately
/// by each handler, shaped for its template.
pub fn page_context<T: Serialize>(page: &ResultPage<T>) -> Value {
    serde_json::json!({
        "page": page.page,
        "page_size": page.page_size,
        "total_count": page.total_count,
        "total_pages": page.total_pages,
        "has_previous": page.has_previous(),
        "has_next": page.has_next(),
        "previous_page": page.previous_page(),
        "next_page": page.next_page(),
    })
}
